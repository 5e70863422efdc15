//! Linear undo/redo over scene snapshots.
//!
//! Every committed snapshot is a structurally distinct `Scene` value, so
//! moving the cursor restores prior states exactly. The overwrite path exists
//! for in-progress gestures: a drag creates one entry at its start and then
//! overwrites it on every move, leaving exactly one entry per gesture.

use tracing::trace;

use crate::scene::Scene;

/// Versioned scene snapshots with a cursor at the active one.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Scene>,
    cursor: usize,
}

impl History {
    /// Start history at an initial snapshot.
    pub fn new(initial: Scene) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The active snapshot.
    pub fn current(&self) -> &Scene {
        &self.entries[self.cursor]
    }

    /// Commit a new snapshot: anything after the cursor becomes unreachable,
    /// the snapshot is appended, and the cursor advances to it.
    pub fn commit(&mut self, scene: Scene) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(scene);
        self.cursor += 1;
        trace!(entries = self.entries.len(), cursor = self.cursor, "history commit");
    }

    /// Replace the active snapshot in place. History does not grow.
    pub fn overwrite(&mut self, scene: Scene) {
        self.entries[self.cursor] = scene;
    }

    /// Step back one snapshot. No-op at the oldest entry.
    pub fn undo(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            trace!(cursor = self.cursor, "undo");
        }
    }

    /// Step forward one snapshot. No-op at the newest entry.
    pub fn redo(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            trace!(cursor = self.cursor, "redo");
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Scene::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::shapes::{StrokeColor, Tool};

    fn scene_with(n: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..n {
            scene
                .add_shape(
                    Tool::Line,
                    Point::new(i as f64, 0.0),
                    Point::new(i as f64 + 1.0, 1.0),
                    StrokeColor::default(),
                )
                .unwrap();
        }
        scene
    }

    #[test]
    fn commit_after_undo_discards_redo_branch() {
        let mut history = History::new(scene_with(0));
        history.commit(scene_with(1));
        history.commit(scene_with(2));
        history.undo();
        history.commit(scene_with(3));

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current().len(), 3);
        assert!(!history.can_redo());
    }

    #[test]
    fn starts_with_the_initial_snapshot() {
        let history = History::default();
        assert!(!history.is_empty());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn overwrite_does_not_grow_history() {
        let mut history = History::new(scene_with(0));
        history.overwrite(scene_with(1));
        history.overwrite(scene_with(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().len(), 2);
    }

    #[test]
    fn undo_redo_walk_the_entries() {
        let mut history = History::new(scene_with(0));
        history.commit(scene_with(1));
        history.commit(scene_with(2));

        history.undo();
        assert_eq!(history.current().len(), 1);
        history.undo();
        assert_eq!(history.current().len(), 0);
        history.redo();
        history.redo();
        assert_eq!(history.current().len(), 2);
    }

    #[test]
    fn boundary_moves_are_silent_no_ops() {
        let mut history = History::new(scene_with(0));
        history.undo();
        assert_eq!(history.cursor(), 0);
        history.redo();
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_restores_exact_prior_snapshot() {
        let before = scene_with(2);
        let mut history = History::new(before.clone());
        let mut mutated = before.clone();
        mutated
            .add_shape(
                Tool::Rectangle,
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0),
                StrokeColor::default(),
            )
            .unwrap();
        history.commit(mutated);
        history.undo();
        assert_eq!(history.current(), &before);
    }
}
