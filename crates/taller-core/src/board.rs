//! Kanban board controller: turns user gestures into single-field update
//! commands against the record store, invalidating the cached task list
//! only after the store acknowledges a write.
//!
//! A drag gesture walks `Idle → Dragging → Hovering → Idle`. Dropping
//! issues exactly one status update — intermediate columns hovered along
//! the way are never persisted. There is no optimistic update: the cached
//! view only changes after a successful round trip, so a failed drop
//! leaves the displayed state untouched.

use crate::error::Result;
use crate::task::{Task, TaskFilter, TaskUpdate};
use crate::types::{Priority, TaskStatus};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// DragState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { task_id: String },
    Hovering { task_id: String, target: TaskStatus },
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Board {
    root: PathBuf,
    drag: DragState,
    cache: Option<Vec<Task>>,
}

impl Board {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            drag: DragState::Idle,
            cache: None,
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Current task list, read from the store on first access and after
    /// each invalidation.
    pub fn tasks(&mut self) -> Result<&[Task]> {
        if self.cache.is_none() {
            self.cache = Some(Task::list(&self.root, &TaskFilter::default())?);
        }
        Ok(self.cache.as_deref().unwrap_or(&[]))
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    // -----------------------------------------------------------------------
    // Drag gesture
    // -----------------------------------------------------------------------

    /// Pick up a card. Ignored unless the board is idle.
    pub fn drag_start(&mut self, task_id: impl Into<String>) {
        if self.drag == DragState::Idle {
            self.drag = DragState::Dragging {
                task_id: task_id.into(),
            };
        }
    }

    /// Hover the dragged card over a column.
    pub fn drag_over(&mut self, target: TaskStatus) {
        let state = std::mem::replace(&mut self.drag, DragState::Idle);
        self.drag = match state {
            DragState::Dragging { task_id } | DragState::Hovering { task_id, .. } => {
                DragState::Hovering { task_id, target }
            }
            DragState::Idle => DragState::Idle,
        };
    }

    /// Leave the hovered column without dropping.
    pub fn drag_leave(&mut self) {
        let state = std::mem::replace(&mut self.drag, DragState::Idle);
        self.drag = match state {
            DragState::Hovering { task_id, .. } => DragState::Dragging { task_id },
            other => other,
        };
    }

    /// Abort the gesture. Nothing was written, so nothing is invalidated.
    pub fn drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drop the card. When hovering a column this issues exactly one
    /// status update; otherwise it is a no-op. The gesture ends either
    /// way, and on failure the cache keeps the pre-gesture view.
    pub fn drop_card(&mut self) -> Result<Option<Task>> {
        let state = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::Hovering { task_id, target } = state else {
            return Ok(None);
        };
        let task = Task::update(
            &self.root,
            &task_id,
            TaskUpdate {
                status: Some(target),
                ..Default::default()
            },
        )?;
        self.invalidate();
        Ok(Some(task))
    }

    // -----------------------------------------------------------------------
    // Selection gestures
    // -----------------------------------------------------------------------

    /// Status picked from a dropdown instead of dragged.
    pub fn select_status(&mut self, task_id: &str, status: TaskStatus) -> Result<Task> {
        let task = Task::update(
            &self.root,
            task_id,
            TaskUpdate {
                status: Some(status),
                ..Default::default()
            },
        )?;
        self.invalidate();
        Ok(task)
    }

    pub fn select_priority(&mut self, task_id: &str, priority: Priority) -> Result<Task> {
        let task = Task::update(
            &self.root,
            task_id,
            TaskUpdate {
                priority: Some(priority),
                ..Default::default()
            },
        )?;
        self.invalidate();
        Ok(task)
    }

    pub fn select_assignee(&mut self, task_id: &str, assignee: Option<String>) -> Result<Task> {
        let task = Task::update(
            &self.root,
            task_id,
            TaskUpdate {
                assigned_to: Some(assignee),
                ..Default::default()
            },
        )?;
        self.invalidate();
        Ok(task)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use tempfile::TempDir;

    fn seed(root: &std::path::Path, title: &str) -> Task {
        Task::create(
            root,
            NewTask {
                title: title.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn drop_persists_only_the_target_column() {
        let dir = TempDir::new().unwrap();
        let task = seed(dir.path(), "Revisar frenos");
        let mut board = Board::new(dir.path());

        board.drag_start(&task.id);
        // The card crosses a column on the way; nothing is written yet.
        board.drag_over(TaskStatus::EnProgreso);
        assert_eq!(
            Task::load(dir.path(), &task.id).unwrap().status,
            TaskStatus::Pendiente
        );

        board.drag_over(TaskStatus::Completado);
        let dropped = board.drop_card().unwrap().unwrap();
        assert_eq!(dropped.status, TaskStatus::Completado);
        assert_eq!(*board.drag_state(), DragState::Idle);
        assert_eq!(
            Task::load(dir.path(), &task.id).unwrap().status,
            TaskStatus::Completado
        );
    }

    #[test]
    fn drop_without_hover_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let task = seed(dir.path(), "Cambiar aceite");
        let mut board = Board::new(dir.path());

        board.drag_start(&task.id);
        assert!(board.drop_card().unwrap().is_none());
        assert_eq!(
            Task::load(dir.path(), &task.id).unwrap().status,
            TaskStatus::Pendiente
        );
    }

    #[test]
    fn cancel_resets_without_writing() {
        let dir = TempDir::new().unwrap();
        let task = seed(dir.path(), "Pintura");
        let mut board = Board::new(dir.path());

        board.drag_start(&task.id);
        board.drag_over(TaskStatus::Completado);
        board.drag_cancel();
        assert_eq!(*board.drag_state(), DragState::Idle);
        assert_eq!(
            Task::load(dir.path(), &task.id).unwrap().status,
            TaskStatus::Pendiente
        );
    }

    #[test]
    fn drag_leave_returns_to_dragging() {
        let dir = TempDir::new().unwrap();
        let mut board = Board::new(dir.path());
        board.drag_start("t1");
        board.drag_over(TaskStatus::EnProgreso);
        board.drag_leave();
        assert_eq!(
            *board.drag_state(),
            DragState::Dragging {
                task_id: "t1".into()
            }
        );
    }

    #[test]
    fn second_drag_start_is_ignored_mid_gesture() {
        let dir = TempDir::new().unwrap();
        let mut board = Board::new(dir.path());
        board.drag_start("t1");
        board.drag_start("t2");
        assert_eq!(
            *board.drag_state(),
            DragState::Dragging {
                task_id: "t1".into()
            }
        );
    }

    #[test]
    fn failed_drop_keeps_cached_view() {
        let dir = TempDir::new().unwrap();
        let task = seed(dir.path(), "Soldadura");
        let mut board = Board::new(dir.path());
        assert_eq!(board.tasks().unwrap().len(), 1);

        // The task disappears underneath the gesture (another session
        // deleted it); the drop fails and the cache is not invalidated.
        Task::delete(dir.path(), &task.id).unwrap();
        board.drag_start(&task.id);
        board.drag_over(TaskStatus::Completado);
        assert!(board.drop_card().is_err());
        assert_eq!(*board.drag_state(), DragState::Idle);
        assert_eq!(board.tasks().unwrap().len(), 1);
    }

    #[test]
    fn successful_update_invalidates_cache() {
        let dir = TempDir::new().unwrap();
        let task = seed(dir.path(), "Diagnóstico");
        let mut board = Board::new(dir.path());
        assert_eq!(board.tasks().unwrap()[0].status, TaskStatus::Pendiente);

        board.select_status(&task.id, TaskStatus::EnProgreso).unwrap();
        assert_eq!(board.tasks().unwrap()[0].status, TaskStatus::EnProgreso);
    }

    #[test]
    fn select_assignee_clears_with_none() {
        let dir = TempDir::new().unwrap();
        let task = Task::create(
            dir.path(),
            NewTask {
                title: "Llantas".into(),
                assigned_to: Some("u-carlos".into()),
                ..Default::default()
            },
        )
        .unwrap();
        let mut board = Board::new(dir.path());
        let updated = board.select_assignee(&task.id, None).unwrap();
        assert!(updated.assigned_to.is_none());
    }
}
