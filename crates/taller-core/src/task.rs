use crate::error::{Result, TallerError};
use crate::types::{Priority, TaskStatus};
use crate::{paths, store};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted at create time. Status is always `pendiente` and
/// priority defaults to `media`.
#[derive(Debug, Default, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Partial update. Outer `None` means "leave unchanged"; for the nullable
/// fields the inner `None` clears the value.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl Task {
    pub fn create(root: &Path, new: NewTask) -> Result<Task> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(TallerError::Validation("title must not be empty".into()));
        }
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description: new.description,
            status: TaskStatus::Pendiente,
            priority: new.priority.unwrap_or(Priority::Media),
            assigned_to: new.assigned_to,
            due_date: new.due_date,
            created_at: Utc::now(),
        };
        task.save(root)?;
        Ok(task)
    }

    pub fn load(root: &Path, id: &str) -> Result<Task> {
        paths::validate_id(id)?;
        store::read(&paths::task_path(root, id))?
            .ok_or_else(|| TallerError::TaskNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::task_path(root, &self.id), self)
    }

    pub fn update(root: &Path, id: &str, patch: TaskUpdate) -> Result<Task> {
        let mut task = Task::load(root, id)?;
        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(TallerError::Validation("title must not be empty".into()));
            }
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.save(root)?;
        Ok(task)
    }

    /// Hard delete. There is no soft-delete or undo.
    pub fn delete(root: &Path, id: &str) -> Result<()> {
        paths::validate_id(id)?;
        if !store::remove(&paths::task_path(root, id))? {
            return Err(TallerError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }

    /// All tasks matching `filter`, newest first.
    pub fn list(root: &Path, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = store::read_all(&root.join(paths::TASKS_DIR))?;
        tasks.retain(|t| filter.matches(t));
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Wire value for the explicit "unassigned" assignee filter. Distinct from
/// an absent filter, which matches every task.
pub const UNASSIGNED: &str = "sin_asignar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeFilter {
    Unassigned,
    User(String),
}

impl AssigneeFilter {
    pub fn parse(raw: &str) -> AssigneeFilter {
        if raw == UNASSIGNED {
            AssigneeFilter::Unassigned
        } else {
            AssigneeFilter::User(raw.to_string())
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<AssigneeFilter>,
    /// Case-insensitive substring match over title and description.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        match &self.assignee {
            Some(AssigneeFilter::Unassigned) => {
                if task.assigned_to.is_some() {
                    return false;
                }
            }
            Some(AssigneeFilter::User(id)) => {
                if task.assigned_to.as_deref() != Some(id.as_str()) {
                    return false;
                }
            }
            None => {}
        }
        if let Some(q) = &self.search {
            let q = q.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&q);
            let in_description = task
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&q))
                .unwrap_or(false);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

// Bulk operations are independent per-row writes, not a transaction: a row
// that fails is skipped and only the success count is reported.

pub fn bulk_update_status(root: &Path, ids: &[String], status: TaskStatus) -> usize {
    let mut updated = 0;
    for id in ids {
        let Ok(mut task) = Task::load(root, id) else {
            continue;
        };
        task.status = status;
        if task.save(root).is_ok() {
            updated += 1;
        }
    }
    updated
}

pub fn bulk_delete(root: &Path, ids: &[String]) -> usize {
    ids.iter()
        .filter(|id| Task::delete(root, id).is_ok())
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
