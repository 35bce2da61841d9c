//! Dashboard aggregation. Always a full recomputation over the current
//! store contents — no incremental counters and no caching between calls,
//! so the dashboard can never show a number that drifted from the records.

use crate::error::Result;
use crate::objective::{Objective, ObjectiveFilter};
use crate::subscriber;
use crate::task::{Task, TaskFilter};
use crate::types::{Period, Priority, TaskStatus};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;

// ---------------------------------------------------------------------------
// TaskStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pendiente: usize,
    pub en_progreso: usize,
    pub esperando_respuesta: usize,
    pub completado: usize,
}

/// Per-status counts. The four buckets always sum to `total`.
pub fn tally(tasks: &[Task]) -> TaskStats {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
    TaskStats {
        total: tasks.len(),
        pendiente: count(TaskStatus::Pendiente),
        en_progreso: count(TaskStatus::EnProgreso),
        esperando_respuesta: count(TaskStatus::EsperandoRespuesta),
        completado: count(TaskStatus::Completado),
    }
}

pub fn task_stats(root: &Path) -> Result<TaskStats> {
    let tasks = Task::list(root, &TaskFilter::default())?;
    Ok(tally(&tasks))
}

// ---------------------------------------------------------------------------
// DashboardStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveProgress {
    pub id: String,
    pub service: String,
    pub period: Period,
    pub active: bool,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub tasks: TaskStats,
    /// High-priority unfinished tasks, due date ascending with undated
    /// tasks last, capped to the requested size.
    pub attention: Vec<Task>,
    /// Most recently created tasks, newest first.
    pub recent: Vec<Task>,
    pub objectives: Vec<ObjectiveProgress>,
    pub subscribers: usize,
}

pub fn compute(root: &Path, top_n: usize) -> Result<DashboardStats> {
    let tasks = Task::list(root, &TaskFilter::default())?;
    let stats = tally(&tasks);

    let mut attention: Vec<Task> = tasks
        .iter()
        .filter(|t| t.priority == Priority::Alta && t.status != TaskStatus::Completado)
        .cloned()
        .collect();
    attention.sort_by(compare_by_due_date);
    attention.truncate(top_n);

    // list() already returns newest first.
    let recent: Vec<Task> = tasks.iter().take(top_n).cloned().collect();

    let objectives = Objective::list(root, &ObjectiveFilter::default())?
        .into_iter()
        .map(|o| ObjectiveProgress {
            percent: o.progress_percent(),
            id: o.id,
            service: o.service,
            period: o.period,
            active: o.active,
        })
        .collect();

    Ok(DashboardStats {
        tasks: stats,
        attention,
        recent,
        objectives,
        subscribers: subscriber::count(root)?,
    })
}

fn compare_by_due_date(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.created_at.cmp(&b.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.created_at.cmp(&b.created_at),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
