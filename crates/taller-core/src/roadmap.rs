use crate::error::{Result, TallerError};
use crate::progress;
use crate::types::WorkStatus;
use crate::{paths, store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// RoadmapStage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapStage {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct NewStage {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

impl RoadmapStage {
    pub fn create(root: &Path, new: NewStage) -> Result<RoadmapStage> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(TallerError::Validation("name must not be empty".into()));
        }
        let sort_order = match new.sort_order {
            Some(n) => n,
            None => next_sort_order(RoadmapStage::list(root)?.iter().map(|s| s.sort_order)),
        };
        let stage = RoadmapStage {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description: new.description,
            color: new.color.unwrap_or_else(|| "#64748b".to_string()),
            sort_order,
            created_at: Utc::now(),
        };
        stage.save(root)?;
        Ok(stage)
    }

    pub fn load(root: &Path, id: &str) -> Result<RoadmapStage> {
        paths::validate_id(id)?;
        store::read(&paths::stage_path(root, id))?
            .ok_or_else(|| TallerError::StageNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::stage_path(root, &self.id), self)
    }

    /// Delete the stage and every deliverable that belongs to it. The
    /// cascade runs as independent per-row removals. Returns the number of
    /// deliverables removed.
    pub fn delete(root: &Path, id: &str) -> Result<usize> {
        paths::validate_id(id)?;
        if !store::remove(&paths::stage_path(root, id))? {
            return Err(TallerError::StageNotFound(id.to_string()));
        }
        let owned = RoadmapDeliverable::list(root, Some(id))?;
        Ok(owned
            .iter()
            .filter(|d| store::remove(&paths::deliverable_path(root, &d.id)).unwrap_or(false))
            .count())
    }

    pub fn list(root: &Path) -> Result<Vec<RoadmapStage>> {
        let mut stages: Vec<RoadmapStage> = store::read_all(&root.join(paths::STAGES_DIR))?;
        stages.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(stages)
    }
}

// ---------------------------------------------------------------------------
// RoadmapDeliverable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapDeliverable {
    pub id: String,
    pub stage_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: WorkStatus,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct NewDeliverable {
    pub stage_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Clone)]
pub struct DeliverableUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<WorkStatus>,
    pub sort_order: Option<i32>,
}

impl RoadmapDeliverable {
    /// Every deliverable belongs to exactly one existing stage; creation
    /// against an unknown stage fails.
    pub fn create(root: &Path, new: NewDeliverable) -> Result<RoadmapDeliverable> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(TallerError::Validation("name must not be empty".into()));
        }
        RoadmapStage::load(root, &new.stage_id)?;
        let sort_order = match new.sort_order {
            Some(n) => n,
            None => next_sort_order(
                RoadmapDeliverable::list(root, Some(&new.stage_id))?
                    .iter()
                    .map(|d| d.sort_order),
            ),
        };
        let deliverable = RoadmapDeliverable {
            id: uuid::Uuid::new_v4().to_string(),
            stage_id: new.stage_id,
            name,
            description: new.description,
            status: WorkStatus::Pendiente,
            sort_order,
            created_at: Utc::now(),
        };
        deliverable.save(root)?;
        Ok(deliverable)
    }

    pub fn load(root: &Path, id: &str) -> Result<RoadmapDeliverable> {
        paths::validate_id(id)?;
        store::read(&paths::deliverable_path(root, id))?
            .ok_or_else(|| TallerError::DeliverableNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::deliverable_path(root, &self.id), self)
    }

    pub fn update(root: &Path, id: &str, patch: DeliverableUpdate) -> Result<RoadmapDeliverable> {
        let mut deliverable = RoadmapDeliverable::load(root, id)?;
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(TallerError::Validation("name must not be empty".into()));
            }
            deliverable.name = name;
        }
        if let Some(description) = patch.description {
            deliverable.description = description;
        }
        if let Some(status) = patch.status {
            deliverable.status = status;
        }
        if let Some(sort_order) = patch.sort_order {
            deliverable.sort_order = sort_order;
        }
        deliverable.save(root)?;
        Ok(deliverable)
    }

    /// Deliverables, optionally restricted to one stage, in board order.
    pub fn list(root: &Path, stage_id: Option<&str>) -> Result<Vec<RoadmapDeliverable>> {
        let mut deliverables: Vec<RoadmapDeliverable> =
            store::read_all(&root.join(paths::DELIVERABLES_DIR))?;
        if let Some(stage_id) = stage_id {
            deliverables.retain(|d| d.stage_id == stage_id);
        }
        deliverables.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(deliverables)
    }
}

// ---------------------------------------------------------------------------
// Derived stage progress
// ---------------------------------------------------------------------------

/// Completed-deliverable share of a stage's deliverables; 0 for an empty
/// stage.
pub fn stage_progress(deliverables: &[RoadmapDeliverable]) -> u8 {
    let done = deliverables
        .iter()
        .filter(|d| d.status == WorkStatus::Completado)
        .count();
    progress::ratio_percent(done, deliverables.len())
}

fn next_sort_order<I: Iterator<Item = i32>>(existing: I) -> i32 {
    existing.max().map(|n| n + 1).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
