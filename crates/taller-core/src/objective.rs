use crate::error::{Result, TallerError};
use crate::progress;
use crate::types::Period;
use crate::{paths, store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

/// A numeric/text target tracked over a period. The progress percentage is
/// derived at read time (`progress_percent`) and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    /// Service or product label, e.g. "Cambio de aceite".
    pub service: String,
    /// Free-text target, e.g. "150/mes".
    #[serde(default)]
    pub target_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_numeric: Option<i64>,
    pub period: Period,
    #[serde(default)]
    pub current_progress: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Clone)]
pub struct NewObjective {
    pub service: String,
    pub target_value: String,
    pub target_numeric: Option<i64>,
    pub period: Option<Period>,
    pub business_line: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ObjectiveUpdate {
    pub service: Option<String>,
    pub target_value: Option<String>,
    pub target_numeric: Option<Option<i64>>,
    pub period: Option<Period>,
    pub current_progress: Option<i64>,
    pub active: Option<bool>,
    pub business_line: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl Objective {
    pub fn create(root: &Path, new: NewObjective) -> Result<Objective> {
        let service = new.service.trim().to_string();
        if service.is_empty() {
            return Err(TallerError::Validation("service must not be empty".into()));
        }
        let objective = Objective {
            id: uuid::Uuid::new_v4().to_string(),
            service,
            target_value: new.target_value,
            target_numeric: new.target_numeric,
            period: new.period.unwrap_or(Period::Mensual),
            current_progress: 0,
            active: true,
            business_line: new.business_line,
            location: new.location,
            created_at: Utc::now(),
        };
        objective.save(root)?;
        Ok(objective)
    }

    pub fn load(root: &Path, id: &str) -> Result<Objective> {
        paths::validate_id(id)?;
        store::read(&paths::objective_path(root, id))?
            .ok_or_else(|| TallerError::ObjectiveNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::objective_path(root, &self.id), self)
    }

    pub fn update(root: &Path, id: &str, patch: ObjectiveUpdate) -> Result<Objective> {
        let mut objective = Objective::load(root, id)?;
        if let Some(service) = patch.service {
            let service = service.trim().to_string();
            if service.is_empty() {
                return Err(TallerError::Validation("service must not be empty".into()));
            }
            objective.service = service;
        }
        if let Some(target_value) = patch.target_value {
            objective.target_value = target_value;
        }
        if let Some(target_numeric) = patch.target_numeric {
            objective.target_numeric = target_numeric;
        }
        if let Some(period) = patch.period {
            objective.period = period;
        }
        if let Some(current_progress) = patch.current_progress {
            objective.current_progress = current_progress;
        }
        if let Some(active) = patch.active {
            objective.active = active;
        }
        if let Some(business_line) = patch.business_line {
            objective.business_line = business_line;
        }
        if let Some(location) = patch.location {
            objective.location = location;
        }
        objective.save(root)?;
        Ok(objective)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        paths::validate_id(id)?;
        if !store::remove(&paths::objective_path(root, id))? {
            return Err(TallerError::ObjectiveNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn list(root: &Path, filter: &ObjectiveFilter) -> Result<Vec<Objective>> {
        let mut objectives: Vec<Objective> = store::read_all(&root.join(paths::OBJECTIVES_DIR))?;
        objectives.retain(|o| filter.matches(o));
        objectives.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(objectives)
    }

    /// Derived progress; see `progress::percent` for the clamping rules.
    pub fn progress_percent(&self) -> u8 {
        progress::percent(self.current_progress, self.target_numeric)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct ObjectiveFilter {
    pub active: Option<bool>,
    pub period: Option<Period>,
    /// Case-insensitive substring match over service, target value, and
    /// business line.
    pub search: Option<String>,
}

impl ObjectiveFilter {
    pub fn matches(&self, objective: &Objective) -> bool {
        if let Some(active) = self.active {
            if objective.active != active {
                return false;
            }
        }
        if let Some(period) = self.period {
            if objective.period != period {
                return false;
            }
        }
        if let Some(q) = &self.search {
            let q = q.to_lowercase();
            let haystacks = [
                Some(objective.service.as_str()),
                Some(objective.target_value.as_str()),
                objective.business_line.as_deref(),
            ];
            if !haystacks
                .iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&q))
            {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

// Same independent per-row semantics as the task bulk operations.

pub fn bulk_set_active(root: &Path, ids: &[String], active: bool) -> usize {
    let mut updated = 0;
    for id in ids {
        let Ok(mut objective) = Objective::load(root, id) else {
            continue;
        };
        objective.active = active;
        if objective.save(root).is_ok() {
            updated += 1;
        }
    }
    updated
}

pub fn bulk_delete(root: &Path, ids: &[String]) -> usize {
    ids.iter()
        .filter(|id| Objective::delete(root, id).is_ok())
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
