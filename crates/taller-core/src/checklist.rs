use crate::error::{Result, TallerError};
use crate::types::WorkStatus;
use crate::{paths, store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ChecklistItem
// ---------------------------------------------------------------------------

/// A status-tracked verification line. Items group by string equality of
/// `area` — there is no foreign key; a new area label is a new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub area: String,
    pub item: String,
    pub status: WorkStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
pub struct NewChecklistItem {
    pub area: String,
    pub item: String,
}

#[derive(Debug, Default, Clone)]
pub struct ChecklistUpdate {
    pub area: Option<String>,
    pub item: Option<String>,
    pub status: Option<WorkStatus>,
}

impl ChecklistItem {
    pub fn create(root: &Path, new: NewChecklistItem) -> Result<ChecklistItem> {
        let area = new.area.trim().to_string();
        let item = new.item.trim().to_string();
        if area.is_empty() {
            return Err(TallerError::Validation("area must not be empty".into()));
        }
        if item.is_empty() {
            return Err(TallerError::Validation("item must not be empty".into()));
        }
        let entry = ChecklistItem {
            id: uuid::Uuid::new_v4().to_string(),
            area,
            item,
            status: WorkStatus::Pendiente,
            created_at: Utc::now(),
        };
        entry.save(root)?;
        Ok(entry)
    }

    pub fn load(root: &Path, id: &str) -> Result<ChecklistItem> {
        paths::validate_id(id)?;
        store::read(&paths::checklist_path(root, id))?
            .ok_or_else(|| TallerError::ChecklistItemNotFound(id.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::checklist_path(root, &self.id), self)
    }

    pub fn update(root: &Path, id: &str, patch: ChecklistUpdate) -> Result<ChecklistItem> {
        let mut entry = ChecklistItem::load(root, id)?;
        if let Some(area) = patch.area {
            let area = area.trim().to_string();
            if area.is_empty() {
                return Err(TallerError::Validation("area must not be empty".into()));
            }
            entry.area = area;
        }
        if let Some(item) = patch.item {
            let item = item.trim().to_string();
            if item.is_empty() {
                return Err(TallerError::Validation("item must not be empty".into()));
            }
            entry.item = item;
        }
        if let Some(status) = patch.status {
            entry.status = status;
        }
        entry.save(root)?;
        Ok(entry)
    }

    pub fn list(root: &Path) -> Result<Vec<ChecklistItem>> {
        let mut items: Vec<ChecklistItem> = store::read_all(&root.join(paths::CHECKLIST_DIR))?;
        items.sort_by(|a, b| a.area.cmp(&b.area).then(a.created_at.cmp(&b.created_at)));
        Ok(items)
    }
}

/// Group items by area label, areas in alphabetical order.
pub fn group_by_area(items: Vec<ChecklistItem>) -> BTreeMap<String, Vec<ChecklistItem>> {
    let mut groups: BTreeMap<String, Vec<ChecklistItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.area.clone()).or_default().push(item);
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
