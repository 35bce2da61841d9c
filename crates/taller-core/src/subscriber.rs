//! Newsletter subscribers captured by the public site. External records:
//! the console only counts and lists them, it never mutates them.

use crate::error::Result;
use crate::{paths, store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriberList {
    #[serde(default)]
    pub subscribers: Vec<Subscriber>,
}

impl SubscriberList {
    pub fn load(root: &Path) -> Result<SubscriberList> {
        Ok(store::read(&paths::subscribers_path(root))?.unwrap_or_default())
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::subscribers_path(root), self)
    }
}

/// Subscriber count for the dashboard; 0 when the collection is absent.
pub fn count(root: &Path) -> Result<usize> {
    Ok(SubscriberList::load(root)?.subscribers.len())
}
