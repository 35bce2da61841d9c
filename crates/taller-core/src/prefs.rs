//! Per-admin UI preferences (sidebar geometry). Loaded once at session
//! start and persisted on change; never consulted by the core logic and
//! excluded from the stats surface.

use crate::error::Result;
use crate::{paths, store};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrefs {
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

fn default_sidebar_width() -> u16 {
    280
}

impl Default for SessionPrefs {
    fn default() -> Self {
        Self {
            sidebar_width: default_sidebar_width(),
            sidebar_collapsed: false,
        }
    }
}

impl SessionPrefs {
    /// Defaults when the user has never saved preferences.
    pub fn load(root: &Path, user_id: &str) -> Result<SessionPrefs> {
        paths::validate_id(user_id)?;
        Ok(store::read(&paths::prefs_path(root, user_id))?.unwrap_or_default())
    }

    pub fn save(&self, root: &Path, user_id: &str) -> Result<()> {
        paths::validate_id(user_id)?;
        store::write(&paths::prefs_path(root, user_id), self)
    }
}
