use crate::error::{Result, TallerError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TALLER_DIR: &str = ".taller";
pub const TASKS_DIR: &str = ".taller/tasks";
pub const OBJECTIVES_DIR: &str = ".taller/objectives";
pub const STAGES_DIR: &str = ".taller/roadmap/stages";
pub const DELIVERABLES_DIR: &str = ".taller/roadmap/deliverables";
pub const CHECKLIST_DIR: &str = ".taller/checklist";
pub const PREFS_DIR: &str = ".taller/prefs";

pub const USERS_FILE: &str = ".taller/users.yaml";
pub const SUBSCRIBERS_FILE: &str = ".taller/subscribers.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn taller_dir(root: &Path) -> PathBuf {
    root.join(TALLER_DIR)
}

pub fn task_path(root: &Path, id: &str) -> PathBuf {
    root.join(TASKS_DIR).join(format!("{id}.yaml"))
}

pub fn objective_path(root: &Path, id: &str) -> PathBuf {
    root.join(OBJECTIVES_DIR).join(format!("{id}.yaml"))
}

pub fn stage_path(root: &Path, id: &str) -> PathBuf {
    root.join(STAGES_DIR).join(format!("{id}.yaml"))
}

pub fn deliverable_path(root: &Path, id: &str) -> PathBuf {
    root.join(DELIVERABLES_DIR).join(format!("{id}.yaml"))
}

pub fn checklist_path(root: &Path, id: &str) -> PathBuf {
    root.join(CHECKLIST_DIR).join(format!("{id}.yaml"))
}

pub fn prefs_path(root: &Path, user_id: &str) -> PathBuf {
    root.join(PREFS_DIR).join(format!("{user_id}.yaml"))
}

pub fn users_path(root: &Path) -> PathBuf {
    root.join(USERS_FILE)
}

pub fn subscribers_path(root: &Path) -> PathBuf {
    root.join(SUBSCRIBERS_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

// Record ids become file names, so they are validated before any path is
// built from caller input.

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-]*$").unwrap())
}

pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(TallerError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
