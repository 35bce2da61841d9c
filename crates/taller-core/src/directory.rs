//! Read-only view of the user directory. Users are owned by the
//! authentication layer; the core only resolves references.

use crate::error::Result;
use crate::{paths, store};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Role / User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub users: Vec<User>,
}

impl Directory {
    /// A missing directory file is an empty directory, not an error.
    pub fn load(root: &Path) -> Result<Directory> {
        Ok(store::read(&paths::users_path(root))?.unwrap_or_default())
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write(&paths::users_path(root), self)
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn is_admin(&self, id: &str) -> bool {
        self.get(id).map(|u| u.role == Role::Admin).unwrap_or(false)
    }

    /// Resolve a task's assignee reference to a display identity.
    ///
    /// Null references and references to users no longer in the directory
    /// both resolve to the explicit unassigned sentinel, so the UI never
    /// sees a dangling id.
    pub fn resolve(&self, user_id: Option<&str>) -> DisplayIdentity {
        match user_id.and_then(|id| self.get(id)) {
            Some(user) => DisplayIdentity {
                user_id: Some(user.id.clone()),
                name: user.name.clone(),
                initial: initial_of(&user.name),
            },
            None => DisplayIdentity::unassigned(),
        }
    }
}

// ---------------------------------------------------------------------------
// DisplayIdentity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayIdentity {
    pub user_id: Option<String>,
    pub name: String,
    pub initial: String,
}

impl DisplayIdentity {
    pub fn unassigned() -> Self {
        Self {
            user_id: None,
            name: "Sin asignar".to_string(),
            initial: "-".to_string(),
        }
    }
}

fn initial_of(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "-".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
