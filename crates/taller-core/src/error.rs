use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallerError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("objective not found: {0}")]
    ObjectiveNotFound(String),

    #[error("stage not found: {0}")]
    StageNotFound(String),

    #[error("deliverable not found: {0}")]
    DeliverableNotFound(String),

    #[error("checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("invalid id '{0}': must be alphanumeric with hyphens")]
    InvalidId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TallerError>;
