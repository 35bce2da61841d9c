use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Kanban column a task sits in. Any status can follow any other in a
/// single update; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pendiente,
    EnProgreso,
    EsperandoRespuesta,
    Completado,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pendiente,
            TaskStatus::EnProgreso,
            TaskStatus::EsperandoRespuesta,
            TaskStatus::Completado,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pendiente => "pendiente",
            TaskStatus::EnProgreso => "en_progreso",
            TaskStatus::EsperandoRespuesta => "esperando_respuesta",
            TaskStatus::Completado => "completado",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::TallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(TaskStatus::Pendiente),
            "en_progreso" => Ok(TaskStatus::EnProgreso),
            "esperando_respuesta" => Ok(TaskStatus::EsperandoRespuesta),
            "completado" => Ok(TaskStatus::Completado),
            _ => Err(crate::error::TallerError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Alta,
    Media,
    Baja,
}

impl Priority {
    pub fn all() -> &'static [Priority] {
        &[Priority::Alta, Priority::Media, Priority::Baja]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Alta => "alta",
            Priority::Media => "media",
            Priority::Baja => "baja",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::TallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alta" => Ok(Priority::Alta),
            "media" => Ok(Priority::Media),
            "baja" => Ok(Priority::Baja),
            _ => Err(crate::error::TallerError::InvalidPriority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Tracking window for an objective's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Diaria,
    Semanal,
    Mensual,
    Trimestral,
    Anual,
}

impl Period {
    pub fn all() -> &'static [Period] {
        &[
            Period::Diaria,
            Period::Semanal,
            Period::Mensual,
            Period::Trimestral,
            Period::Anual,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Diaria => "diaria",
            Period::Semanal => "semanal",
            Period::Mensual => "mensual",
            Period::Trimestral => "trimestral",
            Period::Anual => "anual",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = crate::error::TallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diaria" => Ok(Period::Diaria),
            "semanal" => Ok(Period::Semanal),
            "mensual" => Ok(Period::Mensual),
            "trimestral" => Ok(Period::Trimestral),
            "anual" => Ok(Period::Anual),
            _ => Err(crate::error::TallerError::InvalidPeriod(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkStatus
// ---------------------------------------------------------------------------

/// Three-value status shared by roadmap deliverables and checklist items.
/// Narrower than `TaskStatus`: no waiting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Pendiente,
    EnProgreso,
    Completado,
}

impl WorkStatus {
    pub fn all() -> &'static [WorkStatus] {
        &[
            WorkStatus::Pendiente,
            WorkStatus::EnProgreso,
            WorkStatus::Completado,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::Pendiente => "pendiente",
            WorkStatus::EnProgreso => "en_progreso",
            WorkStatus::Completado => "completado",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = crate::error::TallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(WorkStatus::Pendiente),
            "en_progreso" => Ok(WorkStatus::EnProgreso),
            "completado" => Ok(WorkStatus::Completado),
            _ => Err(crate::error::TallerError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Patch helper
// ---------------------------------------------------------------------------

/// Deserialize helper distinguishing an absent field (no change) from an
/// explicit `null` (clear the value). Use with
/// `#[serde(default, deserialize_with = "...")]` on `Option<Option<T>>`.
pub fn patch_field<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(de).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
