use crate::error::{FestError, Result};
use crate::types::config::FestConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    StageAdmin,
    Judge,
    Sector,
    Public,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "admin",
            Self::StageAdmin => "stage_admin",
            Self::Judge => "judge",
            Self::Sector => "sector",
            Self::Public => "public",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ImportRoster,
    RecordMark,
    ProcessRanks,
    RecalculateLeaderboard,
    ResetEvent,
}

impl Action {
    fn allowed(self, role: Role) -> bool {
        match self {
            Self::RecordMark => matches!(role, Role::Admin | Role::StageAdmin | Role::Judge),
            Self::ProcessRanks => matches!(role, Role::Admin | Role::StageAdmin),
            Self::ImportRoster | Self::RecalculateLeaderboard | Self::ResetEvent => {
                matches!(role, Role::Admin)
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::ImportRoster => "import a roster",
            Self::RecordMark => "record marks",
            Self::ProcessRanks => "process ranks",
            Self::RecalculateLeaderboard => "recalculate the leaderboard",
            Self::ResetEvent => "reset an event",
        }
    }
}

/// The authenticated caller, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub sector: Option<String>,
}

impl Principal {
    pub fn public() -> Self {
        Self {
            id: "public".to_string(),
            role: Role::Public,
            sector: None,
        }
    }

    pub fn authorize(&self, action: Action) -> Result<()> {
        if action.allowed(self.role) {
            Ok(())
        } else {
            Err(FestError::Forbidden(format!(
                "{} ({}) may not {}",
                self.id,
                self.role,
                action.describe()
            )))
        }
    }
}

#[cfg(test)]
impl Principal {
    pub fn admin(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role: Role::Admin,
            sector: None,
        }
    }

    pub fn judge(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role: Role::Judge,
            sector: None,
        }
    }
}

/// Maps a user id to its configured role. No id means a public session.
pub fn resolve(config: &FestConfig, user: Option<&str>) -> Result<Principal> {
    let Some(id) = user.map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(Principal::public());
    };
    let entry = config
        .user(id)
        .ok_or_else(|| FestError::UnknownUser(id.to_string()))?;
    Ok(Principal {
        id: entry.id.clone(),
        role: entry.role,
        sector: entry.sector.clone(),
    })
}
