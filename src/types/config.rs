use crate::auth::Role;
use crate::error::FestError;
use crate::rank::PointsPolicy;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_STORE_FILE: &str = "festboard.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FestConfig {
    pub store: Option<StoreConfig>,
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    RawTotal,
    FixedTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub categories: Option<Vec<String>>,
    pub policy: Option<PolicyKind>,
    pub fixed_points: Option<FixedPointsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixedPointsConfig {
    pub single: Option<Vec<u64>>,
    pub group: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub id: String,
    pub role: Role,
    pub sector: Option<String>,
}

impl FestConfig {
    pub fn default_categories() -> Vec<String> {
        ["Kids", "Sub Junior", "Junior", "Senior", "General"]
            .iter()
            .map(|category| category.to_string())
            .collect()
    }

    pub fn default_single_points() -> Vec<u64> {
        vec![5, 3, 1]
    }

    pub fn default_group_points() -> Vec<u64> {
        vec![10, 8, 5]
    }

    pub fn store_path(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|store| store.path.as_deref())
            .unwrap_or(DEFAULT_STORE_FILE)
    }

    pub fn categories(&self) -> Vec<String> {
        self.scoring
            .as_ref()
            .and_then(|scoring| scoring.categories.clone())
            .unwrap_or_else(Self::default_categories)
    }

    pub fn points_policy(&self) -> PointsPolicy {
        let scoring = self.scoring.as_ref();
        match scoring.and_then(|scoring| scoring.policy) {
            Some(PolicyKind::FixedTable) => {
                let table = scoring.and_then(|scoring| scoring.fixed_points.as_ref());
                PointsPolicy::FixedTable {
                    single: table
                        .and_then(|table| table.single.clone())
                        .unwrap_or_else(Self::default_single_points),
                    group: table
                        .and_then(|table| table.group.clone())
                        .unwrap_or_else(Self::default_group_points),
                }
            }
            Some(PolicyKind::RawTotal) | None => PointsPolicy::RawTotal,
        }
    }

    pub fn user(&self, id: &str) -> Option<&UserConfig> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn validate(&self) -> Result<(), FestError> {
        if self.store_path().trim().is_empty() {
            return Err(FestError::ConfigParse(
                "store.path cannot be empty".to_string(),
            ));
        }

        let categories = self.categories();
        if categories.is_empty() {
            return Err(FestError::ConfigParse(
                "scoring.categories cannot be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for category in &categories {
            let normalized = category.trim();
            if normalized.is_empty() {
                return Err(FestError::ConfigParse(
                    "scoring.categories contains an empty entry".to_string(),
                ));
            }
            if normalized == "total" {
                return Err(FestError::ConfigParse(
                    "scoring.categories cannot contain the reserved name `total`".to_string(),
                ));
            }
            if !seen.insert(normalized) {
                return Err(FestError::ConfigParse(format!(
                    "scoring.categories lists `{normalized}` more than once"
                )));
            }
        }

        if let PointsPolicy::FixedTable { single, group } = self.points_policy() {
            if single.is_empty() || group.is_empty() {
                return Err(FestError::ConfigParse(
                    "scoring.fixed_points tables cannot be empty when policy = \"fixed_table\""
                        .to_string(),
                ));
            }
        }

        let mut user_ids = HashSet::new();
        for user in &self.users {
            if user.id.trim().is_empty() {
                return Err(FestError::ConfigParse("users.id cannot be empty".to_string()));
            }
            if !user_ids.insert(user.id.as_str()) {
                return Err(FestError::ConfigParse(format!(
                    "users lists `{}` more than once",
                    user.id
                )));
            }
            if matches!(user.role, Role::Sector) && user.sector.is_none() {
                return Err(FestError::ConfigParse(format!(
                    "user `{}` has role sector but no sector",
                    user.id
                )));
            }
        }

        Ok(())
    }
}
