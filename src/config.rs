use crate::error::{FestError, Result};
use crate::types::config::FestConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "festboard.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".festboard/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/festboard/config.toml";

pub const CONFIG_TEMPLATE: &str = r#"[store]
path = "festboard.json"

[scoring]
categories = ["Kids", "Sub Junior", "Junior", "Senior", "General"]
# "raw_total" awards each participant their total score;
# "fixed_table" awards points by rank from the tables below.
policy = "raw_total"

[scoring.fixed_points]
single = [5, 3, 1]
group = [10, 8, 5]

# [[users]]
# id = "admin@fest.example"
# role = "admin"
"#;

pub fn load_config(root: &Path) -> Result<Option<FestConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<FestConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: FestConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| FestError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Writes the starter config unless one already exists.
pub fn write_template(root: &Path, overwrite: bool) -> Result<PathBuf> {
    let path = root.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !overwrite {
        return Err(FestError::AlreadyExists(path.display().to_string()));
    }
    std::fs::create_dir_all(root)?;
    std::fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| FestError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::PointsPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_none_when_repo_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn template_parses_and_validates() {
        let dir = TempDir::new().expect("temp dir should be created");
        write_template(dir.path(), false).expect("template should write");

        let cfg = load_config_with_global(dir.path(), None)
            .expect("load should succeed")
            .expect("config should exist");
        assert_eq!(cfg.categories(), FestConfig::default_categories());
        assert_eq!(cfg.points_policy(), PointsPolicy::RawTotal);
        assert!(matches!(
            write_template(dir.path(), false),
            Err(FestError::AlreadyExists(_))
        ));
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[store]
path = "global.json"

[scoring]
policy = "fixed_table"

[scoring.fixed_points]
group = [12, 9, 6]
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[store]
path = "fest.json"

[scoring]
categories = ["Kids", "Junior"]
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".festboard")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[scoring.fixed_points]
single = [3, 2, 1]
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");

        assert_eq!(cfg.store_path(), "fest.json");
        assert_eq!(cfg.categories(), vec!["Kids", "Junior"]);
        assert_eq!(
            cfg.points_policy(),
            PointsPolicy::FixedTable {
                single: vec![3, 2, 1],
                group: vec![12, 9, 6],
            }
        );
    }

    #[test]
    fn load_config_rejects_invalid_merged_config() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[scoring]
categories = []
"#,
        )
        .expect("repo config should write");

        let result = load_config_with_global(root.path(), None);
        assert!(matches!(result, Err(FestError::ConfigParse(_))));
    }
}
