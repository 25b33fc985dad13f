mod init;
mod schema;

pub use init::write_default_config;
pub use schema::{ColumnMap, Config};

use crate::scoring::Criterion;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/home-rank/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("home-rank"))
}

/// Get the default config file path (~/.config/home-rank/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/home-rank/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(
                    "no config at {}, using built-in defaults",
                    default_path.display()
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    tracing::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

/// Validate the column mapping. Returns all errors at once.
pub fn validate_columns(columns: &ColumnMap) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if columns.key.trim().is_empty() {
        errors.push("columns.key: must not be empty".to_string());
    }

    let mut used = vec![("key", columns.key.as_str())];
    for criterion in Criterion::ALL {
        let column = columns.column_for(criterion);
        if column.trim().is_empty() {
            errors.push(format!("columns.{}: must not be empty", criterion));
            continue;
        }
        if let Some((other, _)) = used.iter().find(|(_, c)| *c == column) {
            errors.push(format!(
                "columns.{}: column '{}' is already used by columns.{}",
                criterion, column, other
            ));
        }
        used.push((criterion.name(), column));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let path = env::temp_dir().join("home_rank_test_missing_config.yaml");
        let _ = fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_path() {
        let path = env::temp_dir().join("home_rank_test_load_config.yaml");
        fs::write(&path, "scoring:\n  top_n: 4\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.scoring.unwrap().top_n, Some(4));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let path = env::temp_dir().join("home_rank_test_bad_config.yaml");
        fs::write(&path, "scoring: [not, a, map]\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_default_columns_valid() {
        assert!(validate_columns(&ColumnMap::default()).is_ok());
    }

    #[test]
    fn test_column_clash() {
        let columns = ColumnMap {
            tourism: Some("climate_score".to_string()),
            ..ColumnMap::default()
        };
        let errors = validate_columns(&columns).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("columns.tourism"));
        assert!(errors[0].contains("columns.climate"));
    }

    #[test]
    fn test_empty_key_and_column() {
        let columns = ColumnMap {
            key: " ".to_string(),
            housing: Some(String::new()),
            ..ColumnMap::default()
        };
        let errors = validate_columns(&columns).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
