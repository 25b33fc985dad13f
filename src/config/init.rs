use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ensure_parent_dir, get_config_path, Config};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# home-rank configuration
#
# Preferences accept a slider value from 0 to 5, or one of the labels
# \"Pas important\", \"Peu important\", \"Important\", \"Très important\".
# All preferences at 0 weigh every criterion equally.
";

/// Write the default configuration file.
///
/// Uses `path` when given, otherwise ~/.config/home-rank/config.yaml.
/// Refuses to replace an existing file unless `force` is set.
/// The file is written atomically so a failed write never leaves a truncated config.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config {
        scoring: Some(ScoringConfig::default()),
        ..Config::default()
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize config to YAML")?;

    write_atomically(&config_path, &format!("{}\n{}", HEADER, yaml))?;
    tracing::info!("wrote default config to {}", config_path.display());

    Ok(config_path)
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
