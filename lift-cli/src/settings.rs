//! `lift config` subcommands.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use lift_common::{Config, ValidationError};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration (file plus environment overrides)
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
    /// Check the configuration file for invalid values
    Validate,
}

/// Pretty JSON for the effective configuration.
pub fn show(config: &Config) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize config")
}

/// Write defaults to `path`, refusing to clobber an existing file unless forced.
pub fn init(path: &Path, force: bool) -> Result<String> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    tracing::info!(path = %path.display(), "Wrote default config");
    Ok(format!("Wrote default config to {}", path.display()))
}

/// Load `path` (defaults when missing) and report every validation failure.
pub fn validate(path: &Path) -> Result<String> {
    let config = if path.exists() {
        Config::load_from(path)?
    } else {
        Config::default()
    };

    match config.validate() {
        Ok(()) => Ok(format!("Config OK: {}", path.display())),
        Err(err) => {
            let lines: Vec<String> = flatten(&err).iter().map(|e| format!("  - {e}")).collect();
            bail!("Invalid config at {}:\n{}", path.display(), lines.join("\n"))
        }
    }
}

fn flatten(err: &ValidationError) -> Vec<&ValidationError> {
    match err {
        ValidationError::Multiple(errors) => errors.iter().flat_map(flatten).collect(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_validate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        init(&path, false).unwrap();
        assert!(path.exists());
        assert!(validate(&path).unwrap().starts_with("Config OK"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let err = init(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        init(&path, true).unwrap();
    }

    #[test]
    fn test_validate_lists_each_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "observability": { "log_level": "loud" },
                "calculator": { "power": 1.2 }
            }"#,
        )
        .unwrap();

        let message = validate(&path).unwrap_err().to_string();
        assert!(message.contains("log_level"));
        assert!(message.contains("power"));
    }

    #[test]
    fn test_validate_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(validate(&path).is_ok());
    }

    #[test]
    fn test_show_is_json() {
        let json = show(&Config::default()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["services"]["api"]["port"], serde_json::Value::Null);
        assert_eq!(parsed["network"]["bind"], "127.0.0.1");
    }
}
