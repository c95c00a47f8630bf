use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project settings read from `cleast.toml`. Command-line flags win over
/// every field.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CleastConfig {
    /// Root for module prefixes of included files
    pub src_dir: Option<String>,
    /// Fail `analyze` when a statement is unsafe
    pub strict: Option<bool>,
    /// `human` or `json`
    pub format: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("cleast.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CleastConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CleastConfig = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CleastConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config() {
        let dir = tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("cleast.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleast.toml");
        let config = CleastConfig {
            src_dir: Some("encodings".to_string()),
            strict: Some(true),
            format: Some("json".to_string()),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &CleastConfig::default(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(CleastConfig::default()));
    }

    #[test]
    fn test_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleast.toml");
        std::fs::write(&path, "strict = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.strict, Some(true));
        assert!(config.src_dir.is_none());
    }
}
