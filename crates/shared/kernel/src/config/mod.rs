use config::{Config, Environment, File, Map};
use dreg_domain::config::RegistryConfig;
use dreg_domain::constants::ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Default config file looked up (optionally) in the working directory.
const DEFAULT_CONFIG_NAME: &str = "dreg";

/// Custom error type for config loading.
#[dreg_derive::dreg_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader: file settings overlaid with environment overrides.
///
/// 1. **Base File**: an explicit `path` must exist. Without one, `dreg.toml` in the
///    working directory is used when present.
/// 2. **Environment Overrides**: variables prefixed with `DREG__`; nested keys use
///    double underscores (`DREG__OUTPUT__DIR` maps to `output.dir`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or the merged
/// sources do not match `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_with_env(path, None)
}

/// Loads the [`RegistryConfig`] with [`load_config`].
///
/// # Errors
/// See [`load_config`].
pub fn load_registry_config(path: Option<impl AsRef<Path>>) -> Result<RegistryConfig, ConfigError> {
    load_config(path)
}

fn load_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(p) => {
            info!("Loading config from {}", p.as_ref().display());
            File::from(p.as_ref()).required(true)
        },
        None => {
            debug!("No config file given, trying optional `{DEFAULT_CONFIG_NAME}`");
            File::with_name(DEFAULT_CONFIG_NAME).required(false)
        },
    };

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreg_domain::config::{GroupBy, OutputFormat};
    use std::fs;
    use tempfile::tempdir;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dreg.toml");
        fs::write(
            &path,
            "[source]\nroot = \"node\"\ngroup_by = \"module\"\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg: RegistryConfig = load_with_env(Some(&path), no_env()).unwrap();
        assert_eq!(cfg.source.root, std::path::PathBuf::from("node"));
        assert_eq!(cfg.source.group_by, GroupBy::Module);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.target.path, "serde::de::Deserialize");
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dreg.toml");
        fs::write(&path, "[output]\ndir = \"from-file\"\n").unwrap();

        let mut env = Map::new();
        env.insert("DREG__OUTPUT__DIR".to_owned(), "from-env".to_owned());

        let cfg: RegistryConfig = load_with_env(Some(&path), Some(env)).unwrap();
        assert_eq!(cfg.output.dir, std::path::PathBuf::from("from-env"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result: Result<RegistryConfig, _> =
            load_with_env(Some(dir.path().join("absent.toml")), no_env());
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }
}
