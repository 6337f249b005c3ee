use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
}

/// Runtime settings of the application.
///
/// Layered, later wins: built-in defaults, `config.json5` / `config.toml` in
/// [`AppConfig::config_dir`], environment variables `<APP>_<KEY>`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_level: String,
    pub remote_latency_ms: u64,
    pub remote_failing: bool,
}

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REMOTE_LATENCY_MS: u64 = 3000;

const CONFIG_FILES: [(&str, config::FileFormat); 2] = [
    ("config.json5", config::FileFormat::Json5),
    ("config.toml", config::FileFormat::Toml),
];

impl AppConfig {
    /// Load the configuration for `app_id` from the real environment.
    pub fn load(organization: &str, app_id: &str) -> Result<Self, ConfigError> {
        let dirs = Directories::resolve(organization, app_id);
        Self::load_from(&dirs, config::Environment::with_prefix(&env_prefix(app_id)))
    }

    /// Load with explicit directories and environment source.
    pub fn load_from(dirs: &Directories, env: config::Environment) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", utf8(&dirs.data)?)?
            .set_default("config_dir", utf8(&dirs.config)?)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("remote_latency_ms", DEFAULT_REMOTE_LATENCY_MS)?
            .set_default("remote_failing", false)?;

        for (file, format) in CONFIG_FILES {
            let path = dirs.config.join(file);
            if path.exists() {
                debug!(file = %path.display(), "using config file");
            }
            builder = builder.add_source(config::File::from(path).format(format).required(false));
        }

        let cfg: Self = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    pub fn remote_latency(&self) -> Duration {
        Duration::from_millis(self.remote_latency_ms)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.data_dir, &self.config_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

/// Data and config directories before any config file is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directories {
    pub data: PathBuf,
    pub config: PathBuf,
}

impl Directories {
    /// `<APP>_DATA` / `<APP>_CONFIG` win over the platform directories.
    pub fn resolve(organization: &str, app_id: &str) -> Self {
        let prefix = env_prefix(app_id);
        let project = ProjectDirs::from("com", organization, app_id);
        let data = env::var(format!("{prefix}_DATA"))
            .ok()
            .map(PathBuf::from)
            .or_else(|| project.as_ref().map(|p| p.data_local_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".").join(".data"));
        let config = env::var(format!("{prefix}_CONFIG"))
            .ok()
            .map(PathBuf::from)
            .or_else(|| project.as_ref().map(|p| p.config_local_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".").join(".config"));
        Self { data, config }
    }
}

fn env_prefix(app_id: &str) -> String {
    app_id.to_uppercase()
}

fn utf8(path: &Path) -> Result<&str, ConfigError> {
    path.to_str()
        .ok_or_else(|| ConfigError::NonUtf8Path(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dirs(root: &Path) -> Directories {
        Directories {
            data: root.join("data"),
            config: root.join("config"),
        }
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("TODO").source(Some(vars))
    }

    #[test]
    fn platform_dirs_are_used_without_overrides() {
        let dirs = Directories::resolve("todo", "todo-dirs-check");
        let project = ProjectDirs::from("com", "todo", "todo-dirs-check");
        let data = project
            .as_ref()
            .map(|p| p.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".").join(".data"));
        assert_eq!(dirs.data, data);
    }

    #[test]
    fn defaults_without_files_or_env() {
        let root = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dirs(root.path()), env(&[])).unwrap();
        assert_eq!(
            cfg,
            AppConfig {
                data_dir: root.path().join("data"),
                config_dir: root.path().join("config"),
                log_level: "info".into(),
                remote_latency_ms: 3000,
                remote_failing: false,
            }
        );
        assert_eq!(cfg.remote_latency(), Duration::from_secs(3));
    }

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        let root = tempfile::tempdir().unwrap();
        let dirs = dirs(root.path());
        fs::create_dir_all(&dirs.config).unwrap();
        fs::write(
            dirs.config.join("config.toml"),
            "log_level = \"debug\"\nremote_latency_ms = 10\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&dirs, env(&[])).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.remote_latency_ms, 10);

        let cfg = AppConfig::load_from(
            &dirs,
            env(&[("TODO_REMOTE_LATENCY_MS", "0"), ("TODO_REMOTE_FAILING", "true")]),
        )
        .unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.remote_latency_ms, 0);
        assert!(cfg.remote_failing);
    }

    #[test]
    fn json5_file_is_read() {
        let root = tempfile::tempdir().unwrap();
        let dirs = dirs(root.path());
        fs::create_dir_all(&dirs.config).unwrap();
        fs::write(
            dirs.config.join("config.json5"),
            "{ remote_failing: true, // simulate an outage\n}",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&dirs, env(&[])).unwrap();
        assert!(cfg.remote_failing);
    }

    #[test]
    fn ensure_dirs_creates_both() {
        let root = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dirs(root.path()), env(&[]))
            .unwrap()
            .with_data_dir(root.path().join("elsewhere"));
        cfg.ensure_dirs().unwrap();
        assert!(root.path().join("elsewhere").is_dir());
        assert!(root.path().join("config").is_dir());
    }
}
