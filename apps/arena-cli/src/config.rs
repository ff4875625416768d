use std::path::PathBuf;

use arena_profile::ProfilerConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Endpoint manifest used by `resolve`.
    pub manifest_path: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub window_capacity: usize,
}

impl CliConfig {
    /// Defaults, then the optional config file, then `ARENA_*` variables.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("manifest_path", "arena.toml")?
            .set_default("log_filter", "info")?
            .set_default(
                "window_capacity",
                ProfilerConfig::default().window_capacity as u64,
            )?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("ARENA").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    pub fn profiler(&self) -> ProfilerConfig {
        ProfilerConfig::with_window_capacity(self.window_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::CliConfig;
    use std::env;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn defaults_then_file_then_env() {
        let cfg = CliConfig::new(None).expect("defaults should build");
        assert_eq!(cfg.manifest_path, PathBuf::from("arena.toml"));
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.window_capacity, 10);
        assert_eq!(cfg.profiler().window_capacity, 10);

        let mut tmp = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            tmp,
            "manifest_path = \"deploy/endpoint.toml\"\nwindow_capacity = 4"
        )
        .expect("write to temp file");
        let path = PathBuf::from(tmp.path());

        let cfg = CliConfig::new(Some(path.clone())).expect("file should load");
        assert_eq!(cfg.manifest_path, PathBuf::from("deploy/endpoint.toml"));
        assert_eq!(cfg.window_capacity, 4);
        assert_eq!(cfg.log_filter, "info");

        env::set_var("ARENA_WINDOW_CAPACITY", "7");
        let cfg = CliConfig::new(Some(path));
        env::remove_var("ARENA_WINDOW_CAPACITY");
        assert_eq!(cfg.expect("env should apply").window_capacity, 7);
    }
}
