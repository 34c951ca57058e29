//! Configuration builder for layered configuration loading

use crate::{Config, ConfigError, ConfigResult};
use config::{ConfigBuilder as ConfigBuilderInner, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

/// Configuration builder for loading configuration from multiple sources
///
/// Sources are applied in the order they are added; later sources override
/// earlier ones key by key.
#[derive(Debug)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
    env_separator: String,
}

#[derive(Debug, Clone)]
enum ConfigSource {
    Defaults,
    File {
        path: PathBuf,
        format: FileFormat,
    },
    Environment {
        prefix: String,
        vars: Option<config::Map<String, String>>,
    },
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            env_separator: "__".to_string(),
        }
    }

    /// Add the built-in default values
    pub fn add_defaults(mut self) -> Self {
        self.sources.push(ConfigSource::Defaults);
        self
    }

    /// Add a configuration file source; missing files are skipped
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path);
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add a configuration file source with explicit format
    pub fn add_source_file_with_format<P: AsRef<Path>>(
        mut self,
        path: P,
        format: FileFormat,
    ) -> Self {
        let path = path.as_ref().to_path_buf();
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add process environment variables starting with `prefix`
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
            vars: None,
        });
        self
    }

    /// Add an explicit set of environment-style variables instead of the process environment
    pub fn add_env_vars<S, I, K, V>(mut self, prefix: S, vars: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
            vars: Some(vars),
        });
        self
    }

    /// Set environment variable separator (default: "__")
    pub fn env_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.env_separator = separator.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> ConfigResult<Config> {
        let mut inner: ConfigBuilderInner<config::builder::DefaultState> =
            config::Config::builder();

        for source in &self.sources {
            match source {
                ConfigSource::Defaults => {
                    let defaults = serde_yaml::to_value(Config::default())?;
                    inner = inner.add_source(config::Config::try_from(&defaults)?);
                }
                ConfigSource::File { path, format } => {
                    if path.exists() {
                        inner = inner.add_source(File::from(path.clone()).format(*format));
                    }
                }
                ConfigSource::Environment { prefix, vars } => {
                    inner = inner.add_source(
                        Environment::with_prefix(prefix)
                            .separator(&self.env_separator)
                            .source(vars.clone()),
                    );
                }
            }
        }

        let config: Config = inner.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Try to build the configuration, returning defaults on error
    pub fn build_or_default(self) -> Config {
        self.build().unwrap_or_default()
    }

    /// Detect file format from extension
    fn detect_format(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_config(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(extension).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().add_defaults().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_builder_yaml_file() {
        let file = temp_config(
            ".yaml",
            r#"
engine:
  seed: 42
  selector:
    family_exploration_rate: 0.0
    top_n: 5
logging:
  level: debug
  format: json
"#,
        );

        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build()
            .unwrap();

        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.engine.selector.family_exploration_rate.get(), 0.0);
        assert_eq!(config.engine.selector.top_n, 5);
        assert_eq!(config.engine.selector.history_weight, 0.3);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_builder_toml_file() {
        let file = temp_config(
            ".toml",
            r#"
[codec]
timeout_secs = 5

[engine.optimizer]
generations = 4
"#,
        );

        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build()
            .unwrap();

        assert_eq!(config.codec.timeout_secs, 5);
        assert!(config.codec.verify);
        assert_eq!(config.engine.optimizer.generations, 4);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = temp_config(".yaml", "engine:\n  seed: 1\n");

        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .add_env_vars(
                "ADAPTCOMP",
                [
                    ("ADAPTCOMP__ENGINE__SEED", "7"),
                    ("ADAPTCOMP__ENGINE__OPTIMIZER__JITTER", "0.2"),
                    ("ADAPTCOMP__LOGGING__LEVEL", "warn"),
                ],
            )
            .build()
            .unwrap();

        assert_eq!(config.engine.seed, Some(7));
        assert_eq!(config.engine.optimizer.jitter, 0.2);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_builder_validation() {
        let file = temp_config(
            ".yaml",
            "engine:\n  selector:\n    content_weight: 0.9\n",
        );

        let result = ConfigBuilder::new()
            .add_defaults()
            .add_source_file(file.path())
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must sum to 1"));
    }

    #[test]
    fn test_out_of_range_probability_is_rejected() {
        let result = ConfigBuilder::new()
            .add_defaults()
            .add_env_vars(
                "ADAPTCOMP",
                [("ADAPTCOMP__ENGINE__OPTIMIZER__MUTATION_RATE", "1.5")],
            )
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_defaults_fail_on_partial_config() {
        let file = temp_config(".yaml", "logging:\n  level: info\n");
        let result = ConfigBuilder::new().add_source_file(file.path()).build();
        assert!(matches!(result, Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigBuilder::new()
            .add_defaults()
            .add_source_file("/nonexistent/adaptcomp.yaml")
            .build()
            .unwrap();
        assert_eq!(config, Config::default());
    }
}
