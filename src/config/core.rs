use super::RepoctxConfig;
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use std::path::{Path, PathBuf};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "REPOCTX_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl RepoctxConfig {
    /// Load the merged configuration
    pub fn load(custom_config: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(custom_config)?;
        figment
            .extract()
            .context("Failed to parse configuration")
    }

    /// Every layer below CLI flags, in priority order
    pub fn figment(custom_config: Option<&Path>) -> Result<Figment> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(base) = Self::user_config_base_path() {
            figment = merge_any_format(figment, &base);
        }
        figment = merge_any_format(figment, Path::new("repoctx"));

        if let Some(path) = custom_config {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            tracing::debug!("Using config file {}", path.display());
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Render the configuration in the requested format
    pub fn export(&self, format: ConfigFormat) -> Result<String> {
        let output = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
        };
        Ok(output)
    }

    fn user_config_base_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("repoctx").join("config"))
    }
}

/// Merge `<base>.toml`, `.json`, `.yaml` and `.yml`; missing files are skipped
fn merge_any_format(figment: Figment, base: &Path) -> Figment {
    figment
        .merge(Toml::file(base.with_extension("toml")))
        .merge(Json::file(base.with_extension("json")))
        .merge(Yaml::file(base.with_extension("yaml")))
        .merge(Yaml::file(base.with_extension("yml")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use figment::Jail;

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        let from_file: RepoctxConfig = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap();
        assert_eq!(from_file, RepoctxConfig::default());
    }

    #[test]
    fn test_project_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repoctx.toml",
                "[filter]\ntoken_budget = 500\nrelevance_keywords = [\"auth\"]\n",
            )?;
            jail.set_env("REPOCTX_FILTER__TOKEN_BUDGET", "900");
            jail.set_env("REPOCTX_OUTPUT__FORMAT", "json");

            let config = RepoctxConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.filter.token_budget, 900);
            assert_eq!(config.filter.relevance_keywords, vec!["auth"]);
            assert_eq!(config.output.format, OutputFormat::Json);
            assert!(config.filter.use_gitignore);
            Ok(())
        });
    }

    #[test]
    fn test_custom_yaml_config() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yml", "engine:\n  max_threads: 2\n  prioritize_entry_points: true\n")?;
            let config =
                RepoctxConfig::load(Some(Path::new("custom.yml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.engine.max_threads, 2);
            assert!(config.engine.prioritize_entry_points);
            Ok(())
        });
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        assert!(RepoctxConfig::load(Some(Path::new("definitely-missing.toml"))).is_err());
    }

    #[test]
    fn test_export_formats() {
        let config = RepoctxConfig::default();
        assert!(config.export(ConfigFormat::Toml).unwrap().contains("[filter]"));
        assert!(config.export(ConfigFormat::Json).unwrap().contains("\"token_budget\""));
        assert!(config.export(ConfigFormat::Yaml).unwrap().contains("token_budget"));
    }
}
