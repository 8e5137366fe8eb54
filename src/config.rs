//! Linker and translator configuration.
//!
//! Configuration lives in a TOML file. Every linker knob has a serde default,
//! so a config only needs to name the ontology file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Thresholds and limits for candidate generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Minimum similarity for class and individual candidates.
    #[serde(default = "default_min_entity_similarity")]
    pub min_entity_similarity: f32,
    /// Minimum similarity for object and data property candidates.
    #[serde(default = "default_min_relation_similarity")]
    pub min_relation_similarity: f32,
    /// Candidates kept per phrase when a template has a relation chunk.
    #[serde(default = "default_best_mappings")]
    pub best_mappings: usize,
}

fn default_min_entity_similarity() -> f32 {
    0.7
}
fn default_min_relation_similarity() -> f32 {
    0.6
}
fn default_best_mappings() -> usize {
    3
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            min_entity_similarity: default_min_entity_similarity(),
            min_relation_similarity: default_min_relation_similarity(),
            best_mappings: default_best_mappings(),
        }
    }
}

impl LinkerConfig {
    /// Check that thresholds are valid cosine similarities and that at least
    /// one candidate is kept per phrase.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("min_entity_similarity", self.min_entity_similarity),
            ("min_relation_similarity", self.min_relation_similarity),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must be within [-1, 1], got {value}"),
                });
            }
        }
        if self.best_mappings == 0 {
            return Err(ConfigError::Invalid {
                message: "best_mappings must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Everything the `translate` command needs to build a [`crate::pipeline::Translator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// JSON ontology document.
    pub ontology: PathBuf,
    /// Optional GloVe-style embedding table. Without one, only lexical
    /// matching produces candidates.
    #[serde(default)]
    pub embeddings: Option<PathBuf>,
    #[serde(default)]
    pub linker: LinkerConfig,
}

impl TranslatorConfig {
    pub fn new(ontology: impl Into<PathBuf>) -> Self {
        Self {
            ontology: ontology.into(),
            embeddings: None,
            linker: LinkerConfig::default(),
        }
    }

    /// Load from a TOML file and validate the linker section.
    ///
    /// Relative `ontology` and `embeddings` paths are resolved against the
    /// directory containing the config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.linker.validate()?;

        if let Some(base) = path.parent() {
            config.ontology = base.join(&config.ontology);
            config.embeddings = config.embeddings.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LinkerConfig::default();
        assert_eq!(cfg.min_entity_similarity, 0.7);
        assert_eq!(cfg.min_relation_similarity, 0.6);
        assert_eq!(cfg.best_mappings, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let cfg = LinkerConfig {
            min_relation_similarity: 1.5,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("min_relation_similarity"));
    }

    #[test]
    fn rejects_zero_best_mappings() {
        let cfg = LinkerConfig {
            best_mappings: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let cfg: TranslatorConfig = toml::from_str(r#"ontology = "pizza.json""#).unwrap();
        assert_eq!(cfg.ontology, PathBuf::from("pizza.json"));
        assert_eq!(cfg.embeddings, None);
        assert_eq!(cfg.linker, LinkerConfig::default());
    }

    #[test]
    fn partial_linker_section() {
        let cfg: TranslatorConfig = toml::from_str(
            "ontology = \"pizza.json\"\n[linker]\nbest_mappings = 5\n",
        )
        .unwrap();
        assert_eq!(cfg.linker.best_mappings, 5);
        assert_eq!(cfg.linker.min_entity_similarity, 0.7);
    }

    #[test]
    fn config_roundtrip_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("linker.toml");

        let mut cfg = TranslatorConfig::new("pizza.json");
        cfg.embeddings = Some(PathBuf::from("glove.txt"));
        cfg.linker.min_entity_similarity = 0.8;
        cfg.save(&path).unwrap();

        let loaded = TranslatorConfig::load(&path).unwrap();
        let base = path.parent().unwrap();
        assert_eq!(loaded.ontology, base.join("pizza.json"));
        assert_eq!(loaded.embeddings, Some(base.join("glove.txt")));
        assert_eq!(loaded.linker.min_entity_similarity, 0.8);
    }

    #[test]
    fn load_reports_invalid_linker_settings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "ontology = \"o.json\"\n[linker]\nbest_mappings = 0\n").unwrap();
        assert!(matches!(
            TranslatorConfig::load(&path),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        let err = TranslatorConfig::load(Path::new("/nonexistent/linker.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_bad_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "ontology = [").unwrap();
        assert!(matches!(
            TranslatorConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
