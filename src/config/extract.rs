use crate::features::{FhogParams, HogParams};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ExtractConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    /// Decode the input as RGB instead of luma.
    #[serde(default)]
    pub color: bool,
    #[serde(default)]
    pub features: FeatureConfig,
    pub output: ExtractOutputConfig,
}

/// Which extractor to run, with its parameters inline:
/// `{ "kind": "fhog", "bin_size": 4, "n_orients": 9 }`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureConfig {
    Hog(HogParams),
    Fhog(FhogParams),
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig::Fhog(FhogParams::default())
    }
}

impl FeatureConfig {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureConfig::Hog(_) => "hog",
            FeatureConfig::Fhog(_) => "fhog",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractOutputConfig {
    #[serde(rename = "summary_json")]
    pub summary_json: PathBuf,
    /// When set, every feature channel is written as `channel_XX.png`.
    #[serde(default)]
    pub channels_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ExtractConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<ExtractConfig, serde_json::Error> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::HogLayout;

    #[test]
    fn feature_kind_defaults_to_fhog() {
        let cfg = parse_config(r#"{ "input": "a.png", "output": { "summary_json": "out/a.json" } }"#).unwrap();
        assert!(!cfg.color);
        assert!(cfg.output.channels_dir.is_none());
        match cfg.features {
            FeatureConfig::Fhog(p) => assert_eq!(p, FhogParams::default()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hog_parameters_are_read_inline() {
        let cfg = parse_config(
            r#"{
                "input": "a.png",
                "color": true,
                "features": { "kind": "hog", "bin_size": 6, "layout": "per_normalization" },
                "output": { "summary_json": "a.json", "channels_dir": "channels" }
            }"#,
        )
        .unwrap();
        assert!(cfg.color);
        assert_eq!(cfg.features.name(), "hog");
        match cfg.features {
            FeatureConfig::Hog(p) => {
                assert_eq!(p.bin_size, 6);
                assert_eq!(p.n_orients, 9);
                assert_eq!(p.layout, HogLayout::PerNormalization);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cfg.output.channels_dir, Some(PathBuf::from("channels")));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_config(Path::new("/nonexistent/extract.json")).unwrap_err();
        assert!(err.contains("/nonexistent/extract.json"));
    }
}
