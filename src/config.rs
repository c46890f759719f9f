use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Character-grid settings for layout-preserving extraction, in PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_tolerance")]
    pub x_tolerance: f64,
    #[serde(default = "default_tolerance")]
    pub y_tolerance: f64,
    #[serde(default = "default_x_density")]
    pub x_density: f64,
    #[serde(default = "default_y_density")]
    pub y_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_psm")]
    pub psm: u8,
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,
    pub tesseract_path: Option<String>,
    pub poppler_path: Option<String>,
}

fn default_tolerance() -> f64 {
    3.0
}

fn default_x_density() -> f64 {
    7.25
}

fn default_y_density() -> f64 {
    13.0
}

fn default_language() -> String {
    "ind+eng".to_string()
}

fn default_dpi() -> u32 {
    200
}

fn default_psm() -> u8 {
    1
}

fn default_thread_count() -> usize {
    4
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_tolerance: default_tolerance(),
            y_tolerance: default_tolerance(),
            x_density: default_x_density(),
            y_density: default_y_density(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            dpi: default_dpi(),
            psm: default_psm(),
            thread_count: default_thread_count(),
            tesseract_path: None,
            poppler_path: None,
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("pdftext");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// consulted and a missing file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found at {}", path.display());
                }
                path.to_path_buf()
            }
            None => match Self::config_path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", config_path.display()))?;

        config.expand_env_vars();
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Expand environment variables in path settings
    fn expand_env_vars(&mut self) {
        if let Some(ref mut path) = self.ocr.tesseract_path {
            *path = expand_env_var(path);
        }
        if let Some(ref mut path) = self.ocr.poppler_path {
            *path = expand_env_var(path);
        }
        // An unset variable leaves an empty string; treat it as not configured.
        self.ocr.tesseract_path = self.ocr.tesseract_path.take().filter(|p| !p.is_empty());
        self.ocr.poppler_path = self.ocr.poppler_path.take().filter(|p| !p.is_empty());
    }

    fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        if layout.x_density <= 0.0 || layout.y_density <= 0.0 {
            anyhow::bail!("layout densities must be positive");
        }
        if layout.x_tolerance < 0.0 || layout.y_tolerance < 0.0 {
            anyhow::bail!("layout tolerances must not be negative");
        }
        if self.ocr.dpi == 0 {
            anyhow::bail!("ocr.dpi must be greater than zero");
        }
        if self.ocr.thread_count == 0 {
            anyhow::bail!("ocr.thread_count must be at least 1");
        }
        if self.ocr.language.trim().is_empty() {
            anyhow::bail!("ocr.language must not be empty");
        }
        Ok(())
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var_braces() {
        // SAFETY: test is single-threaded
        unsafe { std::env::set_var("PDFTEXT_TEST_VAR_A", "/opt/poppler") };
        assert_eq!(expand_env_var("${PDFTEXT_TEST_VAR_A}"), "/opt/poppler");
        unsafe { std::env::remove_var("PDFTEXT_TEST_VAR_A") };
    }

    #[test]
    fn test_expand_env_var_dollar() {
        unsafe { std::env::set_var("PDFTEXT_TEST_VAR_B", "/usr/bin/tesseract") };
        assert_eq!(expand_env_var("$PDFTEXT_TEST_VAR_B"), "/usr/bin/tesseract");
        unsafe { std::env::remove_var("PDFTEXT_TEST_VAR_B") };
    }

    #[test]
    fn test_expand_env_var_literal() {
        assert_eq!(expand_env_var("C:\\poppler\\bin"), "C:\\poppler\\bin");
    }

    #[test]
    fn test_expand_env_var_missing_returns_empty() {
        assert_eq!(expand_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), "");
    }

    #[test]
    fn test_defaults_match_tool_behaviour() {
        let config = Config::default();
        assert_eq!(config.ocr.language, "ind+eng");
        assert_eq!(config.ocr.dpi, 200);
        assert_eq!(config.ocr.psm, 1);
        assert_eq!(config.ocr.thread_count, 4);
        assert_eq!(config.layout.x_density, 7.25);
        assert_eq!(config.layout.y_density, 13.0);
        assert_eq!(config.layout.x_tolerance, 3.0);
    }

    #[test]
    fn test_config_from_partial_toml() {
        let toml_str = r#"
            [ocr]
            language = "eng"
            dpi = 300
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.dpi, 300);
        assert_eq!(config.ocr.thread_count, 4);
        assert_eq!(config.layout.y_tolerance, 3.0);
        assert!(config.ocr.poppler_path.is_none());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_load_explicit_file_expands_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[ocr]\ntesseract_path = \"${DEFINITELY_NOT_SET_XYZ_456}\"\npoppler_path = \"/opt/poppler/bin\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert!(config.ocr.tesseract_path.is_none());
        assert_eq!(config.ocr.poppler_path.as_deref(), Some("/opt/poppler/bin"));
    }

    #[test]
    fn test_load_rejects_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ocr]\nthread_count = 0\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("thread_count"));
    }
}
