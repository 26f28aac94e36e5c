//! Configuration management for the pecha serializer

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_TEMPLATE_URL: &str =
    "https://raw.githubusercontent.com/OpenPecha/ebook-template/master/tsadra_template.css";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub converter: ConverterConfig,
    pub template: TemplateConfig,
    pub style: EbookStyle,
    /// Directory holding intermediate files and the converted ebook
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConverterConfig {
    /// Converter executable (default: "ebook-convert" - uses PATH)
    pub program: String,
    /// Output extension, without the dot
    pub output_ext: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    pub url: String,
    pub timeout_secs: u64,
}

/// Presentation parameters handed to the converter
#[derive(Debug, Clone, Deserialize)]
pub struct EbookStyle {
    pub font_family: String,
    pub base_font_size: u32,
    /// XPath matching chapter-title markup, used for chapter splitting
    pub chapter_xpath: String,
    pub chapter_mark: String,
    /// Class put on every paragraph of the assembled shell
    pub paragraph_class: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TemplateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            program: "ebook-convert".to_string(),
            output_ext: "epub".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            url: DEFAULT_TEMPLATE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for EbookStyle {
    fn default() -> Self {
        EbookStyle {
            font_family: "Monlam Uni Ouchan2".to_string(),
            base_font_size: 16,
            chapter_xpath: "//*[@class='tibetan-chapter']".to_string(),
            chapter_mark: "pagebreak".to_string(),
            paragraph_class: "tibetan-regular-indented".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            converter: ConverterConfig::default(),
            template: TemplateConfig::default(),
            style: EbookStyle::default(),
            work_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Build a config from `PECHA_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        Ok(Config {
            converter: ConverterConfig {
                program: env::var("PECHA_CONVERTER").unwrap_or(defaults.converter.program),
                output_ext: env::var("PECHA_OUTPUT_EXT").unwrap_or(defaults.converter.output_ext),
                timeout_secs: parse_var(
                    "PECHA_CONVERT_TIMEOUT_SECS",
                    defaults.converter.timeout_secs,
                )?,
            },
            template: TemplateConfig {
                url: env::var("PECHA_TEMPLATE_URL").unwrap_or(defaults.template.url),
                timeout_secs: parse_var("PECHA_FETCH_TIMEOUT_SECS", defaults.template.timeout_secs)?,
            },
            style: EbookStyle {
                font_family: env::var("PECHA_FONT_FAMILY").unwrap_or(defaults.style.font_family),
                base_font_size: parse_var("PECHA_FONT_SIZE", defaults.style.base_font_size)?,
                ..EbookStyle::default()
            },
            work_dir: env::var("PECHA_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}
