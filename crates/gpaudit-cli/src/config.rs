//! Configuration file
//!
//! Settings are loaded from `gpaudit.toml`:
//!
//! ```toml
//! [export]
//! strategy = "raster"
//! source = "editor"
//! output_dir = "out"
//!
//! [fonts]
//! path = "fonts/NotoSansTelugu-Regular.ttf"
//!
//! [typography]
//! heading_px = 20
//!
//! [editor]
//! heading_nodes = false
//! ```
//!
//! Every section and key is optional. Relative paths are resolved against
//! the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gpaudit_core::{EditorConfig, ExportSource, Typography};
use gpaudit_ooxml::DocxOptions;
use gpaudit_pdf::{PdfOptions, PdfStrategy};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "gpaudit.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub export: ExportSettings,
    pub fonts: FontSettings,
    pub typography: Typography,
    pub editor: EditorConfig,
}

/// Export behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// PDF generation approach
    pub strategy: PdfStrategy,
    /// Blocks from field state or from the edited pages
    pub source: ExportSource,
    /// Directory exported files are written to
    pub output_dir: PathBuf,
    /// Directory holding the edited pages
    pub edited_dir: PathBuf,
    /// Supersampling scale for raster pages
    pub scale: f32,
    /// Word template supplying `styles.xml`
    pub docx_template: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            strategy: PdfStrategy::default(),
            source: ExportSource::default(),
            output_dir: PathBuf::from("."),
            edited_dir: PathBuf::from("edit"),
            scale: 2.0,
            docx_template: None,
        }
    }
}

/// Unicode font used by both exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub path: PathBuf,
    /// Family override; the PDF exporter otherwise uses the font's own name
    pub family: Option<String>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fonts/NotoSansTelugu-Regular.ttf"),
            family: None,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings
    ///
    /// An explicit path must exist. Without one, `gpaudit.toml` in the
    /// working directory is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Options for the PDF exporter
    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            strategy: self.export.strategy,
            font_path: self.fonts.path.clone(),
            font_family: self.fonts.family.clone(),
            scale: self.export.scale,
            heading_px: self.typography.heading_px,
            paragraph_px: self.typography.paragraph_px,
        }
    }

    /// Options for the DOCX exporter, reading the template if one is set
    pub fn docx_options(&self) -> Result<DocxOptions> {
        let template = match &self.export.docx_template {
            Some(path) => Some(
                fs::read(path)
                    .with_context(|| format!("Failed to read template: {}", path.display()))?,
            ),
            None => None,
        };
        let mut options = DocxOptions {
            heading_px: self.typography.heading_px,
            paragraph_px: self.typography.paragraph_px,
            template,
            ..DocxOptions::default()
        };
        if let Some(family) = &self.fonts.family {
            options.font_family = family.clone();
        }
        Ok(options)
    }
}
