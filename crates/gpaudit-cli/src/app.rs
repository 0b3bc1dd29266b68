//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use gpaudit_ast::Document;
use gpaudit_core::{
    build_document, extract_html, EditSession, ExportSource, FieldState, PreviewRenderer, PAGES,
    REPORT_TITLE,
};
use gpaudit_ooxml::DocxWriter;
use gpaudit_pdf::{render_pdf, PdfStrategy};

use crate::config::Settings;

/// File name of the exported PDF
pub const PDF_FILE_NAME: &str = "grama_panchayati_audit_report.pdf";
/// File name of the exported Word document
pub const DOCX_FILE_NAME: &str = "grama_panchayati_audit_report.docx";

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => PDF_FILE_NAME,
            ExportFormat::Docx => DOCX_FILE_NAME,
        }
    }
}

/// PDF strategy as given on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Vector text at fixed positions
    Direct,
    /// One rasterized image per page
    Raster,
}

impl From<StrategyArg> for PdfStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Direct => PdfStrategy::Direct,
            StrategyArg::Raster => PdfStrategy::Raster,
        }
    }
}

/// Export source as given on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Rebuild the report from field values
    Fields,
    /// Use the edited pages
    Editor,
}

impl From<SourceArg> for ExportSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Fields => ExportSource::Fields,
            SourceArg::Editor => ExportSource::Editor,
        }
    }
}

#[derive(Parser)]
#[command(name = "gpaudit")]
#[command(author, version, about = "Grama panchayat audit report generator", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./gpaudit.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// TOML file with field values
    #[arg(long, global = true)]
    fields: Option<PathBuf>,

    /// Override one field, e.g. --set income=1,00,000
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    set: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective field values as TOML
    Fields,

    /// Dump the block model as JSON
    Blocks {
        /// Only this page (1-based)
        #[arg(short, long)]
        page: Option<usize>,
    },

    /// Write the HTML preview
    Preview {
        /// Output HTML file
        #[arg(short, long, default_value = "preview.html")]
        output: PathBuf,
    },

    /// Write one editable HTML page per report page
    Edit {
        /// Output directory (defaults to export.edited_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite pages that were already written
        #[arg(long)]
        force: bool,
    },

    /// Export the report as PDF or DOCX
    Export {
        /// Output format
        #[arg(short, long, value_enum)]
        format: ExportFormat,

        /// Output directory (defaults to export.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PDF strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Where the exported blocks come from
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Directory holding the edited pages
        #[arg(long)]
        edited_dir: Option<PathBuf>,

        /// Word template supplying styles (DOCX only)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    let fields = load_fields(cli.fields.as_deref(), &cli.set)?;

    match cli.command {
        Commands::Fields => {
            print!("{}", fields_command(&fields)?);
        }
        Commands::Blocks { page } => {
            println!("{}", blocks_command(&fields, page)?);
        }
        Commands::Preview { output } => {
            preview_command(&fields, &settings, &output)?;
            println!("Created: {}", output.display());
        }
        Commands::Edit { output, force } => {
            let dir = output.unwrap_or_else(|| settings.export.edited_dir.clone());
            for path in edit_command(&fields, &settings, &dir, force)? {
                println!("Created: {}", path.display());
            }
        }
        Commands::Export {
            format,
            output,
            strategy,
            source,
            edited_dir,
            template,
        } => {
            if let Some(output) = output {
                settings.export.output_dir = output;
            }
            if let Some(strategy) = strategy {
                settings.export.strategy = strategy.into();
            }
            if let Some(source) = source {
                settings.export.source = source.into();
            }
            if let Some(edited_dir) = edited_dir {
                settings.export.edited_dir = edited_dir;
            }
            if template.is_some() {
                settings.export.docx_template = template;
            }
            let path = export_command(format, &fields, &settings)?;
            println!("Saved: {}", path.display());
        }
    }

    Ok(())
}

/// Field values from an optional TOML file plus `key=value` overrides
pub fn load_fields(path: Option<&Path>, overrides: &[String]) -> Result<FieldState> {
    let mut fields = match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read field file: {}", path.display()))?;
            FieldState::from_toml_str(&content)
                .with_context(|| format!("Invalid field file: {}", path.display()))?
        }
        None => FieldState::default(),
    };
    for assignment in overrides {
        fields
            .apply_assignment(assignment)
            .with_context(|| format!("Invalid --set '{}'", assignment))?;
    }
    Ok(fields)
}

/// Execute the fields command
pub fn fields_command(fields: &FieldState) -> Result<String> {
    Ok(fields.to_toml_string()?)
}

/// Execute the blocks command
pub fn blocks_command(fields: &FieldState, page: Option<usize>) -> Result<String> {
    let doc = build_document(fields);
    let json = match page {
        Some(number) => {
            let page = doc
                .pages
                .iter()
                .find(|p| p.number == number)
                .ok_or_else(|| anyhow!("No page {} (the report has {})", number, doc.len()))?;
            serde_json::to_string_pretty(&page.blocks)?
        }
        None => serde_json::to_string_pretty(&doc)?,
    };
    Ok(json)
}

/// Execute the preview command
pub fn preview_command(fields: &FieldState, settings: &Settings, output: &Path) -> Result<()> {
    let doc = build_document(fields);
    let html = PreviewRenderer::new(settings.typography).render_document(&doc);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(output, html)
        .with_context(|| format!("Failed to write preview: {}", output.display()))?;
    Ok(())
}

/// Path of an edited page inside the edit directory
pub fn edited_page_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("page-{}.html", number))
}

/// Execute the edit command
///
/// Each page gets its own edit session, populated once from the current
/// fields. Pages already on disk are left alone unless `force` is set, so
/// a second run does not discard edits. Returns the paths written.
pub fn edit_command(
    fields: &FieldState,
    settings: &Settings,
    dir: &Path,
    force: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create edit directory: {}", dir.display()))?;

    let doc = build_document(fields);
    let mut written = Vec::new();
    for page in &doc.pages {
        let path = edited_page_path(dir, page.number);
        if path.exists() && !force {
            info!(page = page.number, "keeping existing edited page");
            continue;
        }
        let mut session = EditSession::new(settings.editor.clone());
        session.populate(&page.blocks);
        fs::write(&path, session.to_html())
            .with_context(|| format!("Failed to write page: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Execute the export command
///
/// This is the single failure boundary for exports: whatever goes wrong
/// inside is logged and reported as "export failed", and no output file is
/// left behind.
pub fn export_command(
    format: ExportFormat,
    fields: &FieldState,
    settings: &Settings,
) -> Result<PathBuf> {
    export_inner(format, fields, settings).map_err(|e| {
        error!("export failed: {:#}", e);
        anyhow!("export failed")
    })
}

fn export_inner(format: ExportFormat, fields: &FieldState, settings: &Settings) -> Result<PathBuf> {
    let doc = export_document(fields, settings)?;
    info!(?format, source = ?settings.export.source, pages = doc.len(), "exporting");

    let bytes = match format {
        ExportFormat::Pdf => render_pdf(&doc, &settings.pdf_options())?,
        ExportFormat::Docx => DocxWriter::generate(&doc, &settings.docx_options()?)?,
    };

    let dir = &settings.export.output_dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let target = dir.join(format.file_name());
    write_atomically(dir, &target, &bytes)?;
    Ok(target)
}

/// The document an export works from, per the configured source
pub fn export_document(fields: &FieldState, settings: &Settings) -> Result<Document> {
    match settings.export.source {
        ExportSource::Fields => Ok(build_document(fields)),
        ExportSource::Editor => {
            let dir = &settings.export.edited_dir;
            let mut doc = Document::with_title(REPORT_TITLE);
            for number in 1..=PAGES.len() {
                let path = edited_page_path(dir, number);
                let html = fs::read_to_string(&path).with_context(|| {
                    format!(
                        "Edited page not found: {} (run `gpaudit edit` first)",
                        path.display()
                    )
                })?;
                let blocks = extract_html(&html)
                    .with_context(|| format!("Failed to read edited page: {}", path.display()))?;
                doc.push_page(blocks);
            }
            Ok(doc)
        }
    }
}

/// Write through a temp file in the target directory and rename on success
fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(bytes)
        .context("Failed to write export data")?;
    file.persist(target)
        .with_context(|| format!("Failed to save {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_arguments() {
        let cli = Cli::try_parse_from([
            "gpaudit",
            "--set",
            "income=1",
            "export",
            "--format",
            "pdf",
            "--strategy",
            "raster",
            "--source",
            "editor",
        ])
        .unwrap();
        assert_eq!(cli.set, vec!["income=1".to_string()]);
        match cli.command {
            Commands::Export {
                format,
                strategy,
                source,
                ..
            } => {
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(PdfStrategy::from(strategy.unwrap()), PdfStrategy::Raster);
                assert_eq!(ExportSource::from(source.unwrap()), ExportSource::Editor);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_export_requires_format() {
        assert!(Cli::try_parse_from(["gpaudit", "export"]).is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ExportFormat::Pdf.file_name(), "grama_panchayati_audit_report.pdf");
        assert_eq!(ExportFormat::Docx.file_name(), "grama_panchayati_audit_report.docx");
    }

    #[test]
    fn test_blocks_for_missing_page() {
        assert!(blocks_command(&FieldState::default(), Some(9)).is_err());
    }
}
