//! Shared CLI definitions for chartslot.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Output format for a rendered chart slot.
/// When `--format` is not specified, format is detected from the `--output` extension (default: svg).
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    /// Scalable vector graphics (raw vector document)
    Svg,
    /// Encapsulated PostScript (converted document)
    Eps,
    /// Tab-separated values of the chart data
    Tsv,
    /// PNG raster image (requires --output)
    Png,
}

impl ExportFormat {
    /// Detect format from path extension. Returns None when extension is missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse format from extension string (e.g. "svg", "eps").
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "eps" | "ps" => Some(Self::Eps),
            "tsv" | "txt" => Some(Self::Tsv),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Eps => "eps",
            Self::Tsv => "tsv",
            Self::Png => "png",
        }
    }
}

/// Command-line arguments for chartslot
#[derive(Clone, Parser, Debug)]
#[command(
    name = "chartslot",
    version,
    about = "Render one dashboard chart slot from a JSON fixture"
)]
pub struct Args {
    /// Path to the chart fixture (JSON with chartMeta, title, payload and filters).
    /// Not required with --generate-config
    #[arg(required_unless_present = "generate_config", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output format (svg, eps, tsv, png). Defaults to the --output extension, else svg
    #[arg(long = "format", value_enum)]
    pub format: Option<ExportFormat>,

    /// Write the export to this file instead of stdout
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Render as this chart kind instead of the fixture's nominal kind (e.g. PIE_CHART, TABLE, BAR_CHART)
    #[arg(long = "kind", value_name = "KIND")]
    pub kind: Option<String>,

    /// Start with the log-scale header toggle checked; does not change the exported drawing
    #[arg(long = "log-scale", action)]
    pub log_scale: bool,

    /// Tracing filter directive (overrides config [logging] filter and RUST_LOG). Example: chartslot=debug
    #[arg(long = "log-filter", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Generate default configuration file at ~/.config/chartslot/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

impl Args {
    /// Effective export format: explicit flag, then output extension, then svg.
    pub fn export_format(&self) -> ExportFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(ExportFormat::from_path))
            .unwrap_or(ExportFormat::Svg)
    }
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if placeholder.is_empty() || !arg.get_action().takes_values() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
