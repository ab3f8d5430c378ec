//! pptable CLI - render CSV and JSON data as PowerPoint tables
//!
//! Converts a data file into a one-slide presentation, inspects the tables of
//! an existing presentation, or formats a single value.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use pptable::render::JsonFormat;
use pptable::{DataFrame, Length, PresentationReader, TableOptions, TitleOptions, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Render tabular data as formatted PowerPoint tables
#[derive(Parser)]
#[command(
    name = "pptable",
    author = "iyulab",
    version,
    about = "Render CSV and JSON data as PowerPoint tables",
    long_about = "pptable - render tabular data as formatted tables on PowerPoint slides.\n\n\
                  Reads CSV or split-oriented JSON and writes a .pptx with one table slide."
)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV or JSON data file to a presentation
    Convert {
        /// Input file (.csv or .json)
        input: PathBuf,

        /// Output presentation path
        #[arg(short, long)]
        output: PathBuf,

        /// Title text above the table
        #[arg(long)]
        title: Option<String>,

        /// Column holding the row labels
        #[arg(long)]
        index: Option<String>,

        /// Lay records out as columns with a label column
        #[arg(long)]
        transposed: bool,

        /// Format specification for each column, in order
        #[arg(long = "format", value_name = "SPEC")]
        formats: Vec<String>,

        /// Rounding directive for each column, in order (`-` for none)
        #[arg(long, value_name = "K", allow_hyphen_values = true)]
        rounding: Vec<Rounding>,

        /// Shape name of the table
        #[arg(long)]
        name: Option<String>,

        /// Leave cells unstyled
        #[arg(long)]
        white_background: bool,

        /// Cell font size in points
        #[arg(long, value_name = "PT")]
        font_size: Option<f64>,

        /// Left edge (e.g. 2cm, 1in, 36pt)
        #[arg(long)]
        left: Option<Length>,

        /// Top edge
        #[arg(long)]
        top: Option<Length>,

        /// Table width
        #[arg(long)]
        width: Option<Length>,

        /// Table height
        #[arg(long)]
        height: Option<Length>,

        /// Width of each leading column, in order
        #[arg(long = "col-width", value_name = "LENGTH")]
        col_widths: Vec<Length>,

        /// Height of each leading row, in order
        #[arg(long = "row-height", value_name = "LENGTH")]
        row_heights: Vec<Length>,

        /// JSON file with table options; flags override it
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,
    },

    /// Show the tables and text of a presentation
    Inspect {
        /// Presentation path
        input: PathBuf,

        /// Output JSON instead of text grids
        #[arg(long)]
        json: bool,

        /// Output compact JSON (no indentation)
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Format a single value
    Format {
        /// Value; integers and floats are detected
        value: String,

        /// Format specification
        #[arg(default_value = "")]
        spec: String,
    },
}

/// Per-column rounding argument; `-` or `none` skips the column.
#[derive(Clone, Copy, Debug)]
struct Rounding(Option<i32>);

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "-" | "none" => Ok(Rounding(None)),
            _ => s
                .parse()
                .map(|k| Rounding(Some(k)))
                .map_err(|_| format!("invalid rounding directive: {s}")),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            title,
            index,
            transposed,
            formats,
            rounding,
            name,
            white_background,
            font_size,
            left,
            top,
            width,
            height,
            col_widths,
            row_heights,
            options,
        } => {
            let mut frame = load_frame(&input)?;
            if let Some(column) = index {
                frame = frame
                    .set_index(&column)
                    .with_context(|| format!("cannot use column '{column}' as index"))?;
            }

            let mut table_options = match options {
                Some(path) => load_options(&path)?,
                None => TableOptions::default(),
            };
            table_options.transposed |= transposed;
            table_options.white_background |= white_background;
            if !formats.is_empty() {
                table_options.col_formatters = Some(formats);
            }
            if !rounding.is_empty() {
                table_options.rounding = Some(rounding.into_iter().map(|r| r.0).collect());
            }
            if name.is_some() {
                table_options.name = name;
            }
            if let Some(size) = font_size {
                table_options.font_size = size;
            }
            table_options.left = left.or(table_options.left);
            table_options.top = top.or(table_options.top);
            table_options.width = width.or(table_options.width);
            table_options.height = height.or(table_options.height);
            if !col_widths.is_empty() {
                table_options.col_widths = col_widths;
            }
            if !row_heights.is_empty() {
                table_options.row_heights = row_heights;
            }

            let title = title.map(TitleOptions::new);
            pptable::df_to_ppt(&frame, &output, &table_options, title.as_ref())
                .with_context(|| format!("failed to write {}", output.display()))?;

            let (rows, cols) = frame.shape();
            println!(
                "{} Wrote {}x{} table to {}",
                "✓".green().bold(),
                rows,
                cols,
                output.display()
            );
        }

        Commands::Inspect {
            input,
            json,
            compact,
        } => {
            let reader = PresentationReader::open(&input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            let doc = reader.parse()?;

            if json {
                let format = if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                };
                println!("{}", pptable::render::to_json(&doc, format)?);
            } else {
                println!("{}", "Presentation".cyan().bold());
                println!("{}", "─".repeat(40));
                println!(
                    "{}: {}",
                    "File".bold(),
                    input.file_name().unwrap_or_default().to_string_lossy()
                );
                if let Some(ref title) = doc.metadata.title {
                    println!("{}: {}", "Title".bold(), title);
                }
                if let Some(ref author) = doc.metadata.author {
                    println!("{}: {}", "Author".bold(), author);
                }
                println!("{}: {}", "Slides".bold(), doc.slides.len());
                println!("{}: {}", "Tables".bold(), doc.tables().count());
                println!();
                println!("{}", pptable::render::to_text(&doc));
            }
        }

        Commands::Format { value, spec } => {
            println!("{}", pptable::format_value(&Value::infer(&value), &spec));
        }
    }

    Ok(())
}

fn load_frame(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let frame = match extension.as_str() {
        "csv" => DataFrame::from_csv_path(path),
        "json" => DataFrame::from_json_path(path),
        other => bail!("unsupported input type '{}': expected .csv or .json", other),
    };
    frame.with_context(|| format!("failed to load {}", path.display()))
}

fn load_options(path: &Path) -> Result<TableOptions> {
    let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid options in {}", path.display()))
}
