//! filingdoc CLI - filing HTML inspection tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use filingdoc::{parse_html_with_options, to_json, Document, JsonFormat, Node, NodeKind, ParseOptions};

/// Characters of text shown per node in the summary.
const PREVIEW_CHARS: usize = 72;

#[derive(Parser)]
#[command(name = "filingdoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Show the document model of SEC filing HTML", long_about = None)]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print the document as JSON
    #[arg(long)]
    json: bool,

    /// Output compact JSON
    #[arg(long, requires = "json")]
    compact: bool,

    #[command(flatten)]
    parse: ParseArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct ParseArgs {
    /// Detect headings on bold, large-font divs
    #[arg(long, global = true)]
    div_headings: bool,

    /// Base font size in points for heading detection
    #[arg(long, global = true, env = "FILINGDOC_BASE_FONT_SIZE")]
    base_font_size: Option<f64>,

    /// Keep adjacent text blocks separate
    #[arg(long, global = true)]
    no_merge: bool,

    /// Fail instead of skipping markup nested deeper than the limit
    #[arg(long, global = true)]
    strict: bool,

    /// Maximum element nesting depth
    #[arg(long, global = true)]
    max_depth: Option<usize>,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .with_div_headings(self.div_headings)
            .with_merge(!self.no_merge);
        if let Some(size) = self.base_font_size {
            options = options.with_base_font_size(size);
        }
        if let Some(depth) = self.max_depth {
            options = options.with_max_depth(depth);
        }
        if self.strict {
            options = options.strict();
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a filing to JSON
    Json {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract plain text
    Text {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document statistics
    Info {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.parse.options();

    let result = match cli.command {
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact, options),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref(), options),
        Some(Commands::Info { input }) => cmd_info(&input, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: summarize if input is provided
            if let Some(input) = cli.input {
                if cli.json {
                    cmd_json(&input, None, cli.compact, options)
                } else {
                    cmd_summary(&input, options)
                }
            } else {
                println!("{}", "Usage: filingdoc <FILE>".yellow());
                println!("       filingdoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load(input: &Path, options: ParseOptions) -> Result<Document, Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    log::debug!("Read {} bytes from {}", html.len(), input.display());
    Ok(parse_html_with_options(&html, options)?)
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_summary(input: &Path, options: ParseOptions) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, options)?;

    if doc.is_empty() {
        println!("{}", "No content found".yellow());
        return Ok(());
    }

    for (index, node) in doc.iter().enumerate() {
        println!("{:>5} {}", index.to_string().dimmed(), summary_line(node));
    }

    Ok(())
}

fn summary_line(node: &Node) -> String {
    match node.kind() {
        NodeKind::Heading => {
            let level = node.level().unwrap_or(1);
            format!(
                "{} {}",
                format!("[h{}]", level).cyan().bold(),
                preview(&node.plain_text()).bold()
            )
        }
        NodeKind::TextBlock => format!("{} {}", "[text]".green(), preview(&node.plain_text())),
        NodeKind::Table => {
            let rows = node.rows().unwrap_or_default();
            let columns = rows.iter().map(|r| r.virtual_columns()).max().unwrap_or(0);
            let headers = rows.iter().filter(|r| r.is_header).count();
            format!(
                "{} {} rows x {} columns, {} header",
                "[table]".magenta(),
                rows.len(),
                columns,
                headers
            )
        }
    }
}

fn preview(text: &str) -> String {
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= PREVIEW_CHARS {
        return line;
    }
    let cut: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, options)?;
    write_or_print(output, &doc.plain_text())
}

fn cmd_info(input: &Path, options: ParseOptions) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Nodes".bold(), doc.len());

    let count = |kind: NodeKind| doc.iter().filter(|n| n.kind() == kind).count();
    println!("{}: {}", "Headings".bold(), count(NodeKind::Heading));
    println!("{}: {}", "Text blocks".bold(), count(NodeKind::TextBlock));
    println!("{}: {}", "Tables".bold(), count(NodeKind::Table));

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    let words: usize = text.split_whitespace().count();
    let cells: usize = doc
        .tables()
        .iter()
        .filter_map(|t| t.rows().ok())
        .flat_map(|rows| rows.iter())
        .map(|row| row.cells.len())
        .sum();

    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Table cells".bold(), cells);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "filingdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("SEC filing document model tool");
    println!();
    println!("License: MIT");
}
