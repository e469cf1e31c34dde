//! outpdf CLI - document outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use outpdf::{BatchOptions, JsonFormat, OutlineConfig, PdfParser};

#[derive(Parser)]
#[command(name = "outpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document outlines (title + headings) from PDF to JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of a single PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Maximum word count for style-derived headings
        #[arg(long)]
        max_heading_words: Option<usize>,
    },

    /// Process every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "./output")]
        output: PathBuf,

        /// Maximum accepted page count per document
        #[arg(long, default_value = "50")]
        max_pages: u32,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            input,
            output,
            compact,
            max_heading_words,
        }) => cmd_outline(&input, output.as_deref(), compact, max_heading_words),
        Some(Commands::Batch {
            input,
            output,
            max_pages,
            compact,
        }) => cmd_batch(&input, &output, max_pages, compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_outline(&input, cli.output.as_deref(), false, None)
            } else {
                println!("{}", "Usage: outpdf <FILE> [-o OUTPUT]".yellow());
                println!("       outpdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    max_heading_words: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = OutlineConfig::new();
    if let Some(words) = max_heading_words {
        config = config.with_max_heading_words(words);
    }

    let outline = outpdf::extract_outline_with_config(input, &config)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = outpdf::render::to_json(&outline, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    max_pages: u32,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let options = BatchOptions::new()
        .with_max_pages(max_pages)
        .with_format(format);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Processing {}...", input.display()));

    let summary = outpdf::process_dir(input, output, &options)?;

    pb.finish_and_clear();

    println!(
        "{} {} of {} documents processed",
        "Done!".green().bold(),
        summary.processed.len(),
        summary.total()
    );

    if !summary.failed.is_empty() {
        println!();
        println!("{}", "Failures:".yellow().bold());
        for (path, message) in &summary.failed {
            println!("  {} {}: {}", "✗".red(), path.display(), message);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let metadata = parser.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    let toc = parser.toc_entries();
    if !toc.is_empty() {
        println!("{}: {}", "Bookmarks".bold(), toc.len());
    }

    println!();
    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let outline = outpdf::parse_to_outline(&parser, &OutlineConfig::default());
    if outline.title.is_empty() {
        println!("{}: {}", "Title".bold(), "(none detected)".dimmed());
    } else {
        println!("{}: {}", "Title".bold(), outline.title);
    }
    println!("{}: {}", "Headings".bold(), outline.headings.len());

    for heading in outline.headings.iter().take(10) {
        let indent = match heading.level {
            outpdf::HeadingLevel::H1 => "",
            outpdf::HeadingLevel::H2 => "  ",
            outpdf::HeadingLevel::H3 => "    ",
        };
        println!(
            "  {}{} {}",
            indent,
            heading.text,
            format!("(p.{})", heading.page).dimmed()
        );
    }
    if outline.headings.len() > 10 {
        println!("  {} more...", outline.headings.len() - 10);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "outpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/outpdf".dimmed());
    println!("License: MIT");
}
