//! teiconv CLI - compile annotated pages into TEI documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use teiconv::{
    header_from_json, merge_trees, page_from_json, parse_xml, render, validate_logged,
    DocumentStats, Element, RenderOptions, RetentionConfig, StructuralValidator,
};

#[derive(Parser)]
#[command(name = "teiconv")]
#[command(version)]
#[command(about = "Compile UDPipe, NameTag and ALTO annotated pages into TEI XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a teiHeader from a JSON metadata record
    Header {
        /// Input JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Build a page div from a JSON page record
    Page {
        /// Input JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Merge header and page XML artifacts into one TEI document
    Merge {
        /// Header XML file
        #[arg(long, value_name = "FILE")]
        header: PathBuf,

        /// Page XML files, in reading order
        #[arg(long = "page", value_name = "FILE", required = true, num_args = 1..)]
        pages: Vec<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Convert JSON records straight to a TEI document
    Convert {
        /// Header JSON file
        #[arg(long, value_name = "FILE")]
        header: PathBuf,

        /// Page JSON files, in reading order
        #[arg(long = "page", value_name = "FILE", required = true, num_args = 1..)]
        pages: Vec<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show statistics of a TEI document or page artifact
    Info {
        /// Input XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Retention filters; each is a comma-separated list of retained entries.
#[derive(Args)]
struct FilterArgs {
    /// Retained NameTag group codes (e.g. "p,g,t")
    #[arg(long, env = "TEICONV_NAME_TAG")]
    name_tag: Option<String>,

    /// Retained UDPipe attributes (e.g. "lemma,pos")
    #[arg(long, env = "TEICONV_UDPIPE")]
    udpipe: Option<String>,

    /// Retained ALTO fields (e.g. "hpos,vpos,width,height")
    #[arg(long, env = "TEICONV_ALTO")]
    alto: Option<String>,
}

impl FilterArgs {
    fn config(&self) -> RetentionConfig {
        RetentionConfig::from_filters(
            self.name_tag.as_deref(),
            self.udpipe.as_deref(),
            self.alto.as_deref(),
        )
    }
}

#[derive(Args)]
struct RenderArgs {
    /// Spaces per indentation level
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Omit the XML declaration
    #[arg(long)]
    no_declaration: bool,
}

impl RenderArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_indent(self.indent)
            .with_declaration(!self.no_declaration)
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Header {
            input,
            output,
            render,
        }) => cmd_header(&input, output.as_deref(), &render.options()),
        Some(Commands::Page {
            input,
            output,
            render,
        }) => cmd_page(&input, output.as_deref(), &render.options()),
        Some(Commands::Merge {
            header,
            pages,
            filters,
            output,
            render,
        }) => cmd_merge(
            &header,
            &pages,
            &filters.config(),
            output.as_deref(),
            &render.options(),
        ),
        Some(Commands::Convert {
            header,
            pages,
            filters,
            output,
            render,
        }) => cmd_convert(
            &header,
            &pages,
            &filters.config(),
            output.as_deref(),
            &render.options(),
        ),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!(
                "{}",
                "Usage: teiconv <header|page|merge|convert|info> ...".yellow()
            );
            println!("       teiconv --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(xml: &str, output: Option<&Path>) -> CliResult {
    if let Some(path) = output {
        fs::write(path, xml)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", xml);
    }
    Ok(())
}

fn progress_bar(len: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn cmd_header(input: &Path, output: Option<&Path>, options: &RenderOptions) -> CliResult {
    let header = header_from_json(&fs::read_to_string(input)?)?;
    write_output(&render::to_xml(&header, options)?, output)
}

fn cmd_page(input: &Path, output: Option<&Path>, options: &RenderOptions) -> CliResult {
    let page = page_from_json(&fs::read_to_string(input)?)?;
    write_output(&render::to_xml(&page, options)?, output)
}

fn cmd_merge(
    header: &Path,
    pages: &[PathBuf],
    config: &RetentionConfig,
    output: Option<&Path>,
    options: &RenderOptions,
) -> CliResult {
    log::debug!("Reading header artifact {}", header.display());
    let header = parse_xml(&fs::read_to_string(header)?)?;
    let pb = progress_bar(pages.len())?;

    let mut trees = Vec::with_capacity(pages.len());
    for path in pages {
        pb.set_message(display_name(path));
        trees.push(parse_xml(&fs::read_to_string(path)?)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    finish_document(header, trees, config, output, options)
}

fn cmd_convert(
    header: &Path,
    pages: &[PathBuf],
    config: &RetentionConfig,
    output: Option<&Path>,
    options: &RenderOptions,
) -> CliResult {
    let header = header_from_json(&fs::read_to_string(header)?)?;
    let pb = progress_bar(pages.len())?;

    let mut trees = Vec::with_capacity(pages.len());
    for path in pages {
        pb.set_message(display_name(path));
        trees.push(page_from_json(&fs::read_to_string(path)?)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    finish_document(header, trees, config, output, options)
}

fn finish_document(
    header: Element,
    pages: Vec<Element>,
    config: &RetentionConfig,
    output: Option<&Path>,
    options: &RenderOptions,
) -> CliResult {
    log::info!("Merging {} pages", pages.len());
    let document = merge_trees(header, pages, config);
    let xml = render::to_xml(&document, options)?;
    if !validate_logged(&xml, &StructuralValidator) {
        eprintln!("{}", "Document failed structural validation".yellow());
    }
    write_output(&xml, output)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_info(input: &Path, json: bool) -> CliResult {
    let root = parse_xml(&fs::read_to_string(input)?)?;
    let stats = DocumentStats::collect(&root);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Root".bold(), root.name);
    if let Some(title) = root.find("title") {
        println!("{}: {}", "Title".bold(), title.text_or_empty());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Sentences".bold(), stats.sentence_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Punctuation".bold(), stats.punctuation_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Entities".bold(), stats.entity_count);
    println!("{}: {}", "Zones".bold(), stats.zone_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "teiconv".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Annotated page to TEI compiler");
}
