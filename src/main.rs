use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use tagreader::{
    utils::{format_json, format_xml, parse_xml_file, read_file, write_file},
    xml::{self, StringifyOptions},
    HtmlReader,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Locate tags in an HTML file
    Html(HtmlArgs),
    /// Parse an XML file
    Xml {
        /// Input file path
        file: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = XmlOutput::Json)]
        to: XmlOutput,
    },
    /// Write a keyed JSON object as XML
    Json2xml {
        /// Input file path
        file: String,
    },
}

#[derive(Debug, ClapArgs)]
struct HtmlArgs {
    /// Input file path
    file: String,
    /// Selector path, e.g. `div.box a img[src|alt]`
    selector: String,
    /// Return every match of the last segment
    #[arg(short, long)]
    all: bool,
    /// Print the markup between the tags
    #[arg(long, conflicts_with = "outer")]
    inner: bool,
    /// Print the markup including the tags
    #[arg(long)]
    outer: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum XmlOutput {
    Json,
    Xml,
}

fn main() {
    // Initialize the default subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let formatted_output = match &args.command {
        Command::Html(html_args) => run_html(html_args)?,
        Command::Xml { file, to } => {
            info!("Reading file: {}", file);
            let tree = parse_xml_file(file)?;
            match to {
                XmlOutput::Json => format_json(&tree)?,
                XmlOutput::Xml => format_xml(&tree),
            }
        }
        Command::Json2xml { file } => {
            info!("Reading file: {}", file);
            let content = read_file(file)?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON in {file}"))?;
            xml::stringify_value(&value, &StringifyOptions::default())?
        }
    };

    // Write to file or print to stdout
    if let Some(output_path) = &args.output {
        write_file(output_path, &formatted_output)?;
    } else {
        println!("{formatted_output}");
    }

    Ok(())
}

fn run_html(args: &HtmlArgs) -> Result<String> {
    info!("Reading file: {}", args.file);
    let html = read_file(&args.file)?;
    let mut reader = HtmlReader::from(html.as_str());

    if args.all {
        reader.find_all(&args.selector).pin("matches");
    } else {
        reader.find_one(&args.selector);
    }

    if !args.inner && !args.outer {
        let data = reader.data(None);
        return serde_json::to_string_pretty(&data).context("failed to encode result");
    }

    let count = if args.all {
        reader.results().map_or(0, |found| found.len())
    } else {
        1
    };

    let parts: Vec<&str> = (0..count)
        .map(|index| {
            if args.all {
                reader.from_pin("matches").item(index);
            }
            if args.inner {
                reader.inner_data(None)
            } else {
                reader.outer_data(None)
            }
        })
        .collect();

    Ok(parts.join("\n"))
}
