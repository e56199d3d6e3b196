//! syd - Structured YAML Diff CLI tool
//!
//! A command line tool that reports the semantic differences between
//! two YAML files.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use structured_yaml_diff::{compare, node, CompareOptions, DiffKind, Difference};

/// Structure-aware comparison of YAML documents
#[derive(Parser)]
#[command(name = "syd")]
#[command(version)]
#[command(about = "Reports the semantic differences between two YAML files", long_about = None)]
struct Cli {
    /// Left-hand input file, '-' for stdin
    from: String,
    /// Right-hand input file, '-' for stdin
    to: String,

    /// Treat list reorderings as no change
    #[arg(long)]
    ignore_order_changes: bool,

    /// Compare strings after trimming leading/trailing whitespace
    #[arg(long)]
    ignore_whitespace_changes: bool,

    /// Suppress value modifications, keeping additions and removals
    #[arg(long)]
    ignore_value_changes: bool,

    /// Disable Kubernetes resource identity matching
    #[arg(long)]
    no_detect_kubernetes: bool,

    /// Extra identifier field for matching list entries (repeatable)
    #[arg(long = "additional-identifier", value_name = "FIELD")]
    additional_identifiers: Vec<String>,

    /// Exchange the two inputs
    #[arg(long)]
    swap: bool,

    /// Compare only the subtrees at this dotted path
    #[arg(long, value_name = "PATH")]
    chroot: Option<String>,

    /// Output style
    #[arg(long, value_enum, default_value_t = OutputFormat::Brief)]
    output: OutputFormat,

    /// Output location, '-' for stdout
    #[arg(short = 'o', long, value_name = "FILE", default_value = "-")]
    output_file: String,

    /// Exit with status 1 when differences were found
    #[arg(long)]
    set_exit_code: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One entry per difference with a change symbol
    Brief,
    /// Machine-readable JSON dump
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(found_differences) => {
            if cli.set_exit_code && found_differences {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    if cli.from == "-" && cli.to == "-" {
        return Err("only one input may come from stdin".into());
    }
    let from = read_input(&cli.from)?;
    let to = read_input(&cli.to)?;

    let mut opts = CompareOptions::new()
        .ignore_order_changes(cli.ignore_order_changes)
        .ignore_whitespace_changes(cli.ignore_whitespace_changes)
        .ignore_value_changes(cli.ignore_value_changes)
        .detect_kubernetes(!cli.no_detect_kubernetes)
        .swap(cli.swap);
    for field in &cli.additional_identifiers {
        opts = opts.additional_identifier(field.clone());
    }
    if let Some(path) = &cli.chroot {
        opts = opts.chroot(path.clone());
    }

    let diffs = compare(&from, &to, &opts)?;

    let mut output: Box<dyn Write> = if cli.output_file == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&cli.output_file).map_err(|e| {
            format!("failed to create output file {:?}: {}", cli.output_file, e)
        })?)
    };

    match cli.output {
        OutputFormat::Brief => render_brief(&diffs, &mut output)?,
        OutputFormat::Json => writeln!(output, "{}", serde_json::to_string_pretty(&diffs)?)?,
    }

    Ok(!diffs.is_empty())
}

fn read_input(path: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if path == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read(path).map_err(|e| format!("failed to read {:?}: {}", path, e))?)
    }
}

/// One difference per entry: a change symbol and the path, then the
/// values. Modifications and order changes print both sides in flow
/// form; additions and removals print the whole value as YAML.
fn render_brief(
    diffs: &[Difference],
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let multi_document = diffs.iter().any(|d| d.document_index > 0);
    let mut current_document = None;

    for diff in diffs {
        if multi_document && current_document != Some(diff.document_index) {
            current_document = Some(diff.document_index);
            writeln!(output, "document #{}", diff.document_index + 1)?;
        }

        let symbol = match diff.kind {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
            DiffKind::Modified => '~',
            DiffKind::OrderChanged => '@',
        };
        let path = if diff.path.is_empty() {
            "(root)".to_string()
        } else {
            diff.path.to_string()
        };
        writeln!(output, "{} {}", symbol, path)?;

        match diff.kind {
            DiffKind::Modified | DiffKind::OrderChanged => {
                if let Some(from) = &diff.from {
                    writeln!(output, "  from: {}", from)?;
                }
                if let Some(to) = &diff.to {
                    writeln!(output, "  to:   {}", to)?;
                }
            }
            DiffKind::Added => {
                if let Some(to) = &diff.to {
                    write_value_block(to, output)?;
                }
            }
            DiffKind::Removed => {
                if let Some(from) = &diff.from {
                    write_value_block(from, output)?;
                }
            }
        }
    }
    Ok(())
}

fn write_value_block(
    value: &node::Node,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    if value.is_map() || value.is_list() {
        for line in node::to_yaml(value)?.lines() {
            writeln!(output, "  {}", line)?;
        }
    } else {
        writeln!(output, "  {}", value)?;
    }
    Ok(())
}
