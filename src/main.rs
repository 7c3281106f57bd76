//! Reckon - a command-line spreadsheet calculator

mod config;
mod logging;

use anyhow::{Context, Result, bail};
use reckon_core::{CellRef, Spreadsheet};
use reckon_engine::engine::{ExpressionTree, format_number};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: reckon [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.rsk)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <CELL=TEXT>     Set a cell before printing (can be repeated)");
    eprintln!("  -c, --command <FORMULA>   Evaluate a constant formula and print the result");
    eprintln!("  -o, --output <FILE>       Save the sheet to FILE");
    eprintln!("  --config <FILE>           Read settings from FILE");
    eprintln!("  -v, --verbose             Log more (can be repeated)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Args {
    file_path: Option<PathBuf>,
    edits: Vec<String>,
    command: Option<String>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    verbosity: usize,
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args::default();

    let value_for = |i: usize, flag: &str, what: &str| -> String {
        match args.get(i) {
            Some(value) => value.clone(),
            None => {
                eprintln!("Error: {} requires {}", flag, what);
                std::process::exit(1);
            }
        }
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-s" | "--set" => {
                i += 1;
                parsed.edits.push(value_for(i, "--set", "CELL=TEXT"));
            }
            "-c" | "--command" => {
                i += 1;
                parsed.command = Some(value_for(i, "--command", "a formula"));
            }
            "-o" | "--output" => {
                i += 1;
                parsed.output_file = Some(PathBuf::from(value_for(i, "--output", "a file path")));
            }
            "--config" => {
                i += 1;
                parsed.config_file = Some(PathBuf::from(value_for(i, "--config", "a file path")));
            }
            "-v" | "--verbose" => parsed.verbosity += 1,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if parsed.file_path.is_none() {
                    parsed.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }
    parsed
}

/// Evaluate a formula that references no cells.
fn evaluate_constant(formula: &str) -> Result<String> {
    let body = formula.strip_prefix('=').unwrap_or(formula);
    let tree = ExpressionTree::parse(body)?;
    if let Some(name) = tree.variables().first() {
        bail!("cell reference {} is not allowed in --command", name);
    }
    Ok(format_number(tree.evaluate()?))
}

fn apply_edit(sheet: &mut Spreadsheet, edit: &str) -> Result<()> {
    let Some((name, text)) = edit.split_once('=') else {
        bail!("--set expects CELL=TEXT, got {:?}", edit);
    };
    let cell_ref: CellRef = name
        .trim()
        .parse()
        .with_context(|| format!("invalid cell in --set {:?}", edit))?;
    if !sheet.contains(&cell_ref) {
        let (rows, cols) = sheet.dimensions();
        bail!("{} is outside the {}x{} grid", cell_ref, rows, cols);
    }
    if let Err(err) = sheet.set_text(cell_ref, text) {
        // The cell keeps its error marker; later edits may still fix it.
        eprintln!("Warning: {}", err);
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if let Some(path) = &args.config_file
        && !path.exists()
    {
        bail!("config file not found: {}", path.display());
    }
    let (config, warnings) = config::load_config(args.config_file.as_deref());
    logging::init(logging::bump_level(config.log_level, args.verbosity));
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(formula) = &args.command {
        println!("{}", evaluate_constant(formula)?);
        return Ok(());
    }

    let mut sheet = Spreadsheet::new(config.rows, config.columns)
        .context("failed to create the sheet")?;
    if let Some(path) = &args.file_path {
        sheet
            .load_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    for edit in &args.edits {
        apply_edit(&mut sheet, edit)?;
    }

    if let Some(output_path) = &args.output_file {
        sheet
            .save_file_as(output_path)
            .with_context(|| format!("failed to save {}", output_path.display()))?;
        eprintln!("Saved to {}", output_path.display());
    }

    for (cell_ref, cell) in sheet.modified_cells() {
        println!("{}\t{}\t{}", cell_ref, cell.text, cell.value);
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
