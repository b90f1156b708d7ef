//! Command structure for the `xltemplate` binary.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xltemplate")]
#[command(version, about = "Fill spreadsheet templates with values and row loops", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a template sheet and save the result
    Render(RenderArgs),

    /// List the placeholders and loop markers of a template sheet
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// Template workbook (.xlsx or JSON workbook)
    #[arg(short, long)]
    pub template: PathBuf,

    /// Settings file with values and loops (.json, .yaml or .yml)
    #[arg(short, long)]
    pub settings: PathBuf,

    /// Output file [default: <template>.rendered.<ext> next to the template]
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Sheet to render, 1-based
    #[arg(long, default_value_t = 1)]
    pub sheet: usize,

    /// Stop scanning each row at this column (exclusive), e.g. "C"
    #[arg(long, value_name = "COLUMN")]
    pub right_bound: Option<String>,

    /// Visit every column up to the sheet's last one, not only existing cells
    #[arg(long)]
    pub include_empty: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Template workbook (.xlsx or JSON workbook)
    #[arg(short, long)]
    pub template: PathBuf,

    /// Sheet to inspect, 1-based
    #[arg(long, default_value_t = 1)]
    pub sheet: usize,
}
