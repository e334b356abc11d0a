//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Evaluate app functions exposed over MCP with a tool-calling agent
#[derive(Parser, Debug, Clone)]
#[command(name = "afeval")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to JSON file with test cases
    #[arg(long, default_value = "test_cases.json")]
    pub test_cases: PathBuf,

    /// App package name, e.g. com.example.app
    #[arg(long)]
    pub package: String,

    /// LLM to use as the agent (and for grading)
    #[arg(long, default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Output the evaluation summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Save the summary and full traces to a JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
