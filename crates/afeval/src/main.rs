//! afeval - evaluate app functions exposed over MCP.
//!
//! Drives a tool-calling Gemini agent against a stdio MCP server, one
//! test case at a time, then grades the recorded traces.
//!
//! # Usage
//!
//! ```bash
//! # Run the default test_cases.json against an app package
//! afeval --package com.example.app
//!
//! # Different model and case file, JSON summary for scripting
//! afeval --package com.example.app --model gemini-2.5-pro \
//!     --test-cases cases/smoke.json --json
//! ```

mod args;
mod cases;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use afeval_evals::metrics::{McpUseMetric, ToolCorrectnessMetric};
use afeval_evals::{evaluate, Metric};
use afeval_harness::{BatchRunner, EvalEnv, RunnerConfig};
use afeval_mcp::ToolServerConfig;

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let specs = cases::load_test_cases(&args.test_cases)?;
    println!("Found {} test cases.", specs.len());

    // Credentials are resolved once, here; deeper components receive them
    // explicitly and never re-read the environment.
    let env = EvalEnv::from_env();

    let server = ToolServerConfig::new(
        "node",
        vec!["build/index.js".to_string(), args.package.clone()],
    );
    let mut config = RunnerConfig::new(args.model.clone(), server);
    config.show_progress = !args.json && !args.verbose;

    let runner = BatchRunner::new(config, &env)?;
    let traces = runner.run(&specs).await;

    // Snapshot the traces for --output before grading consumes them.
    let traces_json = match &args.output {
        Some(_) => Some(serde_json::to_value(&traces)?),
        None => None,
    };

    println!("Running evaluations...");
    let Some(judge_api_key) = env.judge_api_key else {
        println!(
            "Error: GOOGLE_API_KEY or GEMINI_API_KEY environment variable is not set. \
             Please set it to run evaluations with Gemini."
        );
        return Ok(());
    };

    let metrics: Vec<Box<dyn Metric>> = vec![
        Box::new(McpUseMetric::new(&args.model, judge_api_key)),
        Box::new(ToolCorrectnessMetric::new()),
    ];

    let summary = evaluate(traces, &metrics).await;

    if args.json {
        println!("{}", serde_json::to_string(&summary.to_json())?);
    } else {
        summary.print_summary(&mut std::io::stdout())?;
    }

    if let Some(path) = &args.output {
        let doc = serde_json::json!({
            "summary": summary.to_json(),
            "traces": traces_json,
        });
        std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("afeval={}", log_level).parse().unwrap())
                .add_directive(format!("afeval_mcp={}", log_level).parse().unwrap())
                .add_directive(format!("afeval_harness={}", log_level).parse().unwrap())
                .add_directive(format!("afeval_evals={}", log_level).parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
