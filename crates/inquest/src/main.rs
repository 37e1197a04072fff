// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inquest - plan-and-reflect research assistant over a local paper corpus.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod run;
mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use inquest_config::InquestConfig;

/// Inquest - plan-and-reflect research assistant over a local paper corpus.
#[derive(Parser, Debug)]
#[command(name = "inquest", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one research question and print the result.
    Run(RunArgs),
    /// Start the HTTP gateway.
    Serve(ServeArgs),
    /// Manage Inquest configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Research question.
    #[arg(long)]
    pub query: String,
    /// Dataset path (defaults to `gateway.default_data_path`).
    #[arg(long)]
    pub data: Option<String>,
    /// Print the full JSON result.
    #[arg(long)]
    pub json: bool,
    /// Keep raw hit text in the result.
    #[arg(long)]
    pub full_trace: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    /// Default dataset for requests that omit `data_path`.
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate configuration and print diagnostics.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Result<InquestConfig, Vec<inquest_config::ConfigError>> {
    match path {
        Some(path) => inquest_config::load_and_validate_path(path),
        None => inquest_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            inquest_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Run(args) => {
            serve::init_tracing(&config.agent.log_level);
            run::run_query(config, args).await
        }
        Commands::Serve(args) => {
            serve::init_tracing(&config.agent.log_level);
            serve::run_serve(config, args).await
        }
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            print_config_summary(&config);
            Ok(())
        }
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn print_config_summary(config: &InquestConfig) {
    println!("inquest: configuration is valid");
    println!("  agent.name             = {}", config.agent.name);
    println!("  reasoner.provider      = {:?}", config.reasoner.provider);
    println!("  reasoner.model         = {}", config.reasoner.model);
    println!(
        "  reasoner.api_key       = {}",
        if config.reasoner.api_key.is_some() { "[set]" } else { "[unset]" }
    );
    println!("  retrieval.alpha        = {}", config.retrieval.alpha);
    println!("  orchestrator.replan_budget = {}", config.orchestrator.replan_budget);
    println!("  orchestrator.max_steps = {}", config.orchestrator.max_steps);
    println!("  gateway                = {}:{}", config.gateway.host, config.gateway.port);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "inquest",
            "run",
            "--query",
            "citation hallucination",
            "--data",
            "papers.json",
            "--json",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.query, "citation hallucination");
        assert_eq!(args.data.as_deref(), Some("papers.json"));
        assert!(args.json);
        assert!(!args.full_trace);
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::parse_from(["inquest", "config", "check", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = inquest_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "inquest");
    }
}
