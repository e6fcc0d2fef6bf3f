mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kotoba=warn,kotoba_core=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match args.command {
        Command::Extract { input_dir, output_dir } => {
            commands::extract::run(&input_dir, &output_dir)
        }
        Command::Audit { output_dir } => {
            commands::audit::run(&output_dir)
        }
        Command::Compile { original_dir, translated_dir, output_dir, expand } => {
            commands::compile::run(&original_dir, &translated_dir, &output_dir, expand)
        }
    }
}
