use clap::{Parser, Subcommand};

#[macro_use]
mod utils;
mod commands;
mod meta;

pub use commands::{CommonArgs, Section};

/// Loop vs. builtin summation and eager vs. lazy construction benchmarks
#[derive(Parser)]
#[command(version, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Options for the implicit `run` when no subcommand is given
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    Run(commands::run::RunArgs),
    Time(commands::time::TimeArgs),
    Memory(commands::memory::MemoryArgs),
}

/// Run the selected command. `sumbench` without a subcommand behaves like `sumbench run`.
pub fn entry(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Run(cmd)) => cmd.run(),
        Some(Commands::Time(cmd)) => cmd.run(),
        Some(Commands::Memory(cmd)) => cmd.run(),
        None => commands::run::RunArgs {
            common: cli.common.clone(),
        }
        .run(),
    }
}
