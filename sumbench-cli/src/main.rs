use clap::Parser;
use colored::Colorize;
use once_cell::sync::Lazy;
use sumbench_cli::Cli;

#[cfg(feature = "track-alloc")]
#[global_allocator]
static ALLOCATOR: sumbench::probe::TrackingAllocator = sumbench::probe::TrackingAllocator;

static CMD_ARGS: Lazy<Cli> = Lazy::new(|| {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    Cli::parse()
});

fn main() -> anyhow::Result<()> {
    Lazy::force(&CMD_ARGS);
    env_logger::init();
    if let Err(err) = sumbench_cli::entry(&CMD_ARGS) {
        eprintln!("❌ {}: {}", "ERROR".red().bold(), err.to_string().red());
        std::process::exit(1);
    }
    Ok(())
}
