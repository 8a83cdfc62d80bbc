use clap::Parser;

use super::{CommonArgs, Section};

/// Run the full sequence: summation timing, then eager vs. lazy memory
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl RunArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        self.common.execute(&[Section::Time, Section::Memory])
    }
}
