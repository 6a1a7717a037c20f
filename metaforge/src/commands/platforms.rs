use clap::Args;
use eyre::Result;

use super::builtin_platforms;

#[derive(Args)]
pub struct PlatformsCommand {}

impl PlatformsCommand {
    /// Run the platforms command
    pub fn run(&self) -> Result<()> {
        let registry = builtin_platforms();
        println!("Available platforms:");
        for name in registry.names() {
            println!("  {}", name);
        }
        Ok(())
    }
}
