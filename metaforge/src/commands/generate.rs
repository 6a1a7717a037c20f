use std::path::PathBuf;

use clap::Args;
use eyre::{Result, bail, eyre};
use metaforge_codegen::{Config, GenOptions, Pipeline};

use super::{UnwrapOrExit, builtin_platforms};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to metaforge.toml (defaults to ./metaforge.toml)
    #[arg(short, long, default_value = "metaforge.toml")]
    pub config: PathBuf,

    /// Path to the model file (overrides the config file)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Target platform name (overrides the config file)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Root directory containing platform trees (overrides the config file)
    #[arg(long)]
    pub platforms_dir: Option<PathBuf>,

    /// Output root directory (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Package path delimiter for the target ecosystem
    #[arg(long)]
    pub package_delimiter: Option<String>,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let config = Config::open_or_default(&self.config)?;
        let defaults = GenOptions::default();

        let platform_name = self
            .platform
            .clone()
            .or(config.generator.platform)
            .ok_or_else(|| {
                eyre!(
                    "no platform selected; pass --platform or set it in {}",
                    self.config.display()
                )
            })?;
        let model_path = self
            .model
            .clone()
            .or(config.generator.model)
            .unwrap_or_else(|| PathBuf::from("model.json"));

        let options = GenOptions {
            platform: platform_name.clone(),
            platforms_dir: self
                .platforms_dir
                .clone()
                .or(config.generator.platforms_dir)
                .unwrap_or(defaults.platforms_dir),
            output: self
                .output
                .clone()
                .or(config.generator.output)
                .unwrap_or(defaults.output),
            package_delimiter: self
                .package_delimiter
                .clone()
                .or(config.generator.package_delimiter)
                .unwrap_or(defaults.package_delimiter),
        };

        let mut registry = builtin_platforms();
        let Some(platform) = registry.take(&platform_name) else {
            bail!(
                "unknown platform '{}'; available: {}",
                platform_name,
                registry.names().join(", ")
            );
        };

        let model = metaforge_model::parse_file(&model_path).unwrap_or_exit();

        let report = Pipeline::new().run(model, platform, options.clone())?;

        for diag in &report.diagnostics {
            eprintln!("{diag}");
        }

        if report.written.is_empty() {
            println!("Nothing generated.");
        } else {
            println!(
                "Generated {} file(s) under {}:",
                report.written.len(),
                options.output.display()
            );
            for file in &report.written {
                println!("  + {} ({})", file.path.display(), file.mode);
            }
        }

        Ok(())
    }
}
