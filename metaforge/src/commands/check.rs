use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use metaforge_model::IssueSeverity;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the model file (defaults to ./model.json)
    #[arg(short, long, default_value = "model.json")]
    pub model: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let model = metaforge_model::parse_file(&self.model).unwrap_or_exit();

        let issues = metaforge_model::validate(&model);
        let mut has_errors = false;
        for issue in &issues {
            let severity = match issue.severity {
                IssueSeverity::Error => {
                    has_errors = true;
                    "error"
                }
                IssueSeverity::Warning => "warning",
            };
            eprintln!("{}: {}", severity, issue.message);
            if let Some(location) = &issue.location {
                eprintln!("  --> {}", location);
            }
        }

        if has_errors {
            std::process::exit(1);
        }

        if !issues.is_empty() {
            println!();
        }

        println!("✓ {} is valid\n", self.model.display());
        println!("  {} ({} classes)", model.name, model.classes.len());
        for class in &model.classes {
            let stereotypes: Vec<&str> = class
                .stereotypes
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            println!(
                "    {} [{}] ({} attributes)",
                class.qualified_name(),
                stereotypes.join(", "),
                class.attributes.len()
            );
        }

        Ok(())
    }
}
