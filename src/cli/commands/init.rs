//! Init command - Write a configuration file from a preset

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Select};
use std::fs;
use std::path::Path;

use super::InitArgs;
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::config::loader::CONFIG_FILENAME;
use crate::config::{Config, Preset};
use crate::error::{ActionsGateError, ConfigError};
use crate::utils::prerequisites::{display_report, run_all_checks};

pub async fn execute(args: InitArgs, global: &GlobalArgs) -> Result<i32> {
    let config_path = global
        .config
        .clone()
        .unwrap_or_else(|| Path::new(CONFIG_FILENAME).to_path_buf());

    // Resolve the preset first so a typo fails before anything is touched
    let preset = match args.preset.as_deref() {
        Some(name) => Preset::from_name(name).ok_or_else(|| {
            ActionsGateError::Config(ConfigError::UnknownPreset {
                name: name.to_string(),
            })
        })?,
        None if args.non_interactive => Preset::Restricted,
        None => select_preset()?,
    };

    if config_path.exists() && !args.force {
        if args.non_interactive {
            eprintln!(
                "{} {} already exists. Use --force to overwrite.",
                "Error:".red().bold(),
                config_path.display()
            );
            return Ok(exit_codes::ERROR);
        }

        let overwrite = Confirm::new()
            .with_prompt("Configuration file already exists. Overwrite?")
            .default(false)
            .interact()?;

        if !overwrite {
            println!("{}", "Aborted.".yellow());
            return Ok(exit_codes::SUCCESS);
        }
    }

    let config = Config::from_preset(preset, global.org.clone());

    if !args.skip_checks {
        let report = run_all_checks(&config.github);
        display_report(&report);
        if !report.all_required_passed() {
            println!(
                "{} Some prerequisites are missing; {} will be written anyway.",
                "Warning:".yellow().bold(),
                config_path.display()
            );
        }
    }

    let content = config.to_toml()?;
    fs::write(&config_path, &content).with_context(|| {
        format!(
            "Failed to write configuration file {}",
            config_path.display()
        )
    })?;

    println!(
        "{} Created {} with preset '{}'",
        "Success:".green().bold(),
        config_path.display().to_string().cyan(),
        preset.name().yellow()
    );

    println!("\nNext steps:");
    if config.policy.organization.is_none() {
        println!(
            "  - Set {} in {} (or pass {})",
            "policy.organization".cyan(),
            config_path.display(),
            "--org".cyan()
        );
    }
    println!("  - Run {} to compare with GitHub", "actionsgate plan".cyan());
    println!("  - Run {} to write the policy", "actionsgate apply".cyan());

    Ok(exit_codes::SUCCESS)
}

fn select_preset() -> Result<Preset> {
    let descriptions: Vec<&str> = Preset::ALL.iter().map(|p| p.description()).collect();

    let selection = Select::new()
        .with_prompt("Select a preset")
        .items(&descriptions)
        .default(1)
        .interact()?;

    Ok(Preset::ALL
        .get(selection)
        .copied()
        .unwrap_or(Preset::Restricted))
}
