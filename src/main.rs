//! Folio - case-study renderer and ATS generator for portfolio sites.

mod assemble;
mod cli;
mod config;
mod content;
mod dom;
mod generator;
mod logger;
mod render;
mod seo;
mod utils;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::FolioConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // init runs before any config exists
    if let Commands::Init { name, force } = &cli.command {
        let cwd = std::env::current_dir().context("cannot read current directory")?;
        let root = name.as_ref().map_or_else(|| cwd.clone(), |name| cwd.join(name));
        let config_name = cli.config.file_name().map_or(Path::new("folio.toml"), Path::new);
        return cli::init::new_project(&root, config_name, *force);
    }

    let config = FolioConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Build { build_args } => {
            cli::build::build_site(&config, build_args.clean, false).map(|_| ())
        }
        Commands::Render {
            id,
            output,
            fragment,
        } => cli::render::render_project(&config, id, output.as_deref(), *fragment),
        Commands::Ats { dry_run, .. } => cli::ats::generate_ats(&config, *dry_run),
        Commands::Validate { warn_only } => cli::validate::validate_content(&config, *warn_only),
    }
}
