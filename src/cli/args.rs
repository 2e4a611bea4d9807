//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Portfolio case-study renderer and ATS generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: folio.toml)
    #[arg(short = 'C', long, global = true, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a commented `folio.toml` template
    #[command(visible_alias = "i")]
    Init {
        /// Directory to initialize (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Pre-render every case study (plus sitemap and ATS markup)
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Render a single case study to stdout or a file
    #[command(visible_alias = "r")]
    Render {
        /// Project ID (key in the project index)
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Emit only the `article.case-study` fragment, without the page shell
        #[arg(short, long)]
        fragment: bool,
    },

    /// Generate ATS markup and inject it into the configured target
    #[command(visible_alias = "a")]
    Ats {
        /// Print the generated markup instead of injecting it
        #[arg(short, long)]
        dry_run: bool,

        /// Override `ats.target`
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        target: Option<PathBuf>,
    },

    /// Check the project index and detail files for schema problems
    #[command(visible_alias = "v")]
    Validate {
        /// Treat validation errors as warnings (exit 0)
        #[arg(long, short = 'w')]
        warn_only: bool,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Clean output directory completely before building
    #[arg(short, long)]
    pub clean: bool,

    /// Minify the HTML content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Enable sitemap generation
    #[arg(short = 'S', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Enable ATS generation
    #[arg(short = 'A', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub ats: Option<bool>,

    /// Override site URL for deployment.
    ///
    /// Example: folio build --site-url "https://jane.dev"
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from(["folio", "build", "-m", "false", "--sitemap", "-V"]).unwrap();
        assert!(cli.verbose);
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.minify, Some(false));
        assert_eq!(build_args.sitemap, Some(true));
        assert_eq!(build_args.ats, None);
    }

    #[test]
    fn test_parse_render_with_alias() {
        let cli = Cli::try_parse_from(["folio", "-C", "site/folio.toml", "r", "acme", "--fragment"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("site/folio.toml"));
        assert!(matches!(
            cli.command,
            Commands::Render { ref id, fragment: true, .. } if id == "acme"
        ));
    }

    #[test]
    fn test_default_config_name() {
        let cli = Cli::try_parse_from(["folio", "validate"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("folio.toml"));
        assert!(matches!(cli.command, Commands::Validate { warn_only: false }));
    }
}
