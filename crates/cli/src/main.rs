mod commands;
mod proxy;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wordtowallet_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "wordtowallet")]
#[command(version, about = "Sitemap, robots, translation and file-proxy tooling for the WordToWallet site", long_about = None)]
struct Cli {
    /// Path to the site configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Write a starter configuration and source message catalog
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate configuration, route tree and message catalogs
    Validate,

    /// Discover page routes and optionally write a route manifest
    Routes {
        /// Route tree to scan (defaults to routes.app_dir)
        #[arg(long)]
        app_dir: Option<PathBuf>,

        /// Write the manifest as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate sitemap.xml and robots.txt
    Build {
        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Skip backend slug sources (static routes only)
        #[arg(long)]
        offline: bool,
    },

    /// Maintain translation catalogs
    Translations {
        #[command(subcommand)]
        command: TranslationsCommand,
    },

    /// Serve the file proxy plus live sitemap.xml and robots.txt
    Serve {
        /// Port to serve on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
enum TranslationsCommand {
    /// Copy missing source-locale keys into every other locale
    Merge {
        /// Report changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// List missing keys per locale; fails when any are missing
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate => commands::validate::run(config).await,
        Command::Routes { app_dir, output } => commands::routes::run(config, app_dir, output).await,
        Command::Build { output, offline } => commands::build::run(config, output, offline).await,
        Command::Translations { command } => match command {
            TranslationsCommand::Merge { dry_run } => {
                commands::translations::merge(config, dry_run).await
            }
            TranslationsCommand::Check => commands::translations::check(config).await,
        },
        Command::Serve { port, host } => commands::serve::run(config, host, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "wordtowallet", &mut io::stdout());
            Ok(())
        }
    }
}
