mod config;
mod error;
mod fetch;
mod install;
mod npm;
mod optimize;
mod platform;
mod process;
mod resolve;
mod tar;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::InstallConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "binstrap")]
#[command(author, version, about = "Bootstraps a platform-specific native binary from optional npm packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct PackageArgs {
    /// Registry scope owning the platform packages, e.g. @acme
    #[arg(long)]
    owner: String,

    /// Command / metapackage name, e.g. tool
    #[arg(long)]
    package: String,

    /// Exact version of the platform packages
    #[arg(long)]
    version: String,

    /// Registry base URL
    #[arg(long, default_value = "https://registry.npmjs.org")]
    registry: String,

    /// Package manager program to invoke
    #[arg(long, default_value = "npm")]
    npm: String,

    /// Directory whose node_modules tree is installed into
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the platform binary, falling back across acquisition tiers
    Install {
        #[command(flatten)]
        package: PackageArgs,

        /// Skip the best-effort bin/ relocation after a successful install
        #[arg(long)]
        no_optimize: bool,
    },

    /// Relocate an installed binary into the shared bin/ layout
    Optimize {
        #[command(flatten)]
        package: PackageArgs,
    },
}

impl PackageArgs {
    fn into_config(self) -> InstallConfig {
        InstallConfig {
            owner: self.owner,
            module: self.package,
            version: self.version,
            registry: self.registry,
            npm_program: self.npm,
            root: self.root,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }
    }
    let cli = Cli::parse();
    if cli.verbose {
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match cli.command {
        Commands::Install {
            package,
            no_optimize,
        } => {
            let config = package.into_config();
            let exe = install::install(&config).await?;
            println!("{} Installed {}", "✓".green(), exe.display());

            if !no_optimize {
                // Advisory: a failure here does not invalidate the install.
                match optimize::optimize(&config, &exe) {
                    Ok(primary) => {
                        println!("{} Linked {}", "✓".green(), primary.display());
                    }
                    Err(err) => {
                        eprintln!("{} {}", "warning:".yellow(), err);
                    }
                }
            }
        }
        Commands::Optimize { package } => {
            let config = package.into_config();
            let candidates = platform::supported_platforms(&config.module);
            let exe = candidates
                .iter()
                .find_map(|candidate| resolve::locate(&config, candidate))
                .ok_or_else(|| {
                    anyhow::anyhow!("no installed binary found for \"{}\"", config.module)
                })?;
            let primary = optimize::optimize(&config, &exe)?;
            println!("{} Linked {}", "✓".green(), primary.display());
        }
    }

    Ok(())
}
