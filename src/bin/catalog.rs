//! Command-line entry point for catalog generation and plugin maintenance.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use resource_catalog::history::GitHistory;
use resource_catalog::plugins::{self, Marketplace, PluginScaffolder, ScaffoldRequest};
use resource_catalog::readme::ReadmeGenerator;
use resource_catalog::{
    Catalog, PluginValidator, Registry, RegistryClient, RepositoryLayout, Result, Settings,
    SettingsLoader, WebsiteData,
};

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Generate website data, READMEs and plugin artifacts for a resource repository"
)]
struct Cli {
    /// Repository root.
    #[arg(long, env = "CATALOG_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the website JSON data files and search index.
    WebsiteData,

    /// Regenerate the category READMEs and the featured plugins section.
    Readme,

    /// Write the plugin marketplace manifest.
    Marketplace,

    /// Validate every plugin manifest.
    Validate,

    /// Copy referenced agents, commands and skills into each plugin folder.
    Materialize,

    /// Remove materialized content from plugin folders.
    Clean,

    /// Scaffold a new plugin folder.
    CreatePlugin {
        /// Plugin id: lowercase letters, digits and hyphens.
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma-separated keywords.
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the command completed but found problems.
async fn run(cli: Cli) -> Result<bool> {
    let root = cli.root;
    let layout = RepositoryLayout::new(&root);
    let settings = SettingsLoader::new().load(&root)?;

    match cli.command {
        Command::WebsiteData => website_data(&root, &layout, &settings),
        Command::Readme => readme(&root, &layout, &settings).await,
        Command::Marketplace => {
            Marketplace::build(&layout, &settings.marketplace)?.write(&layout)?;
            Ok(true)
        }
        Command::Validate => Ok(validate(&layout)),
        Command::Materialize => {
            let summary = plugins::materialize(&layout)?;
            println!(
                "Materialized {} agents, {} commands, {} skills ({} warnings)",
                summary.agents, summary.commands, summary.skills, summary.warnings
            );
            Ok(true)
        }
        Command::Clean => {
            let summary = plugins::clean(&layout)?;
            for (plugin, dir, files) in &summary.removed {
                println!("Removed {plugin}/{dir} ({files} files)");
            }
            println!(
                "Cleaned {} directories, {} files",
                summary.removed.len(),
                summary.total_files()
            );
            Ok(true)
        }
        Command::CreatePlugin {
            id,
            name,
            description,
            keywords,
        } => {
            let request = ScaffoldRequest {
                id,
                display_name: name,
                description,
                keywords,
            };
            let path = PluginScaffolder::new(&layout, &settings.marketplace, &settings.scaffold)
                .create(&request)?;
            println!("Created {}", path.display());
            Ok(true)
        }
    }
}

fn website_data(root: &Path, layout: &RepositoryLayout, settings: &Settings) -> Result<bool> {
    let history = GitHistory::load(layout);
    let catalog = Catalog::collect(layout, &history)?;
    let written = WebsiteData::new(catalog, Utc::now()).write(&settings.website_data_path(root))?;
    for (path, status) in written {
        println!("{status:?}: {}", path.display());
    }
    Ok(true)
}

async fn readme(root: &Path, layout: &RepositoryLayout, settings: &Settings) -> Result<bool> {
    let history = GitHistory::load(layout);
    let catalog = Catalog::collect(layout, &history)?;
    let registry = Registry::new(RegistryClient::new(&settings.registry_url)?);
    let generator = ReadmeGenerator::new(&catalog, registry.catalog().await);

    for (path, status) in generator.write_category_readmes(&settings.docs_path(root))? {
        println!("{status:?}: {}", path.display());
    }
    if let Some(status) = generator.update_root_readme(layout)? {
        println!("{status:?}: {}", layout.readme_path().display());
    }
    Ok(true)
}

fn validate(layout: &RepositoryLayout) -> bool {
    let plugins_dir = layout.plugins_dir();
    if !plugins_dir.is_dir() {
        tracing::info!(path = %plugins_dir.display(), "No plugins directory, nothing to validate");
        return true;
    }

    let report = PluginValidator::new(layout).validate_all(&[plugins_dir]);
    for plugin in &report.plugins {
        let messages = plugin.outcome.messages();
        if messages.is_empty() {
            println!("✅ {}", plugin.folder);
        } else {
            println!("❌ {}", plugin.folder);
            for message in messages {
                println!("   - {message}");
            }
        }
    }
    for duplicate in &report.duplicates {
        println!("❌ {duplicate}");
    }

    let failed = report.failures().count() + report.duplicates.len();
    println!(
        "{} plugins checked, {failed} with problems",
        report.plugins.len()
    );
    report.is_success()
}
