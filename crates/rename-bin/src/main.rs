mod cli;
mod prompt;

use anyhow::{Context, Result};
use cli::Cli;
use rename_core::{ProjectManifest, RenameSession};
use std::path::Path;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting rename-project");

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Unable to determine the current directory")?,
    };

    if !project_dir.exists() {
        anyhow::bail!("Project directory does not exist: {:?}", project_dir);
    }

    if !project_dir.is_dir() {
        anyhow::bail!("Project directory must be a directory: {:?}", project_dir);
    }

    let manifest = ProjectManifest::load(&project_dir)?;
    let old_name = manifest.package_name()?.to_string();
    info!("Current package name: '{}'", old_name);

    let new_name = match cli.name.clone() {
        Some(name) => name.trim().to_string(),
        None => prompt::ask_text(
            &format!("What would you like to rename {} to?", old_name),
            default_name(&project_dir).as_deref(),
        )?,
    };

    if new_name.is_empty() {
        println!("No new name provided. Exiting.");
        process::exit(1);
    }

    let description = match cli.description.clone() {
        Some(description) => description.trim().to_string(),
        None => prompt::ask_text("Enter a description for the project", None)?,
    };

    if description.is_empty() {
        println!("No description provided. Exiting.");
        process::exit(1);
    }

    // Validates the new name before any file is written.
    let session = RenameSession::new(&project_dir, &old_name, &new_name)?
        .with_decisions(cli.contents.into(), cli.rename.into());

    rename_core::update_description(&project_dir, &description)?;

    if let Err(e) = handle_rename(&cli, session) {
        error!("An error occurred during the project walk: {:#}", e);
        process::exit(1);
    }

    info!("rename-project completed successfully");
    Ok(())
}

fn handle_rename(cli: &Cli, mut session: RenameSession) -> Result<()> {
    info!("Project directory: {:?}", session.root());
    info!("Contents: {:?}, file names: {:?}", cli.contents, cli.rename);

    let show_diff = cli.diff;
    let result = rename_core::rename_project(&mut session, |question| {
        prompt::ask_change(question, show_diff)
    })?;

    println!("Rename complete!");
    println!("  Files processed: {}", result.files_visited);
    println!("  Contents rewritten: {}", result.contents_rewritten);
    println!("  Files renamed: {}", result.files_renamed);
    println!("  Changes skipped: {}", result.changes_skipped);

    Ok(())
}

/// The project directory's own name is the most likely new package name.
fn default_name(project_dir: &Path) -> Option<String> {
    let canonical = project_dir.canonicalize().ok()?;
    canonical.file_name()?.to_str().map(str::to_string)
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
