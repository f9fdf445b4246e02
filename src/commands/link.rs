//! Command: create or remove public symlinks for local disks.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, LinkOpts};
use crate::config::disks::Catalog;
use crate::error::LinkError;
use crate::linker::{LinkOptions, Linker, OperationOutcome, Tally};
use crate::logging::{EntryStatus, Logger};
use crate::paths::is_valid_disk_name;
use crate::prompt::{Prompt, StdinPrompt, render_table};

const SELECT_QUESTION: &str =
    "Which disks would you like to create symlinks for? (comma-separated for multiple)";
const TABLE_HEADERS: [&str; 3] = ["Disk Name", "Root Path", "Symlink Status"];

/// Run the link command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the catalog is empty,
/// the named disk does not exist, or any link operation fails.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    execute(&setup.linker, &setup.catalog, opts, log, &StdinPrompt)
}

/// Dispatch to the mode selected by `opts`.
///
/// `--remove` wins over everything else; a disk name wins over `--all`;
/// with neither, the user picks disks through `prompt`.
///
/// # Errors
///
/// Returns an error if the catalog is empty (outside remove mode), the named
/// disk does not exist, the prompt fails, or any operation failed.
pub fn execute(
    linker: &Linker,
    catalog: &Catalog,
    opts: &LinkOpts,
    log: &Logger,
    prompt: &dyn Prompt,
) -> Result<()> {
    if opts.remove {
        return remove(linker, catalog, log);
    }

    if catalog.is_empty() {
        return Err(LinkError::EmptyCatalog.into());
    }

    let options = LinkOptions { force: opts.force };
    if let Some(name) = &opts.disk {
        let outcome = linker.create_link_for_named(name, catalog, options)?;
        report(&outcome, log);
    } else if opts.all {
        log.stage("Creating symlinks for all local disks");
        let outcomes = linker.create_all_links(catalog, options);
        report_batch(&outcomes, log);
    } else {
        interactive(linker, catalog, options, log, prompt)?;
    }

    finish(log)
}

fn interactive(
    linker: &Linker,
    catalog: &Catalog,
    options: LinkOptions,
    log: &Logger,
    prompt: &dyn Prompt,
) -> Result<()> {
    log.stage("Available local disks");
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|disk| {
            let root = disk
                .root()
                .map_or_else(|| "N/A".to_string(), |r| r.display().to_string());
            let status = if is_valid_disk_name(&disk.name) {
                linker.inspect(&linker.link_path(&disk.name)).to_string()
            } else {
                "Invalid disk name".to_string()
            };
            vec![disk.name.clone(), root, status]
        })
        .collect();
    for line in render_table(&TABLE_HEADERS, &rows).lines() {
        log.info(line);
    }

    let selected = prompt.select_many(SELECT_QUESTION, &catalog.names())?;
    if selected.is_empty() {
        log.info("No disks selected.");
        return Ok(());
    }

    let mut outcomes = Vec::with_capacity(selected.len());
    for name in &selected {
        let Some(disk) = catalog.get(name) else {
            log.warn(&format!("Skipping unknown disk '{name}'"));
            log.record(name, EntryStatus::Skipped, Some("not in catalog"));
            continue;
        };
        outcomes.push(linker.create_link(&disk.name, disk.root(), options));
    }
    report_batch(&outcomes, log);
    Ok(())
}

fn remove(linker: &Linker, catalog: &Catalog, log: &Logger) -> Result<()> {
    log.stage("Removing disk symlinks");
    let removal = linker.remove_all_links(catalog);

    for link in &removal.removed {
        log.info(&format!(
            "Removed symlink for '{}': {}",
            link.disk_name,
            link.link_path.display()
        ));
        log.record(&link.disk_name, EntryStatus::Ok, Some("removed"));
    }
    for err in &removal.errors {
        match err {
            LinkError::Filesystem { disk, message } => {
                log.error(&format!("Failed to remove symlink for '{disk}': {message}"));
                log.record(disk, EntryStatus::Failed, Some(err.kind()));
            }
            LinkError::InvalidDiskName { disk } => {
                log.error(&err.to_string());
                log.record(disk, EntryStatus::Failed, Some(err.kind()));
            }
            other => log.error(&other.to_string()),
        }
    }

    if removal.count() == 0 {
        log.info("No symlinks found to remove.");
    } else {
        log.info(&format!("Removed {} symlinks.", removal.count()));
    }

    log.print_summary();
    if !removal.errors.is_empty() {
        anyhow::bail!("{} symlink(s) could not be removed", removal.errors.len());
    }
    Ok(())
}

fn report(outcome: &OperationOutcome, log: &Logger) {
    match &outcome.result {
        Ok(_) => {
            let target = outcome
                .target
                .as_ref()
                .map_or_else(String::new, |t| t.display().to_string());
            log.info(&format!(
                "Created symlink for '{}': {} -> {target}",
                outcome.disk_name,
                outcome.link_path.display()
            ));
            log.record(&outcome.disk_name, EntryStatus::Ok, None);
        }
        Err(e @ LinkError::AlreadyExists { .. }) => {
            log.warn(&e.to_string());
            log.record(&outcome.disk_name, EntryStatus::Failed, Some(e.kind()));
        }
        Err(e) => {
            log.error(&e.to_string());
            log.record(&outcome.disk_name, EntryStatus::Failed, Some(e.kind()));
        }
    }
}

fn report_batch(outcomes: &[OperationOutcome], log: &Logger) {
    for outcome in outcomes {
        report(outcome, log);
    }
    let tally = Tally::of(outcomes);
    log.info(&format!("Created {} symlinks successfully.", tally.succeeded));
    if tally.failed > 0 {
        log.warn(&format!("{} symlinks failed to create.", tally.failed));
    }
}

fn finish(log: &Logger) -> Result<()> {
    log.print_summary();
    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} link(s) failed");
    }
    Ok(())
}
