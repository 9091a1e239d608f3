//! `ludex sync`: run one reconciliation pass and render the report.

use std::path::{Path, PathBuf};

use ludex_core::{LudexConfig, SyncReport};
use ludex_storage::Store;
use ludex_sync::{SyncEngine, VaultPaths};

pub(crate) fn cmd_sync(
    vault: Option<&Path>,
    db: Option<&Path>,
    catalog: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = LudexConfig::load_or_default();

    let vault_root = vault
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.vault.root));
    let catalog_path = catalog.map(Path::to_path_buf).unwrap_or_else(|| {
        let configured = Path::new(&config.vault.catalog);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            vault_root.join(configured)
        }
    });
    let db_path = crate::resolve_db_path(db, &config);

    tracing::info!(
        "Syncing vault {} into {}",
        vault_root.display(),
        db_path.display()
    );

    let store = Store::open(&db_path)?;
    let engine = SyncEngine::new(VaultPaths::new(vault_root, catalog_path));
    let report = engine.run(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

fn render_report(report: &SyncReport) {
    println!(
        "Processed {} documents ({} games, {} studios, {} publishers, {} designers), {} catalog rows",
        report.total_processed(),
        report.games_processed,
        report.studios_processed,
        report.publishers_processed,
        report.designers_processed,
        report.catalog_rows,
    );
    println!(
        "  created: {}  updated: {}  unchanged: {}",
        report.created, report.updated, report.unchanged
    );

    if !report.changes.is_empty() {
        println!("\nChanges:");
        for change in &report.changes {
            println!(
                "  {} {} {}: {} -> {}",
                change.kind, change.slug, change.field, change.old, change.new
            );
        }
    }

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("  {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludex_core::{EntityKind, FieldChange};

    #[test]
    fn render_report_does_not_panic_on_full_report() {
        let mut report = SyncReport::new();
        report.games_processed = 2;
        report.created = 1;
        report.updated = 1;
        report.changes.push(FieldChange {
            slug: "Outer-Wilds".to_string(),
            kind: EntityKind::Game,
            field: "status".to_string(),
            old: "\"started\"".to_string(),
            new: "\"finished\"".to_string(),
        });
        report.record_error("games/Broken.md: missing class field");
        render_report(&report);
    }
}
