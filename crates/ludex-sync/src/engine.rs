//! The five-phase synchronization algorithm.
//!
//! Phase 1 (discovery and catalog parsing) runs outside the transaction
//! and records non-fatal errors. Phases 2-5 (game, catalog, studio/
//! publisher/designer reconciliation, stub materialization) run inside one
//! transaction: either the whole pass commits or none of it does.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ludex_core::{
    EntityKind, FieldChange, GameRecord, LudexError, SyncReport, REFERENCED_SOURCE,
};
use ludex_storage::{entities, relations, Store};
use ludex_vault::{
    parse_catalog, parse_document, slug_from_path, validate_designer, validate_game,
    validate_publisher, validate_studio, CatalogRow,
};
use rusqlite::Connection;

use crate::discovery::{discover_documents, VaultPaths};

/// Slugs referenced during phases 2-4 that may need stub rows in phase 5.
///
/// Threaded explicitly through the phase functions; there is no ambient
/// accumulation state.
#[derive(Debug, Clone, Default)]
pub struct PendingRefs {
    pub studios: BTreeSet<String>,
    pub publishers: BTreeSet<String>,
    pub designers: BTreeSet<String>,
}

/// Runs one full reconciliation pass over a vault.
pub struct SyncEngine {
    paths: VaultPaths,
}

impl SyncEngine {
    pub fn new(paths: VaultPaths) -> Self {
        Self { paths }
    }

    /// Execute one synchronization run against the store.
    ///
    /// Per-document failures are appended to the report and skipped. A
    /// storage failure propagates out and the transaction rolls back,
    /// leaving no partial writes.
    pub fn run(&self, store: &Store) -> Result<SyncReport, LudexError> {
        let mut report = SyncReport::new();

        // Phase 1: discovery, outside the transaction.
        let docs = discover_documents(&self.paths);
        let catalog_rows = self.load_catalog(&mut report);
        report.catalog_rows = catalog_rows.len();

        let now = chrono::Utc::now().timestamp();
        let mut pending = PendingRefs::default();

        let conn = store.connection();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| LudexError::Storage(e.to_string()))?;

        self.sync_games(&tx, &docs.games, &mut pending, &mut report, now)?;
        self.sync_catalog(&tx, &catalog_rows, &mut report, now)?;
        self.sync_studios(&tx, &docs.studios, &mut pending, &mut report, now)?;
        self.sync_publishers(&tx, &docs.publishers, &mut pending, &mut report, now)?;
        self.sync_designers(&tx, &docs.designers, &mut report, now)?;
        materialize_stubs(&tx, &pending, &mut report, now)?;

        tx.commit().map_err(|e| LudexError::Storage(e.to_string()))?;

        tracing::info!(
            "Sync complete: {} documents, {} created, {} updated, {} unchanged, {} errors",
            report.total_processed(),
            report.created,
            report.updated,
            report.unchanged,
            report.errors.len(),
        );

        Ok(report)
    }

    /// Provenance string for a document: its path relative to the vault
    /// root where possible.
    fn provenance(&self, path: &Path) -> String {
        path.strip_prefix(&self.paths.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    fn load_catalog(&self, report: &mut SyncReport) -> Vec<(String, CatalogRow)> {
        match std::fs::read_to_string(&self.paths.catalog) {
            Ok(text) => {
                let parse = parse_catalog(&text);
                for diagnostic in parse.diagnostics {
                    report.record_error(diagnostic);
                }
                parse.rows
            }
            Err(err) => {
                // The run proceeds with zero catalog rows.
                report.record_error(format!(
                    "catalog {}: {}",
                    self.paths.catalog.display(),
                    err
                ));
                Vec::new()
            }
        }
    }

    // ── Phase 2: games ──────────────────────────────────────────────────

    fn sync_games(
        &self,
        conn: &Connection,
        docs: &[PathBuf],
        pending: &mut PendingRefs,
        report: &mut SyncReport,
        now: i64,
    ) -> Result<(), LudexError> {
        for path in docs {
            report.games_processed += 1;
            let slug = slug_from_path(path);
            let source = self.provenance(path);

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    continue;
                }
            };

            let doc = parse_document(&text);
            let game = match validate_game(&doc, &slug, &source) {
                Ok(game) => game,
                Err(err) => {
                    // Keep the slug on the books as a stub and move on.
                    report.record_error(format!("{source}: {err}"));
                    if entities::insert_game_stub(conn, &slug, &source, now)? {
                        report.created += 1;
                    } else {
                        report.unchanged += 1;
                    }
                    continue;
                }
            };

            pending.studios.extend(game.developers.iter().cloned());
            pending.publishers.extend(game.publishers.iter().cloned());
            if let Some(director) = &game.record.director {
                pending.designers.insert(director.clone());
            }

            upsert_game(conn, &game.record, report, now)?;

            // The game document owns these pairings: junction state is a
            // pure function of the current document.
            relations::replace_game_developers(conn, &slug, &game.developers)?;
            relations::replace_game_publishers(conn, &slug, &game.publishers)?;
        }
        Ok(())
    }

    // ── Phase 3: catalog backfill ───────────────────────────────────────

    fn sync_catalog(
        &self,
        conn: &Connection,
        rows: &[(String, CatalogRow)],
        report: &mut SyncReport,
        now: i64,
    ) -> Result<(), LudexError> {
        let source = self.paths.catalog.to_string_lossy().into_owned();
        for (slug, row) in rows {
            // Markdown takes precedence: never overwrite an existing row.
            if entities::get_game(conn, slug)?.is_some() {
                continue;
            }
            let record = GameRecord {
                slug: slug.clone(),
                status: row.status,
                platform: row.platform.clone(),
                notes: row.notes.clone(),
                source_file: source.clone(),
                ..Default::default()
            };
            entities::insert_game(conn, &record, now)?;
            report.created += 1;
        }
        Ok(())
    }

    // ── Phase 4: studios, publishers, designers ─────────────────────────

    fn sync_studios(
        &self,
        conn: &Connection,
        docs: &[PathBuf],
        pending: &mut PendingRefs,
        report: &mut SyncReport,
        now: i64,
    ) -> Result<(), LudexError> {
        for path in docs {
            report.studios_processed += 1;
            let slug = slug_from_path(path);
            let source = self.provenance(path);

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    continue;
                }
            };

            let doc = parse_document(&text);
            let studio = match validate_studio(&doc, &slug, &source) {
                Ok(studio) => studio,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    if entities::insert_studio_stub(conn, &slug, &source, now)? {
                        report.created += 1;
                    } else {
                        report.unchanged += 1;
                    }
                    continue;
                }
            };

            if let Some(director) = &studio.record.director {
                pending.designers.insert(director.clone());
            }
            pending.studios.extend(studio.related.iter().cloned());

            upsert_studio(conn, &studio.record, report, now)?;

            // Reverse-direction declarations: insert-only, guarded by a
            // scan of the game's current junction rows. The game side owns
            // deletion.
            for game in &studio.games {
                let existing = relations::developers_for_game(conn, game)?;
                if !existing.iter().any(|s| s == &slug) {
                    relations::insert_game_developer(conn, game, &slug)?;
                }
            }

            relations::replace_studio_relations(conn, &slug, &studio.related)?;
        }
        Ok(())
    }

    fn sync_publishers(
        &self,
        conn: &Connection,
        docs: &[PathBuf],
        pending: &mut PendingRefs,
        report: &mut SyncReport,
        now: i64,
    ) -> Result<(), LudexError> {
        for path in docs {
            report.publishers_processed += 1;
            let slug = slug_from_path(path);
            let source = self.provenance(path);

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    continue;
                }
            };

            let doc = parse_document(&text);
            let publisher = match validate_publisher(&doc, &slug, &source) {
                Ok(publisher) => publisher,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    if entities::insert_publisher_stub(conn, &slug, &source, now)? {
                        report.created += 1;
                    } else {
                        report.unchanged += 1;
                    }
                    continue;
                }
            };

            pending.studios.extend(publisher.studios.iter().cloned());

            upsert_publisher(conn, &publisher.record, report, now)?;

            for game in &publisher.games {
                let existing = relations::publishers_for_game(conn, game)?;
                if !existing.iter().any(|p| p == &slug) {
                    relations::insert_game_publisher(conn, game, &slug)?;
                }
            }

            relations::replace_publisher_studios(conn, &slug, &publisher.studios)?;
        }
        Ok(())
    }

    fn sync_designers(
        &self,
        conn: &Connection,
        docs: &[PathBuf],
        report: &mut SyncReport,
        now: i64,
    ) -> Result<(), LudexError> {
        for path in docs {
            report.designers_processed += 1;
            let slug = slug_from_path(path);
            let source = self.provenance(path);

            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    report.record_error(format!("{source}: {err}"));
                    continue;
                }
            };

            let doc = parse_document(&text);
            let designer = validate_designer(&doc, &slug, &source);
            upsert_designer(conn, &designer.record, report, now)?;
        }
        Ok(())
    }
}

// ── Phase 5: stub materialization ───────────────────────────────────────────

/// Insert stub rows for every pending reference that still has no row.
fn materialize_stubs(
    conn: &Connection,
    pending: &PendingRefs,
    report: &mut SyncReport,
    now: i64,
) -> Result<(), LudexError> {
    for slug in &pending.studios {
        if entities::insert_studio_stub(conn, slug, REFERENCED_SOURCE, now)? {
            report.created += 1;
        }
    }
    for slug in &pending.publishers {
        if entities::insert_publisher_stub(conn, slug, REFERENCED_SOURCE, now)? {
            report.created += 1;
        }
    }
    for slug in &pending.designers {
        if entities::insert_designer_stub(conn, slug, REFERENCED_SOURCE, now)? {
            report.created += 1;
        }
    }
    Ok(())
}

// ── Change detection and upserts ────────────────────────────────────────────

/// Zip two canonical field lists and collect the positions that differ.
/// Field order is fixed per record type, so positional comparison is safe.
fn diff_fields(
    kind: EntityKind,
    slug: &str,
    old: &[(&'static str, String)],
    new: &[(&'static str, String)],
) -> Vec<FieldChange> {
    old.iter()
        .zip(new.iter())
        .filter(|((_, old_value), (_, new_value))| old_value != new_value)
        .map(|((field, old_value), (_, new_value))| FieldChange {
            slug: slug.to_string(),
            kind,
            field: (*field).to_string(),
            old: old_value.clone(),
            new: new_value.clone(),
        })
        .collect()
}

fn upsert_game(
    conn: &Connection,
    record: &GameRecord,
    report: &mut SyncReport,
    now: i64,
) -> Result<(), LudexError> {
    match entities::get_game(conn, &record.slug)? {
        Some(existing) => {
            let changes = diff_fields(
                EntityKind::Game,
                &record.slug,
                &existing.comparable_fields(),
                &record.comparable_fields(),
            );
            if changes.is_empty() {
                report.unchanged += 1;
            } else {
                entities::update_game(conn, record, now)?;
                report.updated += 1;
                report.changes.extend(changes);
            }
        }
        None => {
            entities::insert_game(conn, record, now)?;
            report.created += 1;
        }
    }
    Ok(())
}

fn upsert_studio(
    conn: &Connection,
    record: &ludex_core::StudioRecord,
    report: &mut SyncReport,
    now: i64,
) -> Result<(), LudexError> {
    match entities::get_studio(conn, &record.slug)? {
        Some(existing) => {
            let changes = diff_fields(
                EntityKind::Studio,
                &record.slug,
                &existing.comparable_fields(),
                &record.comparable_fields(),
            );
            if changes.is_empty() {
                report.unchanged += 1;
            } else {
                entities::update_studio(conn, record, now)?;
                report.updated += 1;
                report.changes.extend(changes);
            }
        }
        None => {
            entities::insert_studio(conn, record, now)?;
            report.created += 1;
        }
    }
    Ok(())
}

fn upsert_publisher(
    conn: &Connection,
    record: &ludex_core::PublisherRecord,
    report: &mut SyncReport,
    now: i64,
) -> Result<(), LudexError> {
    match entities::get_publisher(conn, &record.slug)? {
        Some(existing) => {
            let changes = diff_fields(
                EntityKind::Publisher,
                &record.slug,
                &existing.comparable_fields(),
                &record.comparable_fields(),
            );
            if changes.is_empty() {
                report.unchanged += 1;
            } else {
                entities::update_publisher(conn, record, now)?;
                report.updated += 1;
                report.changes.extend(changes);
            }
        }
        None => {
            entities::insert_publisher(conn, record, now)?;
            report.created += 1;
        }
    }
    Ok(())
}

fn upsert_designer(
    conn: &Connection,
    record: &ludex_core::DesignerRecord,
    report: &mut SyncReport,
    now: i64,
) -> Result<(), LudexError> {
    match entities::get_designer(conn, &record.slug)? {
        Some(existing) => {
            let changes = diff_fields(
                EntityKind::Designer,
                &record.slug,
                &existing.comparable_fields(),
                &record.comparable_fields(),
            );
            if changes.is_empty() {
                report.unchanged += 1;
            } else {
                entities::update_designer(conn, record, now)?;
                report.updated += 1;
                report.changes.extend(changes);
            }
        }
        None => {
            entities::insert_designer(conn, record, now)?;
            report.created += 1;
        }
    }
    Ok(())
}
