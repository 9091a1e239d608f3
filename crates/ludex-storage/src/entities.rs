//! Entity row CRUD.
//!
//! All operations take a `&Connection` so callers can scope them to a
//! transaction. Updates always rewrite the whole row; change detection is
//! the sync engine's concern.

use ludex_core::{DesignerRecord, GameRecord, LudexError, PublisherRecord, StudioRecord};
use rusqlite::{params, Connection, OptionalExtension};

fn storage_err(e: rusqlite::Error) -> LudexError {
    LudexError::Storage(e.to_string())
}

fn to_json(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

fn from_json(text: &str) -> Vec<String> {
    serde_json::from_str(text).unwrap_or_default()
}

// ── Games ───────────────────────────────────────────────────────────────────

struct GameRow {
    slug: String,
    status: Option<String>,
    platform: Option<String>,
    engine: Option<String>,
    release_date: Option<String>,
    director: Option<String>,
    genre: String,
    modes: String,
    tags: String,
    perspective: String,
    gameplay: Option<String>,
    synopsis: Option<String>,
    review: Option<String>,
    notes: Option<String>,
    source_file: String,
}

impl GameRow {
    fn into_record(self) -> GameRecord {
        GameRecord {
            slug: self.slug,
            status: self.status.and_then(|s| s.parse().ok()),
            platform: self.platform,
            engine: self.engine,
            release_date: self.release_date,
            director: self.director,
            genre: from_json(&self.genre),
            modes: from_json(&self.modes),
            tags: from_json(&self.tags),
            perspective: from_json(&self.perspective),
            gameplay: self.gameplay,
            synopsis: self.synopsis,
            review: self.review,
            notes: self.notes,
            source_file: self.source_file,
        }
    }
}

/// Get a game row by slug.
pub fn get_game(conn: &Connection, slug: &str) -> Result<Option<GameRecord>, LudexError> {
    conn.query_row(
        "SELECT slug, status, platform, engine, release_date, director, genre, modes, tags,
                perspective, gameplay, synopsis, review, notes, source_file
         FROM games WHERE slug = ?1",
        params![slug],
        |row| {
            Ok(GameRow {
                slug: row.get(0)?,
                status: row.get(1)?,
                platform: row.get(2)?,
                engine: row.get(3)?,
                release_date: row.get(4)?,
                director: row.get(5)?,
                genre: row.get(6)?,
                modes: row.get(7)?,
                tags: row.get(8)?,
                perspective: row.get(9)?,
                gameplay: row.get(10)?,
                synopsis: row.get(11)?,
                review: row.get(12)?,
                notes: row.get(13)?,
                source_file: row.get(14)?,
            })
        },
    )
    .optional()
    .map_err(storage_err)
    .map(|row| row.map(GameRow::into_record))
}

/// Insert a new game row.
pub fn insert_game(conn: &Connection, record: &GameRecord, now: i64) -> Result<(), LudexError> {
    conn.execute(
        "INSERT INTO games (slug, status, platform, engine, release_date, director, genre, modes,
                            tags, perspective, gameplay, synopsis, review, notes, source_file,
                            last_synced_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            record.slug,
            record.status.map(|s| s.to_string()),
            record.platform,
            record.engine,
            record.release_date,
            record.director,
            to_json(&record.genre),
            to_json(&record.modes),
            to_json(&record.tags),
            to_json(&record.perspective),
            record.gameplay,
            record.synopsis,
            record.review,
            record.notes,
            record.source_file,
            now,
        ],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Rewrite an existing game row and advance its timestamp.
pub fn update_game(conn: &Connection, record: &GameRecord, now: i64) -> Result<(), LudexError> {
    conn.execute(
        "UPDATE games SET status = ?2, platform = ?3, engine = ?4, release_date = ?5,
                          director = ?6, genre = ?7, modes = ?8, tags = ?9, perspective = ?10,
                          gameplay = ?11, synopsis = ?12, review = ?13, notes = ?14,
                          source_file = ?15, last_synced_at = ?16
         WHERE slug = ?1",
        params![
            record.slug,
            record.status.map(|s| s.to_string()),
            record.platform,
            record.engine,
            record.release_date,
            record.director,
            to_json(&record.genre),
            to_json(&record.modes),
            to_json(&record.tags),
            to_json(&record.perspective),
            record.gameplay,
            record.synopsis,
            record.review,
            record.notes,
            record.source_file,
            now,
        ],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Insert a minimal game row if the slug is absent. Returns whether a row
/// was inserted.
pub fn insert_game_stub(
    conn: &Connection,
    slug: &str,
    source_file: &str,
    now: i64,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO games (slug, source_file, last_synced_at) VALUES (?1, ?2, ?3)",
            params![slug, source_file, now],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

/// Read a game's `last_synced_at` timestamp.
pub fn game_last_synced_at(conn: &Connection, slug: &str) -> Result<Option<i64>, LudexError> {
    conn.query_row(
        "SELECT last_synced_at FROM games WHERE slug = ?1",
        params![slug],
        |row| row.get(0),
    )
    .optional()
    .map_err(storage_err)
}

// ── Studios ─────────────────────────────────────────────────────────────────

/// Get a studio row by slug.
pub fn get_studio(conn: &Connection, slug: &str) -> Result<Option<StudioRecord>, LudexError> {
    conn.query_row(
        "SELECT slug, director, overview, source_file FROM studios WHERE slug = ?1",
        params![slug],
        |row| {
            Ok(StudioRecord {
                slug: row.get(0)?,
                director: row.get(1)?,
                overview: row.get(2)?,
                source_file: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(storage_err)
}

/// Insert a new studio row.
pub fn insert_studio(conn: &Connection, record: &StudioRecord, now: i64) -> Result<(), LudexError> {
    conn.execute(
        "INSERT INTO studios (slug, director, overview, source_file, last_synced_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.slug,
            record.director,
            record.overview,
            record.source_file,
            now
        ],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Rewrite an existing studio row and advance its timestamp.
pub fn update_studio(conn: &Connection, record: &StudioRecord, now: i64) -> Result<(), LudexError> {
    conn.execute(
        "UPDATE studios SET director = ?2, overview = ?3, source_file = ?4, last_synced_at = ?5
         WHERE slug = ?1",
        params![
            record.slug,
            record.director,
            record.overview,
            record.source_file,
            now
        ],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Insert a minimal studio row if the slug is absent.
pub fn insert_studio_stub(
    conn: &Connection,
    slug: &str,
    source_file: &str,
    now: i64,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO studios (slug, source_file, last_synced_at) VALUES (?1, ?2, ?3)",
            params![slug, source_file, now],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

// ── Publishers ──────────────────────────────────────────────────────────────

/// Get a publisher row by slug.
pub fn get_publisher(conn: &Connection, slug: &str) -> Result<Option<PublisherRecord>, LudexError> {
    conn.query_row(
        "SELECT slug, overview, source_file FROM publishers WHERE slug = ?1",
        params![slug],
        |row| {
            Ok(PublisherRecord {
                slug: row.get(0)?,
                overview: row.get(1)?,
                source_file: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(storage_err)
}

/// Insert a new publisher row.
pub fn insert_publisher(
    conn: &Connection,
    record: &PublisherRecord,
    now: i64,
) -> Result<(), LudexError> {
    conn.execute(
        "INSERT INTO publishers (slug, overview, source_file, last_synced_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![record.slug, record.overview, record.source_file, now],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Rewrite an existing publisher row and advance its timestamp.
pub fn update_publisher(
    conn: &Connection,
    record: &PublisherRecord,
    now: i64,
) -> Result<(), LudexError> {
    conn.execute(
        "UPDATE publishers SET overview = ?2, source_file = ?3, last_synced_at = ?4
         WHERE slug = ?1",
        params![record.slug, record.overview, record.source_file, now],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Insert a minimal publisher row if the slug is absent.
pub fn insert_publisher_stub(
    conn: &Connection,
    slug: &str,
    source_file: &str,
    now: i64,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO publishers (slug, source_file, last_synced_at) VALUES (?1, ?2, ?3)",
            params![slug, source_file, now],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

// ── Designers ───────────────────────────────────────────────────────────────

/// Get a designer row by slug.
pub fn get_designer(conn: &Connection, slug: &str) -> Result<Option<DesignerRecord>, LudexError> {
    conn.query_row(
        "SELECT slug, overview, source_file FROM designers WHERE slug = ?1",
        params![slug],
        |row| {
            Ok(DesignerRecord {
                slug: row.get(0)?,
                overview: row.get(1)?,
                source_file: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(storage_err)
}

/// Insert a new designer row.
pub fn insert_designer(
    conn: &Connection,
    record: &DesignerRecord,
    now: i64,
) -> Result<(), LudexError> {
    conn.execute(
        "INSERT INTO designers (slug, overview, source_file, last_synced_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![record.slug, record.overview, record.source_file, now],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Rewrite an existing designer row and advance its timestamp.
pub fn update_designer(
    conn: &Connection,
    record: &DesignerRecord,
    now: i64,
) -> Result<(), LudexError> {
    conn.execute(
        "UPDATE designers SET overview = ?2, source_file = ?3, last_synced_at = ?4
         WHERE slug = ?1",
        params![record.slug, record.overview, record.source_file, now],
    )
    .map_err(storage_err)?;
    Ok(())
}

/// Insert a minimal designer row if the slug is absent.
pub fn insert_designer_stub(
    conn: &Connection,
    slug: &str,
    source_file: &str,
    now: i64,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO designers (slug, source_file, last_synced_at) VALUES (?1, ?2, ?3)",
            params![slug, source_file, now],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;
    use ludex_core::Status;

    fn test_game(slug: &str) -> GameRecord {
        GameRecord {
            slug: slug.to_string(),
            status: Some(Status::Finished),
            platform: Some("PC".to_string()),
            genre: vec!["Adventure".to_string()],
            synopsis: Some("A space loop.".to_string()),
            source_file: format!("games/{slug}.md"),
            ..Default::default()
        }
    }

    #[test]
    fn insert_and_get_game_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();
        let record = test_game("outer-wilds");
        insert_game(&conn, &record, 1_700_000_000).unwrap();

        let loaded = get_game(&conn, "outer-wilds").unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(
            game_last_synced_at(&conn, "outer-wilds").unwrap(),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn update_game_rewrites_row() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();
        let mut record = test_game("outer-wilds");
        insert_game(&conn, &record, 1).unwrap();

        record.status = Some(Status::Started);
        record.platform = None;
        update_game(&conn, &record, 2).unwrap();

        let loaded = get_game(&conn, "outer-wilds").unwrap().unwrap();
        assert_eq!(loaded.status, Some(Status::Started));
        assert_eq!(loaded.platform, None);
        assert_eq!(game_last_synced_at(&conn, "outer-wilds").unwrap(), Some(2));
    }

    #[test]
    fn game_stub_insert_is_idempotent_and_never_overwrites() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();
        assert!(insert_game_stub(&conn, "braid", "games/Braid.md", 1).unwrap());
        assert!(!insert_game_stub(&conn, "braid", "games/Braid.md", 2).unwrap());

        let record = test_game("outer-wilds");
        insert_game(&conn, &record, 1).unwrap();
        assert!(!insert_game_stub(&conn, "outer-wilds", "(referenced)", 2).unwrap());
        let loaded = get_game(&conn, "outer-wilds").unwrap().unwrap();
        assert_eq!(loaded.status, Some(Status::Finished));
    }

    #[test]
    fn stub_game_reads_back_with_empty_lists() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();
        insert_game_stub(&conn, "ico", "games/Ico.md", 1).unwrap();
        let loaded = get_game(&conn, "ico").unwrap().unwrap();
        assert!(loaded.genre.is_empty());
        assert_eq!(loaded.status, None);
        assert_eq!(loaded.source_file, "games/Ico.md");
    }

    #[test]
    fn studio_and_publisher_and_designer_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();

        let studio = StudioRecord {
            slug: "Thekla".to_string(),
            director: Some("Jonathan-Blow".to_string()),
            overview: Some("Puzzle house.".to_string()),
            source_file: "studios/Thekla.md".to_string(),
        };
        insert_studio(&conn, &studio, 1).unwrap();
        assert_eq!(get_studio(&conn, "Thekla").unwrap().unwrap(), studio);

        let publisher = PublisherRecord {
            slug: "Annapurna".to_string(),
            overview: None,
            source_file: "publishers/Annapurna.md".to_string(),
        };
        insert_publisher(&conn, &publisher, 1).unwrap();
        assert_eq!(get_publisher(&conn, "Annapurna").unwrap().unwrap(), publisher);

        let designer = DesignerRecord {
            slug: "Jonathan-Blow".to_string(),
            overview: Some("Designer.".to_string()),
            source_file: "designers/Jonathan-Blow.md".to_string(),
        };
        insert_designer(&conn, &designer, 1).unwrap();
        assert_eq!(
            get_designer(&conn, "Jonathan-Blow").unwrap().unwrap(),
            designer
        );
    }
}
