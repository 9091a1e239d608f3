//! Junction table operations.
//!
//! Each junction row is the pair itself; `INSERT OR IGNORE` on the
//! composite primary key keeps re-derived pairs from duplicating.
//! Forward-owned junctions are replaced wholesale (delete-then-reinsert);
//! reverse-direction declarations use the guarded single inserts.

use ludex_core::LudexError;
use rusqlite::{params, Connection};

fn storage_err(e: rusqlite::Error) -> LudexError {
    LudexError::Storage(e.to_string())
}

fn list_column(
    conn: &Connection,
    sql: &str,
    key: &str,
) -> Result<Vec<String>, LudexError> {
    let mut stmt = conn.prepare(sql).map_err(storage_err)?;
    let values = stmt
        .query_map(params![key], |row| row.get(0))
        .map_err(storage_err)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(storage_err)?;
    Ok(values)
}

fn replace_pairs(
    conn: &Connection,
    delete_sql: &str,
    insert_sql: &str,
    owner: &str,
    targets: &[String],
) -> Result<(), LudexError> {
    conn.execute(delete_sql, params![owner]).map_err(storage_err)?;
    let mut stmt = conn.prepare(insert_sql).map_err(storage_err)?;
    for target in targets {
        stmt.execute(params![owner, target]).map_err(storage_err)?;
    }
    Ok(())
}

// ── Game ↔ Studio (developer) ───────────────────────────────────────────────

/// Replace a game's developer junction rows with the given studio slugs.
pub fn replace_game_developers(
    conn: &Connection,
    game_slug: &str,
    studios: &[String],
) -> Result<(), LudexError> {
    replace_pairs(
        conn,
        "DELETE FROM game_developers WHERE game_slug = ?1",
        "INSERT OR IGNORE INTO game_developers (game_slug, studio_slug) VALUES (?1, ?2)",
        game_slug,
        studios,
    )
}

/// Insert one game-developer pair. Returns whether a row was inserted.
pub fn insert_game_developer(
    conn: &Connection,
    game_slug: &str,
    studio_slug: &str,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO game_developers (game_slug, studio_slug) VALUES (?1, ?2)",
            params![game_slug, studio_slug],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

/// Studio slugs currently recorded as a game's developers.
pub fn developers_for_game(conn: &Connection, game_slug: &str) -> Result<Vec<String>, LudexError> {
    list_column(
        conn,
        "SELECT studio_slug FROM game_developers WHERE game_slug = ?1 ORDER BY studio_slug",
        game_slug,
    )
}

// ── Game ↔ Publisher ────────────────────────────────────────────────────────

/// Replace a game's publisher junction rows with the given publisher slugs.
pub fn replace_game_publishers(
    conn: &Connection,
    game_slug: &str,
    publishers: &[String],
) -> Result<(), LudexError> {
    replace_pairs(
        conn,
        "DELETE FROM game_publishers WHERE game_slug = ?1",
        "INSERT OR IGNORE INTO game_publishers (game_slug, publisher_slug) VALUES (?1, ?2)",
        game_slug,
        publishers,
    )
}

/// Insert one game-publisher pair. Returns whether a row was inserted.
pub fn insert_game_publisher(
    conn: &Connection,
    game_slug: &str,
    publisher_slug: &str,
) -> Result<bool, LudexError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO game_publishers (game_slug, publisher_slug) VALUES (?1, ?2)",
            params![game_slug, publisher_slug],
        )
        .map_err(storage_err)?;
    Ok(inserted > 0)
}

/// Publisher slugs currently recorded for a game.
pub fn publishers_for_game(conn: &Connection, game_slug: &str) -> Result<Vec<String>, LudexError> {
    list_column(
        conn,
        "SELECT publisher_slug FROM game_publishers WHERE game_slug = ?1 ORDER BY publisher_slug",
        game_slug,
    )
}

// ── Publisher ↔ Studio ──────────────────────────────────────────────────────

/// Replace a publisher's studio junction rows.
pub fn replace_publisher_studios(
    conn: &Connection,
    publisher_slug: &str,
    studios: &[String],
) -> Result<(), LudexError> {
    replace_pairs(
        conn,
        "DELETE FROM publisher_studios WHERE publisher_slug = ?1",
        "INSERT OR IGNORE INTO publisher_studios (publisher_slug, studio_slug) VALUES (?1, ?2)",
        publisher_slug,
        studios,
    )
}

/// Studio slugs currently recorded for a publisher.
pub fn studios_for_publisher(
    conn: &Connection,
    publisher_slug: &str,
) -> Result<Vec<String>, LudexError> {
    list_column(
        conn,
        "SELECT studio_slug FROM publisher_studios WHERE publisher_slug = ?1 ORDER BY studio_slug",
        publisher_slug,
    )
}

// ── Studio ↔ Studio (related/subsidiary) ────────────────────────────────────

/// Replace a studio's related-studio junction rows.
pub fn replace_studio_relations(
    conn: &Connection,
    studio_slug: &str,
    related: &[String],
) -> Result<(), LudexError> {
    replace_pairs(
        conn,
        "DELETE FROM studio_relations WHERE studio_slug = ?1",
        "INSERT OR IGNORE INTO studio_relations (studio_slug, related_slug) VALUES (?1, ?2)",
        studio_slug,
        related,
    )
}

/// Related-studio slugs currently recorded for a studio.
pub fn related_studios(conn: &Connection, studio_slug: &str) -> Result<Vec<String>, LudexError> {
    list_column(
        conn,
        "SELECT related_slug FROM studio_relations WHERE studio_slug = ?1 ORDER BY related_slug",
        studio_slug,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[test]
    fn replace_is_a_pure_function_of_input() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();

        let both = vec!["Mobius".to_string(), "Thekla".to_string()];
        replace_game_developers(&conn, "outer-wilds", &both).unwrap();
        assert_eq!(developers_for_game(&conn, "outer-wilds").unwrap(), both);

        let one = vec!["Mobius".to_string()];
        replace_game_developers(&conn, "outer-wilds", &one).unwrap();
        assert_eq!(developers_for_game(&conn, "outer-wilds").unwrap(), one);

        replace_game_developers(&conn, "outer-wilds", &[]).unwrap();
        assert!(developers_for_game(&conn, "outer-wilds").unwrap().is_empty());
    }

    #[test]
    fn duplicate_pairs_collapse() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();

        assert!(insert_game_developer(&conn, "outer-wilds", "Mobius").unwrap());
        assert!(!insert_game_developer(&conn, "outer-wilds", "Mobius").unwrap());
        assert_eq!(
            developers_for_game(&conn, "outer-wilds").unwrap(),
            vec!["Mobius".to_string()]
        );
    }

    #[test]
    fn replace_does_not_touch_other_owners() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();

        replace_game_publishers(&conn, "outer-wilds", &["Annapurna".to_string()]).unwrap();
        replace_game_publishers(&conn, "braid", &["Number-None".to_string()]).unwrap();

        replace_game_publishers(&conn, "outer-wilds", &[]).unwrap();
        assert_eq!(
            publishers_for_game(&conn, "braid").unwrap(),
            vec!["Number-None".to_string()]
        );
    }

    #[test]
    fn studio_relations_and_publisher_studios_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let conn = store.connection();

        replace_studio_relations(&conn, "Sony-Japan", &["Team-Ico".to_string()]).unwrap();
        assert_eq!(
            related_studios(&conn, "Sony-Japan").unwrap(),
            vec!["Team-Ico".to_string()]
        );

        replace_publisher_studios(&conn, "Annapurna", &["Mobius".to_string()]).unwrap();
        assert_eq!(
            studios_for_publisher(&conn, "Annapurna").unwrap(),
            vec!["Mobius".to_string()]
        );
    }
}
