//! `ludex stats`: row counts per table.

use std::path::Path;

use ludex_core::LudexConfig;
use ludex_storage::{counts, Store};

pub(crate) fn cmd_stats(db: Option<&Path>) -> anyhow::Result<()> {
    let config = LudexConfig::load_or_default();
    let db_path = crate::resolve_db_path(db, &config);

    let store = Store::open(&db_path)?;
    let conn = store.connection();
    let counts = counts(&conn)?;

    println!("Store: {}", db_path.display());
    println!("  games:             {}", counts.games);
    println!("  studios:           {}", counts.studios);
    println!("  publishers:        {}", counts.publishers);
    println!("  designers:         {}", counts.designers);
    println!("  game_developers:   {}", counts.game_developers);
    println!("  game_publishers:   {}", counts.game_publishers);
    println!("  publisher_studios: {}", counts.publisher_studios);
    println!("  studio_relations:  {}", counts.studio_relations);

    Ok(())
}
