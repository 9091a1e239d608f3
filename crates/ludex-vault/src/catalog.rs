//! Flat catalog parsing.
//!
//! The catalog is a comma-delimited file with a `name, status, platform,
//! notes` header (order-independent by name). Splitting is positional with
//! no quoting or escaping support, a documented limitation of the source
//! format. Ragged rows and trailing delimiters are tolerated.

use ludex_core::Status;

use crate::slug::slugify;
use crate::validate::validate_catalog_row;

/// A normalized catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub name: String,
    pub status: Option<Status>,
    pub platform: Option<String>,
    pub notes: Option<String>,
}

/// The result of parsing a catalog file: surviving rows paired with their
/// derived slug, plus per-row diagnostics for rows skipped by validation.
#[derive(Debug, Clone, Default)]
pub struct CatalogParse {
    pub rows: Vec<(String, CatalogRow)>,
    pub diagnostics: Vec<String>,
}

/// Parse catalog text into slug-keyed rows.
///
/// The first non-blank line is the header; rows missing the name cell or
/// shorter than the header are dropped, and rows failing validation are
/// skipped with a diagnostic. Nothing here is fatal to the batch.
pub fn parse_catalog(text: &str) -> CatalogParse {
    let mut parse = CatalogParse::default();
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return parse;
    };

    let columns: Vec<String> = header_line
        .trim()
        .trim_end_matches(',')
        .split(',')
        .map(|field| field.trim().to_lowercase())
        .collect();

    let Some(name_idx) = columns.iter().position(|c| c == "name") else {
        parse
            .diagnostics
            .push("catalog header has no `name` column".to_string());
        return parse;
    };
    let status_idx = columns.iter().position(|c| c == "status");
    let platform_idx = columns.iter().position(|c| c == "platform");
    let notes_idx = columns.iter().position(|c| c == "notes");

    for line in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() < columns.len() {
            tracing::debug!("Dropping short catalog row: {}", line);
            continue;
        }

        let name = cells.get(name_idx).copied().unwrap_or_default();
        if name.is_empty() {
            tracing::debug!("Dropping catalog row with blank name");
            continue;
        }

        let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).copied();
        match validate_catalog_row(
            name,
            cell(status_idx),
            cell(platform_idx),
            cell(notes_idx),
        ) {
            Ok(row) => parse.rows.push((slugify(&row.name), row)),
            Err(err) => parse.diagnostics.push(format!("catalog row `{name}`: {err}")),
        }
    }

    parse
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_keyed_by_slug() {
        let text = "name, status, platform, notes\nOuter Wilds, Finished, PC, loop\nBraid, started, , \n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows.len(), 2);

        let (slug, row) = &parse.rows[0];
        assert_eq!(slug, "Outer-Wilds");
        assert_eq!(row.status, Some(Status::Finished));
        assert_eq!(row.platform.as_deref(), Some("PC"));
        assert_eq!(row.notes.as_deref(), Some("loop"));

        let (slug, row) = &parse.rows[1];
        assert_eq!(slug, "Braid");
        assert_eq!(row.platform, None);
        assert_eq!(row.notes, None);
    }

    #[test]
    fn header_columns_are_order_independent() {
        let text = "platform,name,status,notes\nSwitch,Hades,finished,roguelike\n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows.len(), 1);
        let (slug, row) = &parse.rows[0];
        assert_eq!(slug, "Hades");
        assert_eq!(row.platform.as_deref(), Some("Switch"));
    }

    #[test]
    fn tolerates_trailing_delimiter_in_header() {
        let text = "name, status, platform, notes,  \nBraid, bought, PC, \n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows.len(), 1);
        assert_eq!(parse.rows[0].1.status, Some(Status::Bought));
    }

    #[test]
    fn short_rows_are_dropped_without_error() {
        let text = "name, status, platform, notes\nBraid, started\nHades, finished, Switch, good\n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows.len(), 1);
        assert_eq!(parse.rows[0].0, "Hades");
        assert!(parse.diagnostics.is_empty());
    }

    #[test]
    fn blank_name_rows_are_dropped() {
        let text = "name, status, platform, notes\n, started, PC, orphaned\n";
        let parse = parse_catalog(text);
        assert!(parse.rows.is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "\n\nname, status, platform, notes\n\nBraid, started, PC, \n\n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows.len(), 1);
    }

    #[test]
    fn known_status_typos_normalize() {
        let text = "name, status, platform, notes\nIco, not startedv, PS2, \nShadow, not finished, Xbok 360, \n";
        let parse = parse_catalog(text);
        assert_eq!(parse.rows[0].1.status, Some(Status::NotStarted));
        assert_eq!(parse.rows[1].1.status, Some(Status::Started));
        assert_eq!(parse.rows[1].1.platform.as_deref(), Some("Xbox 360"));
    }

    #[test]
    fn missing_name_column_yields_diagnostic() {
        let text = "title, status\nBraid, started\n";
        let parse = parse_catalog(text);
        assert!(parse.rows.is_empty());
        assert_eq!(parse.diagnostics.len(), 1);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let parse = parse_catalog("");
        assert!(parse.rows.is_empty());
        assert!(parse.diagnostics.is_empty());
    }
}
