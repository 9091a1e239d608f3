//! Per-kind validation and normalization of parsed documents.
//!
//! Validators turn the loose front-matter/section shape of a vault document
//! into the canonical records of `ludex-core`, absorbing the known source
//! messiness: status typos, the corrupted platform literal, scalar-vs-list
//! cross-reference fields, and placeholder dates.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use ludex_core::{
    DesignerRecord, EntityKind, GameRecord, LudexError, PublisherRecord, Status, StudioRecord,
};

use crate::catalog::CatalogRow;
use crate::document::Document;
use crate::slug::resolve_reference;

type FrontMatter = BTreeMap<String, serde_yaml::Value>;

/// A validated game document: the normalized row plus the forward
/// cross-references it declares.
#[derive(Debug, Clone)]
pub struct GameDocument {
    pub record: GameRecord,
    /// Studio slugs from the `developer` field.
    pub developers: Vec<String>,
    /// Publisher slugs from the `publisher` field.
    pub publishers: Vec<String>,
}

/// A validated studio document.
#[derive(Debug, Clone)]
pub struct StudioDocument {
    pub record: StudioRecord,
    /// Game slugs from the `games` field (reverse-direction declarations).
    pub games: Vec<String>,
    /// Related/subsidiary studio slugs from the `related` field.
    pub related: Vec<String>,
}

/// A validated publisher document.
#[derive(Debug, Clone)]
pub struct PublisherDocument {
    pub record: PublisherRecord,
    /// Game slugs from the `games` field (reverse-direction declarations).
    pub games: Vec<String>,
    /// Studio slugs from the `studios` field.
    pub studios: Vec<String>,
}

/// A validated designer document.
#[derive(Debug, Clone)]
pub struct DesignerDocument {
    pub record: DesignerRecord,
}

// ── Field normalizers ───────────────────────────────────────────────────────

/// Normalize the source status vocabulary.
///
/// Case-insensitive. Any value starting with `not start` (tolerating
/// trailing typos) maps to `not started`; the literal `not finished` maps
/// to `started`; anything unrecognized, including empty, maps to absent.
pub fn normalize_status(raw: &str) -> Option<Status> {
    let lowered = raw.trim().to_lowercase();
    if lowered == "not finished" {
        return Some(Status::Started);
    }
    if lowered.starts_with("not start") {
        return Some(Status::NotStarted);
    }
    match lowered.as_str() {
        "finished" => Some(Status::Finished),
        "started" => Some(Status::Started),
        "bought" => Some(Status::Bought),
        _ => None,
    }
}

/// Normalize a platform name. `Xbok 360` is a known corruption in the
/// source corpus.
pub fn normalize_platform(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "Xbok 360" {
        return Some("Xbox 360".to_string());
    }
    Some(trimmed.to_string())
}

/// Normalize a release date to ISO `YYYY-MM-DD`.
///
/// Accepts a date-like or string scalar; the `TBD` placeholder, empty
/// strings, and unparsable values all normalize to absent.
pub fn normalize_date(value: &serde_yaml::Value) -> Option<String> {
    let raw = scalar_text(value)?;
    if raw.eq_ignore_ascii_case("tbd") {
        return None;
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&raw, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    let text = match value {
        serde_yaml::Value::String(s) => s.trim().to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn text_field(fm: &FrontMatter, key: &str) -> Option<String> {
    fm.get(key).and_then(scalar_text)
}

/// A plain string-list attribute: accepts a scalar or a sequence.
fn string_list(fm: &FrontMatter, key: &str) -> Vec<String> {
    match fm.get(key) {
        Some(serde_yaml::Value::Sequence(seq)) => seq.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    }
}

/// A cross-reference field: scalar or sequence, each element run through
/// the wiki-reference resolver.
fn reference_list(fm: &FrontMatter, key: &str) -> Vec<String> {
    string_list(fm, key)
        .iter()
        .map(|raw| resolve_reference(raw))
        .collect()
}

/// A single cross-reference field (e.g. `director`).
fn single_reference(fm: &FrontMatter, key: &str) -> Option<String> {
    text_field(fm, key).map(|raw| resolve_reference(&raw))
}

fn section_text(doc: &Document, key: &str) -> Option<String> {
    doc.sections
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn require_class(fm: &FrontMatter, expected: EntityKind, slug: &str) -> Result<(), LudexError> {
    let class = text_field(fm, "class")
        .ok_or_else(|| LudexError::Validation(format!("{slug}: missing class field")))?;
    let kind = EntityKind::from_str(&class)
        .map_err(|_| LudexError::Validation(format!("{slug}: unknown class `{class}`")))?;
    if kind != expected {
        return Err(LudexError::Validation(format!(
            "{slug}: class `{class}` is not a {expected}"
        )));
    }
    Ok(())
}

// ── Per-kind validators ─────────────────────────────────────────────────────

/// Validate and normalize a game document.
pub fn validate_game(
    doc: &Document,
    slug: &str,
    source_file: &str,
) -> Result<GameDocument, LudexError> {
    let fm = &doc.front_matter;
    require_class(fm, EntityKind::Game, slug)?;

    let record = GameRecord {
        slug: slug.to_string(),
        status: text_field(fm, "status")
            .as_deref()
            .and_then(normalize_status),
        platform: text_field(fm, "platform")
            .as_deref()
            .and_then(normalize_platform),
        engine: text_field(fm, "engine"),
        release_date: fm.get("released").and_then(normalize_date),
        director: single_reference(fm, "director"),
        genre: string_list(fm, "genre"),
        modes: string_list(fm, "modes"),
        tags: string_list(fm, "tags"),
        perspective: string_list(fm, "perspective"),
        gameplay: section_text(doc, "gameplay"),
        synopsis: section_text(doc, "synopsis"),
        review: section_text(doc, "review"),
        notes: section_text(doc, "notes"),
        source_file: source_file.to_string(),
    };

    Ok(GameDocument {
        record,
        developers: reference_list(fm, "developer"),
        publishers: reference_list(fm, "publisher"),
    })
}

/// Validate and normalize a studio document.
pub fn validate_studio(
    doc: &Document,
    slug: &str,
    source_file: &str,
) -> Result<StudioDocument, LudexError> {
    let fm = &doc.front_matter;
    require_class(fm, EntityKind::Studio, slug)?;

    let record = StudioRecord {
        slug: slug.to_string(),
        director: single_reference(fm, "director"),
        overview: section_text(doc, "overview"),
        source_file: source_file.to_string(),
    };

    Ok(StudioDocument {
        record,
        games: reference_list(fm, "games"),
        related: reference_list(fm, "related"),
    })
}

/// Validate and normalize a publisher document.
pub fn validate_publisher(
    doc: &Document,
    slug: &str,
    source_file: &str,
) -> Result<PublisherDocument, LudexError> {
    let fm = &doc.front_matter;
    require_class(fm, EntityKind::Publisher, slug)?;

    let record = PublisherRecord {
        slug: slug.to_string(),
        overview: section_text(doc, "overview"),
        source_file: source_file.to_string(),
    };

    Ok(PublisherDocument {
        record,
        games: reference_list(fm, "games"),
        studios: reference_list(fm, "studios"),
    })
}

/// Normalize a designer document.
///
/// Designers are deliberately permissive: no class requirement, and extra
/// front-matter keys are accepted and ignored. Only the overview section is
/// persisted today.
pub fn validate_designer(doc: &Document, slug: &str, source_file: &str) -> DesignerDocument {
    DesignerDocument {
        record: DesignerRecord {
            slug: slug.to_string(),
            overview: section_text(doc, "overview"),
            source_file: source_file.to_string(),
        },
    }
}

/// Validate a catalog row. The name is the only required field; status,
/// platform, and notes normalize independently.
pub fn validate_catalog_row(
    name: &str,
    status: Option<&str>,
    platform: Option<&str>,
    notes: Option<&str>,
) -> Result<CatalogRow, LudexError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LudexError::Validation("catalog row: blank name".to_string()));
    }
    Ok(CatalogRow {
        name: name.to_string(),
        status: status.and_then(normalize_status),
        platform: platform.and_then(normalize_platform),
        notes: notes
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}
