use serde::{Deserialize, Serialize};

use crate::LudexError;

/// Provenance marker for rows created only to satisfy a reference target.
pub const REFERENCED_SOURCE: &str = "(referenced)";

// ── Entity Kinds ────────────────────────────────────────────────────────────

/// The four entity kinds stored in the normalized schema.
///
/// The stored lower-case text doubles as the `class` front-matter
/// discriminator in vault documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Game,
    Studio,
    Publisher,
    Designer,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Game => write!(f, "game"),
            Self::Studio => write!(f, "studio"),
            Self::Publisher => write!(f, "publisher"),
            Self::Designer => write!(f, "designer"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = LudexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "game" => Ok(Self::Game),
            "studio" => Ok(Self::Studio),
            "publisher" => Ok(Self::Publisher),
            "designer" => Ok(Self::Designer),
            _ => Err(LudexError::InvalidEntityKind(s.to_string())),
        }
    }
}

// ── Play Status ─────────────────────────────────────────────────────────────

/// Canonical play-status vocabulary for games.
///
/// Normalization of the messy source vocabulary (case, trailing typos,
/// `not finished`) lives in the validators; this type only round-trips the
/// four canonical stored forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Finished,
    Started,
    NotStarted,
    Bought,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished => write!(f, "finished"),
            Self::Started => write!(f, "started"),
            Self::NotStarted => write!(f, "not started"),
            Self::Bought => write!(f, "bought"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = LudexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "finished" => Ok(Self::Finished),
            "started" => Ok(Self::Started),
            "not started" => Ok(Self::NotStarted),
            "bought" => Ok(Self::Bought),
            _ => Err(LudexError::InvalidStatus(s.to_string())),
        }
    }
}

// ── Entity Records ──────────────────────────────────────────────────────────

/// Normalized game row.
///
/// `source_file` is provenance only and never participates in change
/// detection; the persisted `last_synced_at` column is managed by storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub slug: String,
    pub status: Option<Status>,
    pub platform: Option<String>,
    pub engine: Option<String>,
    /// ISO `YYYY-MM-DD`.
    pub release_date: Option<String>,
    /// Designer slug.
    pub director: Option<String>,
    pub genre: Vec<String>,
    pub modes: Vec<String>,
    pub tags: Vec<String>,
    pub perspective: Vec<String>,
    pub gameplay: Option<String>,
    pub synopsis: Option<String>,
    pub review: Option<String>,
    pub notes: Option<String>,
    pub source_file: String,
}

/// Normalized studio row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioRecord {
    pub slug: String,
    /// Designer slug.
    pub director: Option<String>,
    pub overview: Option<String>,
    pub source_file: String,
}

/// Normalized publisher row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublisherRecord {
    pub slug: String,
    pub overview: Option<String>,
    pub source_file: String,
}

/// Normalized designer row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignerRecord {
    pub slug: String,
    pub overview: Option<String>,
    pub source_file: String,
}

// ── Canonical field serialization ───────────────────────────────────────────

fn canon_text(value: &Option<String>) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn canon_list(value: &[String]) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

fn canon_status(value: &Option<Status>) -> String {
    canon_text(&value.map(|s| s.to_string()))
}

impl GameRecord {
    /// Comparable fields in canonical serialized form, excluding provenance
    /// and timestamp. Used for field-level change detection.
    pub fn comparable_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("status", canon_status(&self.status)),
            ("platform", canon_text(&self.platform)),
            ("engine", canon_text(&self.engine)),
            ("release_date", canon_text(&self.release_date)),
            ("director", canon_text(&self.director)),
            ("genre", canon_list(&self.genre)),
            ("modes", canon_list(&self.modes)),
            ("tags", canon_list(&self.tags)),
            ("perspective", canon_list(&self.perspective)),
            ("gameplay", canon_text(&self.gameplay)),
            ("synopsis", canon_text(&self.synopsis)),
            ("review", canon_text(&self.review)),
            ("notes", canon_text(&self.notes)),
        ]
    }
}

impl StudioRecord {
    pub fn comparable_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("director", canon_text(&self.director)),
            ("overview", canon_text(&self.overview)),
        ]
    }
}

impl PublisherRecord {
    pub fn comparable_fields(&self) -> Vec<(&'static str, String)> {
        vec![("overview", canon_text(&self.overview))]
    }
}

impl DesignerRecord {
    pub fn comparable_fields(&self) -> Vec<(&'static str, String)> {
        vec![("overview", canon_text(&self.overview))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn entity_kind_roundtrip() {
        for kind in [
            EntityKind::Game,
            EntityKind::Studio,
            EntityKind::Publisher,
            EntityKind::Designer,
        ] {
            let parsed = EntityKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn entity_kind_rejects_unknown() {
        assert!(EntityKind::from_str("franchise").is_err());
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            Status::Finished,
            Status::Started,
            Status::NotStarted,
            Status::Bought,
        ] {
            let parsed = Status::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn status_display_uses_space() {
        assert_eq!(Status::NotStarted.to_string(), "not started");
    }

    #[test]
    fn comparable_fields_exclude_provenance() {
        let record = GameRecord {
            slug: "outer-wilds".to_string(),
            source_file: "games/Outer-Wilds.md".to_string(),
            ..Default::default()
        };
        assert!(record
            .comparable_fields()
            .iter()
            .all(|(name, _)| *name != "source_file" && *name != "slug"));
    }

    #[test]
    fn canonical_forms_distinguish_absent_and_empty_list() {
        let a = GameRecord::default();
        let mut b = GameRecord::default();
        b.genre = vec!["Adventure".to_string()];
        let fields_a = a.comparable_fields();
        let fields_b = b.comparable_fields();
        assert_ne!(fields_a, fields_b);
        assert_eq!(fields_a[5].1, "[]");
        assert_eq!(fields_b[5].1, "[\"Adventure\"]");
    }
}
