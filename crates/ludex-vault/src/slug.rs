//! Slug and wiki-reference resolution.
//!
//! Slugs are the sole foreign-key currency between entities: a stable
//! string derived from a document's file name or, for catalog-only games,
//! from the display name.

use std::path::Path;

/// Strip a `[[Name]]` wiki-style marker if present, otherwise return the
/// trimmed input unchanged. Pure and total.
pub fn resolve_reference(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
    {
        inner.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derive a slug from a display name: trim, then collapse internal
/// whitespace runs into single hyphens. Used only for catalog rows that
/// have no backing document.
pub fn slugify(name: &str) -> String {
    name.trim().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Derive a slug from a document path: the final component with its
/// extension stripped. One document per entity is assumed.
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn resolve_strips_wiki_marker() {
        assert_eq!(resolve_reference("[[Some-Studio]]"), "Some-Studio");
    }

    #[test]
    fn resolve_trims_inside_and_outside() {
        assert_eq!(resolve_reference("  [[ Some-Studio ]]  "), "Some-Studio");
    }

    #[test]
    fn resolve_passes_plain_text_through() {
        assert_eq!(resolve_reference("Some-Studio"), "Some-Studio");
    }

    #[test]
    fn resolve_leaves_unbalanced_brackets_alone() {
        assert_eq!(resolve_reference("[[Half-Open"), "[[Half-Open");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("  Outer   Wilds "), "Outer-Wilds");
    }

    #[test]
    fn slugify_keeps_single_word() {
        assert_eq!(slugify("Braid"), "Braid");
    }

    #[test]
    fn slug_from_path_strips_extension() {
        let path = PathBuf::from("vault/games/Outer-Wilds.md");
        assert_eq!(slug_from_path(&path), "Outer-Wilds");
    }

    #[test]
    fn slug_from_path_without_extension() {
        let path = PathBuf::from("vault/games/Braid");
        assert_eq!(slug_from_path(&path), "Braid");
    }
}
