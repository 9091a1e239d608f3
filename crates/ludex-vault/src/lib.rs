//! ludex-vault: Parsing and normalization of vault inputs.
//!
//! Turns markdown documents (YAML front matter + sectioned bodies) and the
//! flat CSV catalog into the normalized records defined in `ludex-core`.

pub mod catalog;
pub mod document;
pub mod slug;
pub mod validate;

pub use catalog::{parse_catalog, CatalogParse, CatalogRow};
pub use document::{parse_document, Document};
pub use slug::{resolve_reference, slug_from_path, slugify};
pub use validate::{
    validate_designer, validate_game, validate_publisher, validate_studio, DesignerDocument,
    GameDocument, PublisherDocument, StudioDocument,
};
