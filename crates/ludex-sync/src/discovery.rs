//! Document discovery: enumerate the per-kind markdown directories.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Locations of the vault inputs.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Root directory holding the four kind directories.
    pub root: PathBuf,
    /// The flat catalog file.
    pub catalog: PathBuf,
}

impl VaultPaths {
    pub fn new(root: impl Into<PathBuf>, catalog: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            catalog: catalog.into(),
        }
    }

    pub fn games_dir(&self) -> PathBuf {
        self.root.join("games")
    }

    pub fn studios_dir(&self) -> PathBuf {
        self.root.join("studios")
    }

    pub fn publishers_dir(&self) -> PathBuf {
        self.root.join("publishers")
    }

    pub fn designers_dir(&self) -> PathBuf {
        self.root.join("designers")
    }
}

/// Documents discovered for one run, per entity kind.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredDocs {
    pub games: Vec<PathBuf>,
    pub studios: Vec<PathBuf>,
    pub publishers: Vec<PathBuf>,
    pub designers: Vec<PathBuf>,
}

/// Enumerate all markdown documents under the four kind directories.
/// Missing directories contribute nothing; walk errors are logged and
/// skipped.
pub fn discover_documents(paths: &VaultPaths) -> DiscoveredDocs {
    DiscoveredDocs {
        games: markdown_files(&paths.games_dir()),
        studios: markdown_files(&paths.studios_dir()),
        publishers: markdown_files(&paths.publishers_dir()),
        designers: markdown_files(&paths.designers_dir()),
    }
}

fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::debug!("No directory at {}, skipping", dir.display());
        return Vec::new();
    }

    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("Walk error: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("md") {
            files.push(path.to_path_buf());
        }
    }

    // Deterministic processing order across runs
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_markdown_per_kind() {
        let dir = std::env::temp_dir().join("ludex_discovery_test");
        let _ = fs::remove_dir_all(&dir);
        for kind in ["games", "studios", "publishers", "designers"] {
            fs::create_dir_all(dir.join(kind)).unwrap();
        }

        fs::write(dir.join("games/Braid.md"), "---\nclass: game\n---\n").unwrap();
        fs::write(dir.join("games/Ico.md"), "---\nclass: game\n---\n").unwrap();
        fs::write(dir.join("games/notes.txt"), "not a document").unwrap();
        fs::write(dir.join("studios/Thekla.md"), "---\nclass: studio\n---\n").unwrap();

        let paths = VaultPaths::new(&dir, dir.join("games.csv"));
        let docs = discover_documents(&paths);

        assert_eq!(docs.games.len(), 2);
        assert_eq!(docs.studios.len(), 1);
        assert!(docs.publishers.is_empty());
        assert!(docs.designers.is_empty());

        // Sorted for deterministic order
        assert!(docs.games[0].ends_with("Braid.md"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_kind_directory_is_empty_not_error() {
        let dir = std::env::temp_dir().join("ludex_discovery_missing_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        let paths = VaultPaths::new(&dir, dir.join("games.csv"));
        let docs = discover_documents(&paths);
        assert!(docs.games.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
