//! Vault document parsing: front matter plus heading-delimited sections.

use std::collections::BTreeMap;

/// A parsed vault document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Front-matter key/value map. Empty when the front matter is absent
    /// or malformed; a broken header never fails the whole document.
    pub front_matter: BTreeMap<String, serde_yaml::Value>,
    /// Body text with the front matter stripped.
    pub body: String,
    /// Body sections keyed by lower-cased heading text (levels 1-3).
    /// A section runs from the end of its heading line to the start of the
    /// next heading line, trimmed.
    pub sections: BTreeMap<String, String>,
}

/// Parse raw document text into front matter, body, and named sections.
pub fn parse_document(text: &str) -> Document {
    let (front_matter, body) = split_front_matter(text);
    let sections = split_sections(&body);
    Document {
        front_matter,
        body,
        sections,
    }
}

fn split_front_matter(text: &str) -> (BTreeMap<String, serde_yaml::Value>, String) {
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("---") {
        return (BTreeMap::new(), text.to_string());
    }

    let rest: Vec<&str> = lines.collect();
    let Some(end) = rest.iter().position(|line| line.trim() == "---") else {
        // Unterminated header: treat the whole input as body.
        return (BTreeMap::new(), text.to_string());
    };

    let header = rest[..end].join("\n");
    let body = rest[end + 1..].join("\n");

    let front_matter = match serde_yaml::from_str::<BTreeMap<String, serde_yaml::Value>>(&header) {
        Ok(map) => map,
        Err(err) => {
            tracing::debug!("Malformed front matter: {}", err);
            BTreeMap::new()
        }
    };

    (front_matter, body)
}

fn heading_text(line: &str) -> Option<&str> {
    for level in 1..=3usize {
        let marker = &"###"[..level];
        if let Some(rest) = line.strip_prefix(marker) {
            // `####` and deeper are body content, not section boundaries.
            if !rest.starts_with('#') {
                return Some(rest.trim());
            }
        }
    }
    None
}

fn split_sections(body: &str) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((key, content)) = current.take() {
                sections.insert(key, content.join("\n").trim().to_string());
            }
            current = Some((heading.to_lowercase(), Vec::new()));
        } else if let Some((_, content)) = current.as_mut() {
            content.push(line);
        }
    }

    if let Some((key, content)) = current {
        sections.insert(key, content.join("\n").trim().to_string());
    }

    sections
}
