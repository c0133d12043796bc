//! Core domain types for ProjectBook.

use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// SSO username and password for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ListingItem / ProjectRecord
// ---------------------------------------------------------------------------

/// A project as it appears on the listing page, before its description is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Value of the listing paragraph's id attribute.
    pub id: String,
    /// Link text of the project title.
    pub title: String,
    /// Absolute URL of the project's detail page.
    pub detail_url: Url,
}

impl ListingItem {
    /// Attach the description fetched from the detail page.
    pub fn complete(self, description: impl Into<String>) -> ProjectRecord {
        ProjectRecord {
            id: self.id,
            title: self.title,
            description: description.into(),
        }
    }
}

/// A fully enriched project. An empty `description` means none was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// ProjectCollection
// ---------------------------------------------------------------------------

/// Projects in listing-page document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectCollection(pub Vec<ProjectRecord>);

impl ProjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProjectRecord) {
        self.0.push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.0
    }

    /// Number of records whose description came back empty.
    pub fn missing_descriptions(&self) -> usize {
        self.0.iter().filter(|r| r.description.is_empty()).count()
    }

    /// Pretty JSON for `--json` dumps. Stable across runs for identical input.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<ProjectRecord> for ProjectCollection {
    fn from_iter<I: IntoIterator<Item = ProjectRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// PageSize
// ---------------------------------------------------------------------------

/// Output page size for the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in PDF points (1/72 inch).
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(format!("unknown page size '{other}' (expected letter or a4)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("mbax1234", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("mbax1234"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn listing_item_completes_with_empty_description() {
        let item = ListingItem {
            id: "7".into(),
            title: "Compilers".into(),
            detail_url: Url::parse("https://example.com/p/7").unwrap(),
        };
        let record = item.complete("");
        assert_eq!(record.id, "7");
        assert_eq!(record.description, "");
    }

    #[test]
    fn collection_serializes_as_plain_array() {
        let collection: ProjectCollection = vec![ProjectRecord {
            id: "1".into(),
            title: "Alpha".into(),
            description: String::new(),
        }]
        .into_iter()
        .collect();

        let json = collection.to_json().expect("serialize");
        assert!(json.trim_start().starts_with('['));
        assert_eq!(collection.missing_descriptions(), 1);

        let parsed: ProjectCollection = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, collection);
    }

    #[test]
    fn page_size_parses_case_insensitively() {
        assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
        assert_eq!("letter".parse::<PageSize>(), Ok(PageSize::Letter));
        assert!("legal".parse::<PageSize>().is_err());
    }
}
