//! Gallery catalog: the ordered, immutable collection of exhibited items
//!
//! The catalog is supplied once when the gallery mounts and never changes
//! afterwards. Its order defines the navigation sequence and the order of
//! the thumbnail strip.

use crate::AppError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Built-in exhibition, embedded at compile time
const BUILTIN_EXHIBITION: &str = include_str!("../../../assets/exhibition.json");

static BUILTIN: OnceCell<Catalog> = OnceCell::new();

/// Stable item identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an image asset, resolved by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive metadata shown in the story panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
}

impl ItemInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// "author - year", leaving out whichever part is missing
    pub fn byline(&self) -> String {
        let author = self.author.trim();
        match (author.is_empty(), self.year) {
            (false, Some(year)) => format!("{} - {}", author, year),
            (false, None) => author.to_string(),
            (true, Some(year)) => year.to_string(),
            (true, None) => String::new(),
        }
    }
}

/// One entry of the exhibition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: ItemId,
    /// Default ("processed") rendition
    pub image: ImageRef,
    /// Optional "original" rendition
    #[serde(default, deserialize_with = "deserialize_alternate")]
    pub original: Option<ImageRef>,
    pub info: ItemInfo,
}

impl GalleryItem {
    pub fn new(id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            image: ImageRef::new(image),
            original: None,
            info: ItemInfo::default(),
        }
    }

    /// Attach an original rendition. Blank references count as absent.
    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = non_blank(original.into());
        self
    }

    pub fn with_info(mut self, info: ItemInfo) -> Self {
        self.info = info;
        self
    }

    pub fn has_alternate(&self) -> bool {
        self.original.is_some()
    }

    pub fn alternate(&self) -> Option<&ImageRef> {
        self.original.as_ref()
    }
}

fn non_blank(raw: String) -> Option<ImageRef> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(ImageRef(raw))
    }
}

fn deserialize_alternate<'de, D>(deserializer: D) -> Result<Option<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(non_blank))
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    title: Option<String>,
    items: Vec<GalleryItem>,
}

/// Validated, non-empty item collection with unique ids
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    title: String,
    items: Vec<GalleryItem>,
}

impl Catalog {
    pub const DEFAULT_TITLE: &'static str = "Virtual Gallery";

    /// Build a catalog, rejecting empty collections and duplicate ids
    pub fn new(items: Vec<GalleryItem>) -> Result<Self, AppError> {
        if items.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::DuplicateId(item.id.to_string()));
            }
        }

        Ok(Self {
            title: Self::DEFAULT_TITLE.to_string(),
            items,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let catalog = Self::new(file.items)?;

        Ok(match file.title {
            Some(title) if !title.trim().is_empty() => catalog.with_title(title),
            _ => catalog,
        })
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::CatalogNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!("Catalog loaded from {:?} ({} items)", path, catalog.len());
        Ok(catalog)
    }

    /// The exhibition bundled with the application
    pub fn builtin() -> Result<&'static Catalog, AppError> {
        BUILTIN.get_or_try_init(|| Self::from_json(BUILTIN_EXHIBITION))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Number of items. A catalog is never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

}

impl std::ops::Index<usize> for Catalog {
    type Output = GalleryItem;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(AppError::EmptyCatalog)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            GalleryItem::new("p1", "/a.png"),
            GalleryItem::new("p2", "/b.png"),
            GalleryItem::new("p1", "/c.png"),
        ];

        match Catalog::new(items) {
            Err(AppError::DuplicateId(id)) => assert_eq!(id, "p1"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_original_is_absent() {
        let item = GalleryItem::new("p9", "/sp9.png").with_original("");
        assert!(!item.has_alternate());

        let item = GalleryItem::new("p9", "/sp9.png").with_original("   ");
        assert!(item.alternate().is_none());

        let item = GalleryItem::new("p1", "/sp1.png").with_original("/sc1.png");
        assert_eq!(item.alternate(), Some(&ImageRef::new("/sc1.png")));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "title": "Spring Exhibition",
            "items": [
                {
                    "id": "a",
                    "image": "/recovery/a.png",
                    "original": "/pictures/a.png",
                    "info": { "title": "First", "author": "", "year": 1975, "description": "d", "link": "https://example.org/a" }
                },
                {
                    "id": "b",
                    "image": "/recovery/b.png",
                    "original": "",
                    "info": { "title": "Second", "year": null }
                },
                {
                    "id": "c",
                    "image": "/recovery/c.png",
                    "info": { "title": "Third" }
                }
            ]
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.title(), "Spring Exhibition");
        assert_eq!(catalog.len(), 3);
        assert!(catalog[0].has_alternate());
        assert!(!catalog[1].has_alternate());
        assert!(!catalog[2].has_alternate());
        assert_eq!(catalog[1].info.year, None);
        assert_eq!(catalog[2].id, ItemId::new("c"));
    }

    #[test]
    fn test_from_json_default_title() {
        let json = r#"{ "items": [ { "id": "a", "image": "/a.png", "info": { "title": "A" } } ] }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.title(), Catalog::DEFAULT_TITLE);
    }

    #[test]
    fn test_from_json_empty_items() {
        let json = r#"{ "title": "Nothing", "items": [] }"#;
        assert!(matches!(Catalog::from_json(json), Err(AppError::EmptyCatalog)));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(Catalog::from_json("[1, 2"), Err(AppError::CatalogParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "items": [ {{ "id": "x", "image": "/x.png", "original": "/x-orig.png", "info": {{ "title": "X" }} }} ] }}"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog[0].has_alternate());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(Catalog::load(&path), Err(AppError::CatalogNotFound(_))));
    }

    #[test]
    fn test_builtin_exhibition() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog[0].id.as_str(), "p12");

        // The last two photographs only exist in one rendition
        let without_original: Vec<&str> = catalog
            .items()
            .iter()
            .filter(|item| !item.has_alternate())
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(without_original, vec!["p9", "p8"]);
    }

    #[test]
    fn test_byline() {
        let mut info = ItemInfo::new("Title");
        assert_eq!(info.byline(), "");

        info.year = Some(1975);
        assert_eq!(info.byline(), "1975");

        info.author = "TTXVN".into();
        assert_eq!(info.byline(), "TTXVN - 1975");

        info.year = None;
        assert_eq!(info.byline(), "TTXVN");
    }
}
