//! Keys for the name-keyed and search-keyed domains.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::SearchType;

/// Token standing in for the sentinel default key on disk.
pub const DEFAULT_IMAGE_TOKEN: &str = "__None__";

/// Key of the image domains.
///
/// `Default` is what the origin serves when no name is given (the daily
/// image); it aliases the value of a real, named entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageKey {
    Default,
    Named(String),
}

impl ImageKey {
    pub fn named(name: impl Into<String>) -> Self {
        ImageKey::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ImageKey::Default)
    }

    /// The name to send to the origin, `None` for the default image.
    pub fn name(&self) -> Option<&str> {
        match self {
            ImageKey::Default => None,
            ImageKey::Named(name) => Some(name),
        }
    }

    /// Token used in snapshot keys and file names.
    pub fn token(&self) -> &str {
        self.name().unwrap_or(DEFAULT_IMAGE_TOKEN)
    }
}

impl From<Option<&str>> for ImageKey {
    fn from(name: Option<&str>) -> Self {
        name.map_or(ImageKey::Default, ImageKey::named)
    }
}

impl From<String> for ImageKey {
    fn from(token: String) -> Self {
        if token == DEFAULT_IMAGE_TOKEN { ImageKey::Default } else { ImageKey::Named(token) }
    }
}

impl From<ImageKey> for String {
    fn from(key: ImageKey) -> Self {
        match key {
            ImageKey::Default => DEFAULT_IMAGE_TOKEN.to_string(),
            ImageKey::Named(name) => name,
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Key of the search results domain: the term and the kind of search.
///
/// Encoded as `"<term>|<type>"`; decoding splits at the last `|` so terms
/// may contain the separator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SearchKey {
    pub term: String,
    pub kind: SearchType,
}

impl SearchKey {
    pub fn new(term: impl Into<String>, kind: SearchType) -> Self {
        Self { term: term.into(), kind }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.term, self.kind)
    }
}

impl TryFrom<String> for SearchKey {
    type Error = Error;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        let (term, kind) = encoded
            .rsplit_once('|')
            .ok_or_else(|| Error::InvalidSearchType(format!("no search type in key '{encoded}'")))?;
        Ok(Self { term: term.to_string(), kind: kind.parse()? })
    }
}

impl From<SearchKey> for String {
    fn from(key: SearchKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key_tokens() {
        assert_eq!(ImageKey::Default.token(), "__None__");
        assert_eq!(ImageKey::named("eyes").token(), "eyes");
        assert_eq!(ImageKey::from(None), ImageKey::Default);
        assert_eq!(ImageKey::from(Some("eyes")), ImageKey::named("eyes"));
        assert_eq!(ImageKey::from("__None__".to_string()), ImageKey::Default);
    }

    #[test]
    fn test_image_key_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ImageKey::Default, 1);
        map.insert(ImageKey::named("eyes"), 2);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"__None__":1,"eyes":2}"#);

        let back: std::collections::BTreeMap<ImageKey, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_search_key_splits_at_last_separator() {
        let key = SearchKey::try_from("a|b|episodic-line".to_string()).unwrap();
        assert_eq!(key.term, "a|b");
        assert_eq!(key.kind, SearchType::EpisodicLine);
        assert_eq!(key.to_string(), "a|b|episodic-line");
    }

    #[test]
    fn test_search_key_rejects_bad_encoding() {
        assert!(SearchKey::try_from("no separator".to_string()).is_err());
        assert!(matches!(
            SearchKey::try_from("term|sideways".to_string()),
            Err(Error::InvalidSearchType(t)) if t == "sideways"
        ));
    }
}
