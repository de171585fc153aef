use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Image, Record, RecordLine};
use crate::Error;

/// The kinds of domain search the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchType {
    Image,
    EpisodicItem,
    EpisodicLine,
}

impl SearchType {
    pub const ALL: [SearchType; 3] = [SearchType::Image, SearchType::EpisodicItem, SearchType::EpisodicLine];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::Image => "image",
            SearchType::EpisodicItem => "episodic-item",
            SearchType::EpisodicLine => "episodic-line",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidSearchType(s.to_string()))
    }
}

/// One hit of a domain search.
///
/// For line hits on solved records, `record_line` holds the resolved line.
/// `kind` keeps the type string as sent, so unfamiliar kinds still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub record: Option<Record>,
    #[serde(default)]
    pub record_line: Option<RecordLine>,
    #[serde(default)]
    pub record_matched_text: Option<String>,
    #[serde(default)]
    pub record_line_index: Option<usize>,
}

impl SearchResult {
    /// The hit's kind, or `None` when it is not one the API documents.
    pub fn search_type(&self) -> Option<SearchType> {
        self.kind.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_type() {
        assert_eq!("image".parse::<SearchType>().unwrap(), SearchType::Image);
        assert_eq!("episodic-item".parse::<SearchType>().unwrap(), SearchType::EpisodicItem);
        assert_eq!("episodic-line".parse::<SearchType>().unwrap(), SearchType::EpisodicLine);
        assert!(matches!("invalid-type".parse::<SearchType>(), Err(Error::InvalidSearchType(t)) if t == "invalid-type"));
    }

    #[test]
    fn test_unknown_result_type_still_decodes() {
        let result: SearchResult = serde_json::from_str(r#"{"type": "sketch", "record_matched_text": "eyes"}"#).unwrap();
        assert_eq!(result.kind, "sketch");
        assert_eq!(result.search_type(), None);
        assert_eq!(result.record_matched_text.as_deref(), Some("eyes"));
    }

    #[test]
    fn test_search_type_serde_matches_display() {
        for kind in SearchType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
