//! Response bodies as the API sends them.

use serde::Deserialize;
use thorns_core::model::{Chapter, Image, NewsEntry, RecordLine, RecordText, SearchResult};

#[derive(Debug, Deserialize)]
pub(crate) struct NewsResponse {
    pub items: Vec<NewsEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImagesResponse {
    pub images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EpisodicResponse {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DescriptionResponse {
    #[serde(default)]
    pub description: Option<String>,
}

/// `record_text` body; the title comes from `single_record`.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordTextResponse {
    pub iteration: String,
    #[serde(default)]
    pub header_lines: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub lines: Vec<RecordLine>,
}

impl RecordTextResponse {
    pub fn into_record_text(self, title: Option<String>) -> RecordText {
        RecordText {
            title,
            iteration: self.iteration,
            header_lines: self.header_lines,
            languages: self.languages,
            characters: self.characters,
            lines: self.lines,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use thorns_core::model::SearchType;

    #[test]
    fn test_record_text_takes_external_title() {
        let raw: RecordTextResponse = serde_json::from_str(
            r#"{"iteration": "2", "header_lines": ["LOG"], "lines": [{"text": "hello", "character": "vell"}]}"#,
        )
        .unwrap();
        let text = raw.into_record_text(Some("first light".to_string()));
        assert_eq!(text.title.as_deref(), Some("first light"));
        assert_eq!(text.lines[0].character.as_deref(), Some("vell"));
        assert!(text.languages.is_empty());
    }

    #[test]
    fn test_search_response_tolerates_unknown_result_type() {
        let raw: SearchResponse = serde_json::from_str(
            r#"{"results": [{"type": "episodic-item"}, {"type": "comic-panel", "record_matched_text": "eyes"}]}"#,
        )
        .unwrap();
        assert_eq!(raw.results.len(), 2);
        assert_eq!(raw.results[1].kind, "comic-panel");
        assert_eq!(raw.results[1].search_type(), None);
    }

    #[test]
    fn test_search_results_parse_type() {
        let raw: SearchResponse =
            serde_json::from_str(r#"{"results": [{"type": "episodic-item", "record_matched_text": "eyes"}]}"#)
                .unwrap();
        assert_eq!(raw.results[0].search_type(), Some(SearchType::EpisodicItem));
        assert!(raw.results[0].record.is_none());
    }
}
