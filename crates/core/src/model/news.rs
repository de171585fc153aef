use serde::{Deserialize, Serialize};

/// A single changelog entry from `all_news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEntry {
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub date: String,
    #[serde(default)]
    pub version: Option<String>,
}
