use serde::{Deserialize, Serialize};

/// Record metadata, either standalone or nested in a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub chapter: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub solved: bool,
    #[serde(default)]
    pub iteration: Option<String>,
}

/// A chapter of the episodic and the records it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Chapter {
    /// Records that are solved and carry a name.
    pub fn solved_records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records
            .iter()
            .filter(|record| record.solved)
            .filter_map(|record| record.name.as_deref().map(|name| (name, record)))
    }
}

/// One line of a record's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLine {
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub emphasis: Option<String>,
    pub text: String,
}

/// Full text of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordText {
    #[serde(default)]
    pub title: Option<String>,
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
