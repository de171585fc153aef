//! Canned responses and a client wired to the in-memory transport.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thorns_core::{AppConfig, CacheRegistry, ManualClock};

use super::ThornsClient;
use crate::transport::fake::FakeTransport;

pub(crate) const ROOT: &str = "https://fractalthorns.com/api/v1/";

/// Route key of an API call with the given JSON body.
pub(crate) fn api(endpoint: &str, body: &str) -> String {
    format!("{ROOT}{endpoint}?body={body}")
}

pub(crate) fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_722_470_400, 0).unwrap()
}

pub(crate) struct Harness {
    pub client: ThornsClient,
    pub fake: Arc<FakeTransport>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(CacheRegistry::ephemeral(), |fake, _| fake)
    }

    /// Harness whose cache is restored from and saved to disk.
    pub fn persistent(cache: CacheRegistry) -> Self {
        Self::build(cache, |fake, _| fake)
    }

    /// Requests wait for `parties` concurrent callers, and each response
    /// moves the clock forward one second.
    pub fn racing(parties: usize) -> Self {
        Self::build(CacheRegistry::ephemeral(), |fake, clock| fake.with_barrier(parties).with_clock(clock.clone()))
    }

    fn build(
        cache: CacheRegistry,
        configure: impl FnOnce(FakeTransport, &Arc<ManualClock>) -> FakeTransport,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(start()));
        let fake = Arc::new(configure(FakeTransport::new(), &clock));
        let client = ThornsClient::new(fake.clone(), Arc::new(cache), &AppConfig::default()).with_clock(clock.clone());
        Self { client, fake, clock }
    }
}

pub(crate) const NEWS_JSON: &str = r#"{"items": [
    {"title": "records update", "items": ["two new records"], "date": "2024-07-30", "version": "2.4"},
    {"title": "quiet day", "date": "2024-07-29"}
]}"#;

pub(crate) fn image_json(name: &str, title: &str) -> String {
    format!(
        r#"{{"name": "{name}", "title": "{title}", "date": "2024-07-01", "ordinal": 7,
            "image_url": "/images/{name}.png", "thumb_url": "/thumbs/{name}.png",
            "canon": "234ae", "has_description": true, "characters": ["vell"]}}"#
    )
}

pub(crate) fn images_json(names: &[&str]) -> String {
    let images: Vec<String> = names.iter().map(|name| image_json(name, &name.to_uppercase())).collect();
    format!(r#"{{"images": [{}]}}"#, images.join(","))
}

pub(crate) const EPISODIC_JSON: &str = r#"{"chapters": [
    {"name": "I", "records": [
        {"chapter": "I", "name": "r1", "title": "first light", "solved": true, "iteration": "1"},
        {"chapter": "I", "solved": false},
        {"chapter": "I", "name": "r2", "title": "second light", "solved": true, "iteration": "1"}
    ]},
    {"name": "II", "records": [
        {"chapter": "II", "name": "r3", "title": "third light", "solved": true, "iteration": "2"}
    ]}
]}"#;

pub(crate) fn record_json(name: &str, title: &str) -> String {
    format!(r#"{{"chapter": "I", "name": "{name}", "title": "{title}", "solved": true, "iteration": "1"}}"#)
}

pub(crate) fn record_text_json(lines: &[&str]) -> String {
    let lines: Vec<String> = lines.iter().map(|text| format!(r#"{{"text": "{text}", "character": "vell"}}"#)).collect();
    format!(
        r#"{{"iteration": "1", "header_lines": ["LOG START"], "languages": ["en"], "characters": ["vell"], "lines": [{}]}}"#,
        lines.join(",")
    )
}
