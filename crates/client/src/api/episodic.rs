//! Chapters, records and record text.

use std::collections::BTreeMap;

use thorns_core::model::{Chapter, Record, RecordText};
use thorns_core::{CacheDomain, Error};

use super::ThornsClient;
use super::response::{EpisodicResponse, RecordTextResponse};
use crate::endpoint::{Arguments, Endpoint};

impl ThornsClient {
    /// Every chapter with its records.
    ///
    /// Refreshing replaces the chapters and records domains; every solved
    /// record found in the chapters is cached as a record as well.
    pub async fn full_episodic(&self) -> Result<Vec<Chapter>, Error> {
        let now = self.clock.now();
        let cached = self.cache.read(|state| {
            state
                .metadata
                .full_episodic_fresh(now)
                .then(|| state.chapters.get().map(|entry| entry.value.clone()))
                .flatten()
        });
        if let Some(chapters) = cached {
            tracing::debug!(count = chapters.len(), "episodic cache hit");
            return Ok(chapters);
        }

        let response: EpisodicResponse = self.call(Endpoint::FullEpisodic, Arguments::new()).await?;
        let chapters = response.chapters;

        let cached_at = self.clock.now();
        let solved = self.cache.update(|state| -> Result<usize, Error> {
            state.purge(CacheDomain::Chapters, true, cached_at)?;
            state.purge(CacheDomain::Records, true, cached_at)?;
            state.chapters.put(chapters.clone(), cached_at);
            for chapter in &chapters {
                for (name, record) in chapter.solved_records() {
                    state.records.put(name.to_string(), record.clone(), cached_at);
                }
            }
            state.metadata.last_full_episodic = Some(cached_at);
            Ok(state.records.len())
        })?;
        tracing::info!(chapters = chapters.len(), solved, "episodic domains repopulated");
        self.cache.persist(CacheDomain::Chapters).await?;
        self.cache.persist(CacheDomain::Records).await?;

        Ok(chapters)
    }

    pub async fn single_record(&self, name: &str) -> Result<Record, Error> {
        let now = self.clock.now();
        if let Some(record) = self.cache.read(|state| state.records.fresh(name, now).cloned()) {
            tracing::debug!(record = name, "record cache hit");
            return Ok(record);
        }

        let record: Record = self.call(Endpoint::SingleRecord, Arguments::new().with("name", name)).await?;
        let cached_at = self.clock.now();
        self.cache.update(|state| state.records.put(name.to_string(), record.clone(), cached_at));
        self.cache.persist(CacheDomain::Records).await?;

        Ok(record)
    }

    /// Text of a record, titled through the record's own metadata.
    pub async fn record_text(&self, name: &str) -> Result<RecordText, Error> {
        let now = self.clock.now();
        if let Some(text) = self.cache.read(|state| state.record_contents.fresh(name, now).cloned()) {
            tracing::debug!(record = name, "record text cache hit");
            return Ok(text);
        }

        let response: RecordTextResponse =
            self.call(Endpoint::RecordText, Arguments::new().with("name", name)).await?;
        let title = self.single_record(name).await?.title;
        let text = response.into_record_text(title);

        let cached_at = self.clock.now();
        self.cache.update(|state| state.record_contents.put(name.to_string(), text.clone(), cached_at));
        self.cache.persist(CacheDomain::RecordContents).await?;

        Ok(text)
    }

    /// Text of every solved record, keyed by record name.
    pub async fn full_record_contents(&self) -> Result<BTreeMap<String, RecordText>, Error> {
        let now = self.clock.now();
        if let Some(contents) = self.cache.read(|state| state.full_record_contents.fresh(now).cloned()) {
            tracing::debug!(count = contents.len(), "full record contents cache hit");
            return Ok(contents);
        }

        let chapters = self.full_episodic().await?;
        let mut contents = BTreeMap::new();
        for chapter in &chapters {
            for (name, _) in chapter.solved_records() {
                let text = self.record_text(name).await?;
                contents.insert(name.to_string(), text);
            }
        }

        let cached_at = self.clock.now();
        self.cache.update(|state| state.full_record_contents.put(contents.clone(), cached_at));
        self.cache.persist(CacheDomain::FullRecordContents).await?;

        Ok(contents)
    }
}
