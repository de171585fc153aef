use thorns_core::model::{SearchResult, SearchType};
use thorns_core::{CacheDomain, Error, SearchKey};

use super::ThornsClient;
use super::response::SearchResponse;
use crate::endpoint::{Arguments, Endpoint};

impl ThornsClient {
    /// Search the site for `term`.
    ///
    /// `kind` must be one of `image`, `episodic-item` or `episodic-line`;
    /// anything else fails before a request is made. Line hits on solved
    /// records get their line text resolved through [`Self::record_text`].
    pub async fn domain_search(&self, term: &str, kind: &str) -> Result<Vec<SearchResult>, Error> {
        let kind: SearchType = kind.parse()?;
        let key = SearchKey::new(term, kind);
        let now = self.clock.now();
        if let Some(results) = self.cache.read(|state| state.search_results.fresh(&key, now).cloned()) {
            tracing::debug!(search = %key, "search cache hit");
            return Ok(results);
        }

        let args = Arguments::new().with("term", term).with("type", kind.as_str());
        let response: SearchResponse = self.call(Endpoint::DomainSearch, args).await?;

        let mut results = Vec::with_capacity(response.results.len());
        for mut result in response.results {
            result.image = result.image.map(|image| image.resolve_urls(&self.origin));
            self.resolve_line(&mut result).await?;
            results.push(result);
        }

        let cached_at = self.clock.now();
        self.cache.update(|state| state.search_results.put(key, results.clone(), cached_at));
        self.cache.persist(CacheDomain::SearchResults).await?;

        Ok(results)
    }

    async fn resolve_line(&self, result: &mut SearchResult) -> Result<(), Error> {
        let Some(index) = result.record_line_index else {
            return Ok(());
        };
        let Some(name) = result.record.as_ref().filter(|record| record.solved).and_then(|record| record.name.clone())
        else {
            return Ok(());
        };

        let text = self.record_text(&name).await?;
        result.record_line = text.lines.get(index).cloned();
        if result.record_line.is_none() {
            tracing::warn!(record = %name, index, lines = text.lines.len(), "search hit points past the record text");
        }
        Ok(())
    }
}
