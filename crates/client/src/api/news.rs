use thorns_core::model::NewsEntry;
use thorns_core::{CacheDomain, Error};

use super::ThornsClient;
use super::response::NewsResponse;
use crate::endpoint::{Arguments, Endpoint};

impl ThornsClient {
    /// All news entries.
    pub async fn all_news(&self) -> Result<Vec<NewsEntry>, Error> {
        let now = self.clock.now();
        if let Some(items) = self.cache.read(|state| state.news.fresh(now).cloned()) {
            tracing::debug!("news cache hit");
            return Ok(items);
        }

        let response: NewsResponse = self.call(Endpoint::AllNews, Arguments::new()).await?;
        let cached_at = self.clock.now();
        self.cache.update(|state| state.news.put(response.items.clone(), cached_at));
        self.cache.persist(CacheDomain::NewsItems).await?;

        Ok(response.items)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let h = Harness::new();
        h.fake.route(api("all_news", "{}"), NEWS_JSON);

        let first = h.client.all_news().await.unwrap();
        h.clock.advance(Duration::hours(12));
        let second = h.client.all_news().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(h.fake.request_count(), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let h = Harness::new();
        h.fake.route(api("all_news", "{}"), NEWS_JSON);

        h.client.all_news().await.unwrap();
        h.clock.advance(Duration::hours(12) + Duration::seconds(1));
        h.client.all_news().await.unwrap();

        assert_eq!(h.fake.request_count(), 2);
        assert_eq!(h.fake.requests()[0], "https://fractalthorns.com/api/v1/all_news?body={}");
    }
}
