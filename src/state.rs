use std::{sync::Arc, time::Instant};

use crate::{
    cache::FeedCache,
    config::Config,
    feed::{FeedSource, HttpFeedSource},
};

pub struct AppState {
    pub config: Config,
    pub feed_cache: FeedCache,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_source(config, Arc::new(HttpFeedSource::default()))
    }

    pub fn with_source(config: Config, source: Arc<dyn FeedSource>) -> Arc<Self> {
        let feed_cache = FeedCache::new(source, config.feed_url.clone(), config.cache_ttl);

        Arc::new(Self {
            config,
            feed_cache,
            started_at: Instant::now(),
        })
    }
}
