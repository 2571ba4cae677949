//! Single-slot TTL cache in front of the remote feed.
//!
//! Entries expire lazily: an expired entry is skipped on the fast path but
//! stays in the slot, so a failed fetch can still fall back to it.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::{error::BlogError, feed::FeedSource, post::FeedPost};

pub const CACHE_KEY: &str = "blog:posts";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPosts {
    pub posts: Vec<FeedPost>,
    pub cached: bool,
}

#[derive(Default)]
struct CacheSlot {
    posts: Option<Vec<FeedPost>>,
    /// `None` with posts present means the entry never expires.
    expires_at: Option<Instant>,
}

impl CacheSlot {
    fn live(&self, now: Instant) -> Option<&Vec<FeedPost>> {
        match self.expires_at {
            Some(expires_at) if now >= expires_at => None,
            _ => self.posts.as_ref(),
        }
    }

    fn store(&mut self, posts: Vec<FeedPost>, now: Instant, ttl: Duration) {
        // A TTL too large to represent as an instant never expires.
        self.expires_at = if ttl.is_zero() {
            None
        } else {
            now.checked_add(ttl)
        };
        self.posts = Some(posts);
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

pub struct FeedCache {
    source: Arc<dyn FeedSource>,
    feed_url: String,
    ttl: Duration,
    slot: Mutex<CacheSlot>,
}

impl FeedCache {
    /// A zero or unrepresentably large `ttl` keeps entries until they are
    /// overwritten or cleared.
    pub fn new(source: Arc<dyn FeedSource>, feed_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            feed_url: feed_url.into(),
            ttl,
            slot: Mutex::new(CacheSlot::default()),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn fetch_posts(&self, force_refresh: bool) -> Result<FetchedPosts, BlogError> {
        if !force_refresh {
            let live = self.slot.lock().live(Instant::now()).cloned();
            if let Some(posts) = live {
                info!(key = CACHE_KEY, count = posts.len(), "Returning cached blog posts");
                return Ok(FetchedPosts {
                    posts,
                    cached: true,
                });
            }
        }

        info!(url = %self.feed_url, "Fetching fresh blog posts");
        let items = match self.source.fetch_feed(&self.feed_url).await {
            Ok(items) => items,
            Err(e) => {
                error!(url = %self.feed_url, "Error fetching feed: {e}");

                let stale = self.slot.lock().posts.clone();
                if let Some(posts) = stale {
                    warn!(key = CACHE_KEY, "Using stale cache due to fetch error");
                    return Ok(FetchedPosts {
                        posts,
                        cached: true,
                    });
                }

                return Err(BlogError::FetchFailed(e));
            }
        };

        if items.is_empty() {
            warn!(url = %self.feed_url, "Feed returned no items");
            return Err(BlogError::EmptyFeed);
        }

        let posts: Vec<FeedPost> = items.into_iter().map(FeedPost::from).collect();

        // Concurrent refreshes are not serialized; the last one to finish wins.
        self.slot.lock().store(posts.clone(), Instant::now(), self.ttl);
        info!(key = CACHE_KEY, count = posts.len(), "Cached blog posts");

        Ok(FetchedPosts {
            posts,
            cached: false,
        })
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<FeedPost, BlogError> {
        let FetchedPosts { posts, .. } = self.fetch_posts(false).await?;

        posts
            .into_iter()
            .find(|post| post.slug == slug)
            .ok_or_else(|| BlogError::NotFound(slug.to_string()))
    }

    pub fn clear_cache(&self) {
        self.slot.lock().clear();
        info!(key = CACHE_KEY, "Cache cleared");
    }
}
