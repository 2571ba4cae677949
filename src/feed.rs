use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use rss::Channel;
use thiserror::Error;

use crate::utils::strip_html;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Feed responded with HTTP {0}")]
    Status(u16),

    #[error("Malformed feed: {0}")]
    Parse(#[from] rss::Error),
}

/// One entry of the remote feed, before it is turned into a post.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// `content:encoded`
    pub content_encoded: Option<String>,
    pub description: Option<String>,
    /// `description` as plain text, when it has any.
    pub snippet: Option<String>,
    pub iso_date: Option<String>,
    pub pub_date: Option<String>,
    pub categories: Vec<String>,
    /// `dc:creator`
    pub creator: Option<String>,
    pub author: Option<String>,
    pub enclosure_url: Option<String>,
}

impl From<&rss::Item> for RawFeedItem {
    fn from(item: &rss::Item) -> Self {
        let dublin_core = item.dublin_core_ext();
        let iso_date = item.pub_date().and_then(normalize_date).or_else(|| {
            dublin_core.and_then(|dc| dc.dates().first().cloned())
        });

        Self {
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            content_encoded: item.content().map(str::to_string),
            description: item.description().map(str::to_string),
            snippet: item
                .description()
                .map(|description| strip_html(description).trim().to_string())
                .filter(|snippet| !snippet.is_empty()),
            iso_date,
            pub_date: item.pub_date().map(str::to_string),
            categories: item
                .categories()
                .iter()
                .map(|category| category.name().to_string())
                .collect(),
            creator: dublin_core.and_then(|dc| dc.creators().first().cloned()),
            author: item.author().map(str::to_string),
            enclosure_url: item.enclosure().map(|enclosure| enclosure.url().to_string()),
        }
    }
}

/// Re-renders an RFC 2822 date as UTC RFC 3339 with milliseconds.
pub fn normalize_date(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(raw.trim()).ok().map(|date| {
        date.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    })
}

pub fn read_items(bytes: &[u8]) -> Result<Vec<RawFeedItem>, FeedError> {
    let channel = Channel::read_from(bytes)?;

    Ok(channel.items().iter().map(RawFeedItem::from).collect())
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawFeedItem>, FeedError>;
}

#[derive(Clone, Default)]
pub struct HttpFeedSource {
    client: Client,
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawFeedItem>, FeedError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        read_items(&bytes)
    }
}
