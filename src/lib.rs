//! Blog backend for a portfolio site.
//!
//! Posts come from a single RSS feed and are held in an in-memory cache
//! ([`cache::FeedCache`]) that serves stale data when the feed is unreachable.
//! [`server::app`] exposes them over a small JSON API.

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod post;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;
