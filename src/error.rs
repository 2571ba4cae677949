use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::feed::FeedError;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("No posts found in RSS feed")]
    EmptyFeed,

    #[error("Failed to fetch blog posts")]
    FetchFailed(#[source] FeedError),

    #[error("Post with slug \"{0}\" not found")]
    NotFound(String),
}

impl BlogError {
    pub fn status(&self) -> StatusCode {
        match self {
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::EmptyFeed | BlogError::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = BlogError::NotFound("missing-post".to_string());

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Post with slug \"missing-post\" not found");
    }

    #[test]
    fn other_failures_map_to_500() {
        assert_eq!(
            BlogError::EmptyFeed.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BlogError::FetchFailed(FeedError::Status(502)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
