use serde::{Deserialize, Serialize};

use crate::feed::RawFeedItem;
use crate::utils::{extract_excerpt, extract_first_image, generate_slug};

pub const UNTITLED: &str = "Untitled";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub published_at: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
}

impl From<RawFeedItem> for FeedPost {
    fn from(item: RawFeedItem) -> Self {
        let slug = generate_slug(item.title.as_deref().unwrap_or_default());
        let content = item
            .content_encoded
            .or_else(|| item.description.clone())
            .unwrap_or_default();
        let excerpt = extract_excerpt(item.snippet.as_deref().unwrap_or(&content));
        let thumbnail = item.enclosure_url.or_else(|| {
            item.description
                .as_deref()
                .and_then(extract_first_image)
                .or_else(|| extract_first_image(&content))
        });

        Self {
            title: item.title.unwrap_or_else(|| UNTITLED.to_string()),
            slug,
            excerpt,
            content,
            published_at: item.iso_date.or(item.pub_date).unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            thumbnail,
            tags: item.categories,
            author: item.creator.or(item.author).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> RawFeedItem {
        RawFeedItem {
            title: Some("Shipping a Side Project".to_string()),
            link: Some("https://example.substack.com/p/shipping".to_string()),
            content_encoded: Some(
                r#"<p>Full text <img src="https://cdn.example.com/inline.png"></p>"#.to_string(),
            ),
            description: Some("<p>Summary</p>".to_string()),
            snippet: Some("Summary".to_string()),
            iso_date: Some("2024-03-01T10:00:00.000Z".to_string()),
            pub_date: Some("Fri, 01 Mar 2024 10:00:00 GMT".to_string()),
            categories: vec!["projects".to_string()],
            creator: Some("Shiro".to_string()),
            author: Some("shiro@example.com".to_string()),
            ..RawFeedItem::default()
        }
    }

    #[test]
    fn complete_item_maps_every_field() {
        let post = FeedPost::from(item());

        assert_eq!(post.title, "Shipping a Side Project");
        assert_eq!(post.slug, "shipping-a-side-project");
        assert_eq!(post.excerpt, "Summary");
        assert!(post.content.starts_with("<p>Full text"));
        assert_eq!(post.published_at, "2024-03-01T10:00:00.000Z");
        assert_eq!(post.link, "https://example.substack.com/p/shipping");
        assert_eq!(
            post.thumbnail.as_deref(),
            Some("https://cdn.example.com/inline.png")
        );
        assert_eq!(post.tags, vec!["projects"]);
        assert_eq!(post.author, "Shiro");
    }

    #[test]
    fn enclosure_wins_over_inline_image() {
        let post = FeedPost::from(RawFeedItem {
            enclosure_url: Some("https://cdn.example.com/cover.jpg".to_string()),
            ..item()
        });

        assert_eq!(
            post.thumbnail.as_deref(),
            Some("https://cdn.example.com/cover.jpg")
        );
    }

    #[test]
    fn description_image_wins_over_body_image() {
        let post = FeedPost::from(RawFeedItem {
            description: Some(r#"<img src="https://cdn.example.com/subtitle.png">"#.to_string()),
            ..item()
        });

        assert_eq!(
            post.thumbnail.as_deref(),
            Some("https://cdn.example.com/subtitle.png")
        );
    }

    #[test]
    fn body_is_used_for_excerpt_without_snippet() {
        let post = FeedPost::from(RawFeedItem {
            snippet: None,
            ..item()
        });

        assert_eq!(post.excerpt, "Full text ");
    }

    #[test]
    fn snippet_is_preferred_for_excerpt() {
        let post = FeedPost::from(RawFeedItem {
            snippet: Some("Hand written teaser".to_string()),
            ..item()
        });

        assert_eq!(post.excerpt, "Hand written teaser");
    }

    #[test]
    fn description_and_raw_date_are_fallbacks() {
        let post = FeedPost::from(RawFeedItem {
            content_encoded: None,
            iso_date: None,
            creator: None,
            ..item()
        });

        assert_eq!(post.content, "<p>Summary</p>");
        assert_eq!(post.excerpt, "Summary");
        assert_eq!(post.published_at, "Fri, 01 Mar 2024 10:00:00 GMT");
        assert_eq!(post.author, "shiro@example.com");
        assert_eq!(post.thumbnail, None);
    }

    #[test]
    fn empty_item_gets_defaults() {
        let post = FeedPost::from(RawFeedItem::default());

        assert_eq!(post.title, UNTITLED);
        assert_eq!(post.slug, "");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.content, "");
        assert_eq!(post.published_at, "");
        assert_eq!(post.link, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.author, "");
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_thumbnail() {
        let post = FeedPost::from(RawFeedItem::default());
        let value = serde_json::to_value(&post).unwrap();

        assert!(value.get("publishedAt").is_some());
        assert!(value.get("thumbnail").is_none());
    }
}
