use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Image metadata from `single_image` / `all_images`.
///
/// `image_url` and `thumb_url` are absolute once the value is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub title: String,
    pub date: String,
    pub ordinal: i64,
    pub image_url: String,
    pub thumb_url: String,
    #[serde(default)]
    pub canon: Option<String>,
    #[serde(default)]
    pub has_description: bool,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub speedpaint_video_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

impl Image {
    /// Prefix both image URLs with `origin` when they are site-relative.
    pub fn resolve_urls(mut self, origin: &str) -> Self {
        self.image_url = absolute(origin, &self.image_url);
        self.thumb_url = absolute(origin, &self.thumb_url);
        self
    }
}

fn absolute(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{origin}{path}")
    }
}

/// Raw payloads of an image and its thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContents {
    pub image: Bytes,
    pub thumbnail: Bytes,
}

/// Description text for an image, titled after the image itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescription {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "name": "eyes",
        "title": "eyes of the beholder",
        "date": "2024-03-02",
        "ordinal": 41,
        "image_url": "/images/eyes.png",
        "thumb_url": "/images/eyes_thumb.png",
        "canon": "209151",
        "has_description": true,
        "characters": ["vel"],
        "speedpaint_video_url": null
    }"#;

    #[test]
    fn test_deserialize_image() {
        let image: Image = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(image.name, "eyes");
        assert_eq!(image.ordinal, 41);
        assert!(image.has_description);
        assert!(image.primary_color.is_none());
    }

    #[test]
    fn test_resolve_urls() {
        let image: Image = serde_json::from_str(FIXTURE_JSON).unwrap();
        let image = image.resolve_urls("https://fractalthorns.com");
        assert_eq!(image.image_url, "https://fractalthorns.com/images/eyes.png");
        assert_eq!(image.thumb_url, "https://fractalthorns.com/images/eyes_thumb.png");

        let again = image.clone().resolve_urls("https://fractalthorns.com");
        assert_eq!(again, image);
    }
}
