//! crates/storyteller_core/src/media.rs
//!
//! Resolves a page's displayable image and playable audio from the fields the
//! remote service may fill in.
//!
//! Image priority is fixed: inline base64 data, then the image path, then nothing.
//! Audio only comes from a path. Paths that are already `http(s)` URLs resolve to
//! remote references; every other path is treated as a local file whose
//! backslash separators are rewritten to forward slashes.

use crate::domain::{Page, Story};
use std::fmt;

pub const LOCAL_FILE_SCHEME: &str = "file://";
pub const INLINE_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Base64-encoded PNG bytes carried in the page itself.
    Inline { base64: String },
    /// A normalized (forward-slash) local filesystem path.
    LocalFile(String),
    Remote(String),
}

impl ImageRef {
    /// The URI a renderer can load: a data URI, a `file://` URI or the remote URL.
    pub fn uri(&self) -> String {
        match self {
            ImageRef::Inline { base64 } => format!("data:{};base64,{}", INLINE_IMAGE_MIME, base64),
            ImageRef::LocalFile(path) => format!("{}{}", LOCAL_FILE_SCHEME, path),
            ImageRef::Remote(url) => url.clone(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioRef {
    /// A normalized (forward-slash) local filesystem path.
    LocalFile(String),
    Remote(String),
}

impl AudioRef {
    pub fn uri(&self) -> String {
        match self {
            AudioRef::LocalFile(path) => format!("{}{}", LOCAL_FILE_SCHEME, path),
            AudioRef::Remote(url) => url.clone(),
        }
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Rewrites every backslash separator to a forward slash.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

fn is_remote(path: &str) -> bool {
    let lower = path.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Empty strings count as absent, the same as a missing field.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

pub fn resolve_image_source(page: &Page) -> Option<ImageRef> {
    match (present(&page.image_base64), present(&page.image_path)) {
        (Some(data), _) => Some(ImageRef::Inline {
            base64: data.to_string(),
        }),
        (None, Some(path)) if is_remote(path) => Some(ImageRef::Remote(path.to_string())),
        (None, Some(path)) => Some(ImageRef::LocalFile(normalize_path(path))),
        (None, None) => None,
    }
}

pub fn resolve_audio_source(page: &Page) -> Option<AudioRef> {
    match present(&page.audio_path) {
        Some(path) if is_remote(path) => Some(AudioRef::Remote(path.to_string())),
        Some(path) => Some(AudioRef::LocalFile(normalize_path(path))),
        None => None,
    }
}

/// Applies the page image rules to the story's first page.
pub fn resolve_cover_image_source(story: &Story) -> Option<ImageRef> {
    story.cover_page().and_then(resolve_image_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceId;

    fn page(image_base64: Option<&str>, image_path: Option<&str>, audio_path: Option<&str>) -> Page {
        Page {
            image_path: image_path.map(str::to_string),
            image_base64: image_base64.map(str::to_string),
            audio_path: audio_path.map(str::to_string),
            text: String::new(),
        }
    }

    #[test]
    fn inline_data_wins_over_path() {
        let resolved = resolve_image_source(&page(Some("QQ=="), Some("C:\\x\\y.png"), None));

        assert_eq!(
            resolved,
            Some(ImageRef::Inline {
                base64: "QQ==".to_string()
            })
        );
        assert_eq!(resolved.unwrap().uri(), "data:image/png;base64,QQ==");
    }

    #[test]
    fn image_path_is_normalized_to_file_uri() {
        let resolved = resolve_image_source(&page(None, Some("C:\\a\\b\\c.png"), None)).unwrap();

        assert_eq!(resolved, ImageRef::LocalFile("C:/a/b/c.png".to_string()));
        assert_eq!(resolved.uri(), "file://C:/a/b/c.png");
    }

    #[test]
    fn page_without_image_fields_has_no_image() {
        assert_eq!(resolve_image_source(&page(None, None, Some("a.mp3"))), None);
        assert_eq!(resolve_image_source(&page(Some(""), Some(""), None)), None);
    }

    #[test]
    fn empty_base64_falls_back_to_path() {
        let resolved = resolve_image_source(&page(Some(""), Some("/img/1.png"), None));
        assert_eq!(resolved, Some(ImageRef::LocalFile("/img/1.png".to_string())));
    }

    #[test]
    fn remote_paths_stay_remote() {
        let image = resolve_image_source(&page(None, Some("https://cdn.example/1.png"), None));
        let audio = resolve_audio_source(&page(None, None, Some("http://cdn.example/1.mp3")));

        assert_eq!(image, Some(ImageRef::Remote("https://cdn.example/1.png".to_string())));
        assert_eq!(audio.unwrap().uri(), "http://cdn.example/1.mp3");
    }

    #[test]
    fn audio_uses_path_only() {
        assert_eq!(
            resolve_audio_source(&page(Some("QQ=="), None, Some("D:\\audio\\p1.mp3"))),
            Some(AudioRef::LocalFile("D:/audio/p1.mp3".to_string()))
        );
        assert_eq!(resolve_audio_source(&page(Some("QQ=="), Some("x.png"), None)), None);
    }

    #[test]
    fn cover_image_comes_from_first_page() {
        let mut story = Story {
            id: ResourceId::Number(1),
            title: "Cover".to_string(),
            description: String::new(),
            pages: Vec::new(),
            date_published: None,
            rating: None,
        };
        assert_eq!(resolve_cover_image_source(&story), None);

        story.pages.push(page(Some("QQ=="), Some("C:\\x\\y.png"), None));
        story.pages.push(page(None, Some("second.png"), None));
        assert_eq!(
            resolve_cover_image_source(&story),
            Some(ImageRef::Inline {
                base64: "QQ==".to_string()
            })
        );
    }
}
