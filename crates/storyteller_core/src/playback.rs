//! crates/storyteller_core/src/playback.rs
//!
//! Sequencing for page audio. At most one clip is loaded at a time, and the
//! previous clip is always unloaded before the next one is loaded.

use crate::domain::Page;
use crate::media::{self, AudioRef};
use crate::ports::{AudioBackend, ClipId, PortResult};
use std::sync::Arc;
use tracing::{info, warn};

pub struct Playback {
    backend: Arc<dyn AudioBackend>,
    current: Option<ClipId>,
}

impl Playback {
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            current: None,
        }
    }

    /// The clip currently held, if any.
    pub fn current_clip(&self) -> Option<ClipId> {
        self.current
    }

    /// Releases the held clip, then loads and starts `source`.
    pub async fn play(&mut self, source: &AudioRef) -> PortResult<ClipId> {
        self.stop().await?;

        let clip = self.backend.load(source).await?;
        self.current = Some(clip);
        info!(clip = clip.0, source = %source, "Playing audio");
        self.backend.play(clip).await?;
        Ok(clip)
    }

    /// Plays the page's audio. Returns `false` and leaves the backend untouched
    /// when the page has none.
    pub async fn play_page(&mut self, page: &Page) -> PortResult<bool> {
        match media::resolve_audio_source(page) {
            Some(source) => {
                self.play(&source).await?;
                Ok(true)
            }
            None => {
                warn!("Page has no audio to play");
                Ok(false)
            }
        }
    }

    /// Unloads the held clip. The handle is dropped even if unloading fails.
    pub async fn stop(&mut self) -> PortResult<()> {
        if let Some(clip) = self.current.take() {
            self.backend.unload(clip).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{AudioCall, RecordingAudio};

    fn audio_page(path: Option<&str>) -> Page {
        Page {
            audio_path: path.map(str::to_string),
            ..Page::default()
        }
    }

    #[tokio::test]
    async fn previous_clip_is_unloaded_before_next_load() {
        let backend = Arc::new(RecordingAudio::default());
        let mut playback = Playback::new(backend.clone());

        playback.play_page(&audio_page(Some("C:\\a\\1.mp3"))).await.unwrap();
        playback.play_page(&audio_page(Some("C:\\a\\2.mp3"))).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                AudioCall::Load("file://C:/a/1.mp3".to_string()),
                AudioCall::Play(ClipId(1)),
                AudioCall::Unload(ClipId(1)),
                AudioCall::Load("file://C:/a/2.mp3".to_string()),
                AudioCall::Play(ClipId(2)),
            ]
        );
        assert_eq!(playback.current_clip(), Some(ClipId(2)));
    }

    #[tokio::test]
    async fn page_without_audio_is_a_no_op() {
        let backend = Arc::new(RecordingAudio::default());
        let mut playback = Playback::new(backend.clone());

        assert!(!playback.play_page(&audio_page(None)).await.unwrap());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn stop_releases_and_forgets_clip() {
        let backend = Arc::new(RecordingAudio::default());
        let mut playback = Playback::new(backend.clone());

        playback.play(&AudioRef::Remote("http://x/a.mp3".to_string())).await.unwrap();
        playback.stop().await.unwrap();
        playback.stop().await.unwrap();

        assert_eq!(playback.current_clip(), None);
        assert_eq!(backend.calls().last(), Some(&AudioCall::Unload(ClipId(1))));
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_load_leaves_nothing_held() {
        let backend = Arc::new(RecordingAudio {
            fail_loads: true,
            ..RecordingAudio::default()
        });
        let mut playback = Playback::new(backend.clone());

        assert!(playback.play_page(&audio_page(Some("/missing.mp3"))).await.is_err());
        assert_eq!(playback.current_clip(), None);
    }
}
