//! services/app/src/adapters/audio.rs
//!
//! This module contains the audio adapter. It implements the `AudioBackend` port
//! by buffering each clip's bytes in memory, from a local file or a remote URL.
//! Sound output itself belongs to the host embedding the reader; `play` hands the
//! buffered clip over and reports it.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use storyteller_core::media::AudioRef;
use storyteller_core::ports::{AudioBackend, ClipId, PortError, PortResult};
use tokio::sync::Mutex;
use tracing::{info, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

pub struct BufferedAudioBackend {
    client: Client,
    clips: Mutex<HashMap<ClipId, Vec<u8>>>,
    next_id: AtomicU64,
}

impl BufferedAudioBackend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            clips: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of clips currently held in memory.
    pub async fn loaded_clips(&self) -> usize {
        self.clips.lock().await.len()
    }

    async fn fetch(&self, source: &AudioRef) -> PortResult<Vec<u8>> {
        match source {
            AudioRef::LocalFile(path) => tokio::fs::read(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PortError::NotFound(path.clone())
                } else {
                    PortError::Unexpected(format!("Failed to read {}: {}", path, e))
                }
            }),
            AudioRef::Remote(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| PortError::Network(e.to_string()))?;
                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(PortError::NotFound(url.clone()));
                }
                if !status.is_success() {
                    return Err(PortError::Remote {
                        status: status.as_u16(),
                        body: serde_json::Value::Null,
                    });
                }
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| PortError::Network(e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

//=========================================================================================
// `AudioBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl AudioBackend for BufferedAudioBackend {
    async fn load(&self, source: &AudioRef) -> PortResult<ClipId> {
        let bytes = self.fetch(source).await?;
        let clip = ClipId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!(clip = clip.0, bytes = bytes.len(), source = %source, "Clip loaded");
        self.clips.lock().await.insert(clip, bytes);
        Ok(clip)
    }

    async fn play(&self, clip: ClipId) -> PortResult<()> {
        let clips = self.clips.lock().await;
        let bytes = clips
            .get(&clip)
            .ok_or_else(|| PortError::NotFound(format!("clip {}", clip.0)))?;
        info!(clip = clip.0, bytes = bytes.len(), "Clip handed to output");
        Ok(())
    }

    async fn unload(&self, clip: ClipId) -> PortResult<()> {
        if self.clips.lock().await.remove(&clip).is_none() {
            warn!(clip = clip.0, "Unload of a clip that was not loaded");
        }
        Ok(())
    }
}
