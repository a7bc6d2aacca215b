//! In-memory fakes for the ports, shared by the unit tests.

use crate::media::AudioRef;
use crate::ports::{
    ApiRequest, ApiResponse, AudioBackend, ClipId, HttpMethod, HttpTransport, KeyValueStore,
    PortError, PortResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.slots.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> PortResult<Option<String>> {
        Err(PortError::Storage("disk unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
        Err(PortError::Storage("disk unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> PortResult<()> {
        Err(PortError::Storage("disk unavailable".to_string()))
    }
}

/// Records every request and answers from a route table. Unknown routes get `200 null`.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<HashMap<(HttpMethod, String), ApiResponse>>,
    offline: bool,
    pub requests: Mutex<Vec<ApiRequest>>,
}

impl RecordingTransport {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn respond(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), ApiResponse { status, body });
        self
    }

    pub fn last(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if self.offline {
            return Err(PortError::Network("connection refused".to_string()));
        }
        let routes = self.routes.lock().unwrap();
        Ok(routes
            .get(&(request.method, request.path.clone()))
            .cloned()
            .unwrap_or(ApiResponse {
                status: 200,
                body: Value::Null,
            }))
    }

    fn base_url(&self) -> &str {
        "http://stories.test/api"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    Load(String),
    Play(ClipId),
    Unload(ClipId),
}

/// Hands out sequential clip ids and records the call order.
#[derive(Default)]
pub struct RecordingAudio {
    pub next_id: Mutex<u64>,
    pub calls: Mutex<Vec<AudioCall>>,
    pub fail_loads: bool,
}

impl RecordingAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioBackend for RecordingAudio {
    async fn load(&self, source: &AudioRef) -> PortResult<ClipId> {
        self.calls.lock().unwrap().push(AudioCall::Load(source.uri()));
        if self.fail_loads {
            return Err(PortError::NotFound(source.uri()));
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(ClipId(*next))
    }

    async fn play(&self, clip: ClipId) -> PortResult<()> {
        self.calls.lock().unwrap().push(AudioCall::Play(clip));
        Ok(())
    }

    async fn unload(&self, clip: ClipId) -> PortResult<()> {
        self.calls.lock().unwrap().push(AudioCall::Unload(clip));
        Ok(())
    }
}
