//! crates/storyteller_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the HTTP stack, the durable storage and the audio output.

use crate::media::AudioRef;
use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The remote service rejected the credentials (401/403). Carries the body verbatim.
    #[error("Unauthorized: {0}")]
    Unauthorized(Value),
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),
    /// The remote service answered with any other non-2xx status.
    #[error("Remote service returned {status}: {body}")]
    Remote { status: u16, body: Value },
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// HTTP Transport Port
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// A single outbound call, addressed by a path relative to the service root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    /// Bearer credential for the `Authorization` header, if one should be sent.
    pub bearer: Option<String>,
}

/// The raw status and JSON body of a response.
///
/// Transports report every status here; mapping statuses onto `PortError` is
/// the core's job.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request. Only transport-level failures are errors.
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse>;

    /// The root URL requests are resolved against.
    fn base_url(&self) -> &str;
}

//=========================================================================================
// Key-Value Storage Port
//=========================================================================================

/// Durable string slots. Each call is a single atomic operation; no transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> PortResult<()>;
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

//=========================================================================================
// Audio Output Port
//=========================================================================================

/// Handle to a clip loaded by an `AudioBackend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u64);

#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Loads a clip and returns a handle to it.
    async fn load(&self, source: &AudioRef) -> PortResult<ClipId>;
    async fn play(&self, clip: ClipId) -> PortResult<()>;
    /// Releases the clip. The handle must not be used afterwards.
    async fn unload(&self, clip: ClipId) -> PortResult<()>;
}
