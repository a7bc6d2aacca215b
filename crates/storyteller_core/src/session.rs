//! crates/storyteller_core/src/session.rs
//!
//! The client for the remote story service. It owns the session token slot and
//! decides, per request, whether the token is attached as a bearer credential.
//!
//! Failures are logged and handed back to the caller unchanged; nothing retries.

use crate::domain::{ResourceId, Session, Story};
use crate::media::{AudioRef, ImageRef};
use crate::ports::{
    ApiRequest, ApiResponse, HttpMethod, HttpTransport, KeyValueStore, PortError, PortResult,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Key of the durable slot holding the session token.
pub const TOKEN_KEY: &str = "authToken";

/// Endpoints that bootstrap a session and therefore never carry the token.
pub const AUTH_BOOTSTRAP_ENDPOINTS: [&str; 3] = ["/User/login", "/User/signup", "/User/guest"];

/// Outcome of a write whose failure the caller is free to ignore.
///
/// The failure has already been logged when `Skipped` is returned.
#[derive(Debug)]
pub enum BestEffort<T> {
    Done(T),
    Skipped(PortError),
}

impl<T> BestEffort<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            BestEffort::Done(value) => Some(value),
            BestEffort::Skipped(_) => None,
        }
    }
}

/// Whether a request to `path` should carry the session token.
pub fn requires_token(path: &str) -> bool {
    !AUTH_BOOTSTRAP_ENDPOINTS
        .iter()
        .any(|endpoint| path.ends_with(endpoint))
}

fn into_result(path: &str, response: ApiResponse) -> PortResult<Value> {
    match response.status {
        200..=299 => Ok(response.body),
        401 | 403 => Err(PortError::Unauthorized(response.body)),
        404 => Err(PortError::NotFound(path.to_string())),
        status => Err(PortError::Remote {
            status,
            body: response.body,
        }),
    }
}

fn logged<T>(context: &str, result: PortResult<T>) -> PortResult<T> {
    if let Err(e) = &result {
        error!("{}: {}", context, e);
    }
    result
}

fn decode<T: DeserializeOwned>(body: Value) -> PortResult<T> {
    serde_json::from_value(body)
        .map_err(|e| PortError::Unexpected(format!("Malformed response body: {}", e)))
}

#[derive(Clone)]
pub struct SessionClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn KeyValueStore>,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { transport, store }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Joins a server-relative media path onto the service root.
    pub fn media_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url().trim_end_matches('/'),
            path.replace('\\', "/").trim_start_matches('/')
        )
    }

    /// Points a local-file image at the copy the service hosts under the same path.
    pub fn served_image(&self, image: ImageRef) -> ImageRef {
        match image {
            ImageRef::LocalFile(path) => ImageRef::Remote(self.media_url(&path)),
            other => other,
        }
    }

    pub fn served_audio(&self, audio: AudioRef) -> AudioRef {
        match audio {
            AudioRef::LocalFile(path) => AudioRef::Remote(self.media_url(&path)),
            other => other,
        }
    }

    /// Reads the persisted token. A failing store reads as "no token".
    pub async fn current_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Error getting token: {}", e);
                None
            }
        }
    }

    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>) -> PortResult<Value> {
        // Read at issue time; a concurrent login may replace it afterwards.
        let bearer = if requires_token(path) {
            self.current_token().await
        } else {
            None
        };
        debug!(?method, path, authenticated = bearer.is_some(), "Sending request");

        let response = self
            .transport
            .send(ApiRequest {
                method,
                path: path.to_string(),
                body,
                bearer,
            })
            .await?;
        into_result(path, response)
    }

    async fn authenticate(&self, path: &str, body: Option<Value>, context: &str) -> PortResult<Session> {
        let payload = logged(context, self.send(HttpMethod::Post, path, body).await)?;
        let token = payload
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| PortError::Unexpected("Response did not include a token".to_string()));
        let token = logged(context, token)?;

        logged(context, self.store.set(TOKEN_KEY, &token).await)?;
        info!("Session established via {}", path);
        Ok(Session { token, payload })
    }

    //=====================================================================================
    // Authentication
    //=====================================================================================

    pub async fn login(&self, email: &str, password: &str) -> PortResult<Session> {
        let body = json!({ "email": email, "password": password });
        self.authenticate("/User/login", Some(body), "Error during login")
            .await
    }

    pub async fn guest_login(&self) -> PortResult<Session> {
        self.authenticate("/User/guest", None, "Error during guest login")
            .await
    }

    /// Registers a new account. Matching the password against a confirmation is
    /// the caller's job.
    pub async fn signup(&self, email: &str, username: &str, password: &str) -> PortResult<Session> {
        let body = json!({ "email": email, "username": username, "password": password });
        self.authenticate("/User/signup", Some(body), "Error during signup")
            .await
    }

    /// Forgets the persisted token. Never fails.
    pub async fn logout(&self) {
        match self.store.remove(TOKEN_KEY).await {
            Ok(()) => info!("Session token removed"),
            Err(e) => error!("Error removing token: {}", e),
        }
    }

    //=====================================================================================
    // Profile
    //=====================================================================================

    pub async fn get_user_profile(&self) -> PortResult<Value> {
        logged(
            "Error fetching user profile",
            self.send(HttpMethod::Get, "/Profile", None).await,
        )
    }

    pub async fn update_user_profile(&self, profile: Value) -> PortResult<Value> {
        logged(
            "Error updating user profile",
            self.send(HttpMethod::Put, "/Profile", Some(profile)).await,
        )
    }

    //=====================================================================================
    // Stories
    //=====================================================================================

    /// Lists stories in summary form; pages may be missing.
    pub async fn get_stories(&self) -> PortResult<Vec<Story>> {
        let body = self.send(HttpMethod::Get, "/Story", None).await;
        logged("Error fetching stories", body.and_then(decode))
    }

    pub async fn get_story_by_id(&self, id: &ResourceId) -> PortResult<Story> {
        let body = self.send(HttpMethod::Get, &format!("/Story/{}", id.path_segment()), None).await;
        logged(&format!("Error fetching story with id {}", id), body.and_then(decode))
    }

    pub async fn create_story(&self, story: Value) -> PortResult<Value> {
        logged(
            "Error creating story",
            self.send(HttpMethod::Post, "/Story", Some(story)).await,
        )
    }

    pub async fn update_story(&self, id: &ResourceId, story: Value) -> PortResult<Value> {
        logged(
            &format!("Error updating story with id {}", id),
            self.send(HttpMethod::Put, &format!("/Story/{}", id.path_segment()), Some(story))
                .await,
        )
    }

    pub async fn delete_story(&self, id: &ResourceId) -> PortResult<Value> {
        logged(
            &format!("Error deleting story with id {}", id),
            self.send(HttpMethod::Delete, &format!("/Story/{}", id.path_segment()), None)
                .await,
        )
    }

    //=====================================================================================
    // Playlists
    //=====================================================================================

    pub async fn get_playlists(&self) -> PortResult<Value> {
        logged(
            "Error fetching playlists",
            self.send(HttpMethod::Get, "/Playlist", None).await,
        )
    }

    pub async fn create_playlist(&self, name: &str) -> PortResult<Value> {
        logged(
            "Error creating playlist",
            self.send(HttpMethod::Post, "/Playlist", Some(json!({ "name": name })))
                .await,
        )
    }

    pub async fn add_to_playlist(&self, playlist_id: &ResourceId, story_id: &ResourceId) -> PortResult<Value> {
        let path = format!("/Playlist/{}/add", playlist_id.path_segment());
        logged(
            "Error adding to playlist",
            self.send(HttpMethod::Post, &path, Some(json!({ "storyId": story_id })))
                .await,
        )
    }

    pub async fn remove_from_playlist(&self, playlist_id: &ResourceId, story_id: &ResourceId) -> PortResult<Value> {
        let path = format!(
            "/Playlist/{}/remove/{}",
            playlist_id.path_segment(),
            story_id.path_segment()
        );
        logged(
            "Error removing from playlist",
            self.send(HttpMethod::Delete, &path, None).await,
        )
    }

    //=====================================================================================
    // Favorites
    //=====================================================================================

    pub async fn get_favorites(&self) -> PortResult<Value> {
        logged(
            "Error fetching favorites",
            self.send(HttpMethod::Get, "/Favorites", None).await,
        )
    }

    pub async fn add_to_favorites(&self, story_id: &ResourceId) -> PortResult<Value> {
        logged(
            "Error adding to favorites",
            self.send(HttpMethod::Post, "/Favorites", Some(json!({ "storyId": story_id })))
                .await,
        )
    }

    pub async fn remove_from_favorites(&self, story_id: &ResourceId) -> PortResult<Value> {
        logged(
            "Error removing from favorites",
            self.send(HttpMethod::Delete, &format!("/Favorites/{}", story_id.path_segment()), None)
                .await,
        )
    }

    //=====================================================================================
    // Recently Played
    //=====================================================================================

    pub async fn get_recently_played(&self) -> PortResult<Value> {
        logged(
            "Error fetching recently played items",
            self.send(HttpMethod::Get, "/RecentlyPlayed", None).await,
        )
    }

    /// Records a play. Failures are logged and reported as `Skipped`, never raised.
    pub async fn add_to_recently_played(&self, story_id: &ResourceId) -> BestEffort<Value> {
        let body = Some(json!({ "storyId": story_id }));
        match self.send(HttpMethod::Post, "/RecentlyPlayed", body).await {
            Ok(value) => BestEffort::Done(value),
            Err(e) => {
                warn!("Error adding to recently played: {}", e);
                BestEffort::Skipped(e)
            }
        }
    }
}
