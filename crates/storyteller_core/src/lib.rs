pub mod domain;
pub mod library;
pub mod media;
pub mod onboarding;
pub mod playback;
pub mod ports;
pub mod reader;
pub mod session;

#[cfg(test)]
mod test_support;

pub use domain::{Page, ResourceId, Session, Story};
pub use library::{filter_titled, LibraryQuery, SortKey};
pub use media::{
    resolve_audio_source, resolve_cover_image_source, resolve_image_source, AudioRef, ImageRef,
};
pub use onboarding::OnboardingFlag;
pub use playback::Playback;
pub use ports::{
    ApiRequest, ApiResponse, AudioBackend, ClipId, HttpMethod, HttpTransport, KeyValueStore,
    PortError, PortResult,
};
pub use reader::{ReaderPhase, ReaderState};
pub use session::{BestEffort, SessionClient};
