pub mod audio;
pub mod http;
pub mod store;

pub use audio::BufferedAudioBackend;
pub use http::ReqwestTransport;
pub use store::{JsonFileStore, MemoryStore};
