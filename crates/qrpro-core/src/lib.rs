pub mod codec;
pub mod error;
pub mod history;
pub mod preset;
pub mod router;
pub mod state;
pub mod store;
pub mod theme;

pub use codec::{Decoder, Encoder, RenderOptions, RenderedCode};
pub use error::{GenerateError, HistoryError, RenderError, StoreError};
pub use history::HistoryStore;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
