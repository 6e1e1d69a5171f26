//! Storage layer: key-value backends and the typed Session & Timer Store.

pub mod memory;
pub mod sqlite;
pub mod store;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{Loaded, SessionStore, DEFAULT_NAMESPACE};
pub use traits::KeyValueStore;
pub use types::{DistractionEvent, EventType, Mood, Session, TimerSnapshot};
