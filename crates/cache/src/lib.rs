#![warn(clippy::unwrap_used)]

pub mod jsonl;
pub mod manager;
pub mod store;
pub mod volatile;

pub use jsonl::JsonlStore;
pub use manager::TieredCache;
pub use store::{AnalysisStore, DocumentMetadata, MemoryStore, StoreFilter, StoredDocument};
pub use volatile::SessionCache;
