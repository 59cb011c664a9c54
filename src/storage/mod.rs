//! Persistent storage for the reference signature.

pub mod medium;
pub mod store;

// Re-export commonly used types
pub use medium::{
    FileMedium, MediumError, MemoryMedium, PersistentMedium, DEFAULT_MEDIUM_SIZE, ERASED_BYTE,
};
pub use store::{encoded_len, SignatureStore, StoreError, DEFAULT_BASE_ADDR};
