// Adapters layer: concrete implementations for external systems (http providers, storage, cache).

pub mod cache;
pub mod http;
pub mod storage;
