//! Property-based tests for cache and listener guarantees

mod cache_semantics;
mod listener_properties;
