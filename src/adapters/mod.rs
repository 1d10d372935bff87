//! Driven adapters: storage, cache, and transport implementations of
//! the domain ports.

pub mod cache;
pub mod http;
pub mod sqlite;
