//! Session persistence for MissionDesk.
//!
//! This crate provides a trait-based store for the signed-in user record
//! with a JSON file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{SessionStore, StorageError, Result};
pub use json_storage::JsonSessionStore;
pub use memory::MemorySessionStore;
