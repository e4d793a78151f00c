//! Core types for the sodapop event-discovery app.
//!
//! This crate provides everything below the presentation layer:
//! - `Event` / `UserProfile` and the rest of the data model
//! - `events`: the `EventRepository` trait and its mock, scraper and
//!   document-store backends
//! - `profile_store`: local and remote profile stores with live updates
//! - `saved` and `feed`: the view models the UI drives
//! - `app`: the composition root that wires one backend set together

pub mod analytics;
pub mod app;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod event;
pub mod events;
pub mod feed;
pub mod memory;
pub mod profile;
pub mod profile_store;
pub mod saved;
pub mod storage;
pub mod subscription;

// Re-export the data model at crate root for convenience
pub use error::{SodapopError, SodapopResult};
pub use event::*;
pub use profile::UserProfile;
