//! Firestore backend for sodapop.
//!
//! Talks to Firestore and the Firebase Identity Toolkit over their REST
//! APIs. `FirestoreClient` implements the core `DocumentStore` and
//! `AnonymousAuth` traits; live document updates are emulated by polling.

pub mod auth;
mod client;
mod value;

pub use client::FirestoreClient;
