//! Runtime configuration.

mod firebase;
mod settings;

pub use firebase::FirebaseConfig;
pub use settings::{DataSource, Settings};
