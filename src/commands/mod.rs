pub mod feed;
pub mod new;
pub mod profile;
pub mod saved;
pub mod show;
pub mod swipe;
