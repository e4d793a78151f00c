//! Fixed values shared by every backend.

/// Placeholder used whenever an event has no image.
pub const DEFAULT_EVENT_IMAGE: &str =
    "https://images.unsplash.com/photo-1492684223066-81342ee5ff30?auto=format&fit=crop&q=80&w=1000";

/// Images offered when creating an event.
pub const DEFAULT_EVENT_IMAGES: [&str; 10] = [
    "https://images.unsplash.com/photo-1497935586351-b67a49e012bf?auto=format&fit=crop&q=80&w=800", // Coffee
    "https://images.unsplash.com/photo-1519389950473-47ba0277781c?auto=format&fit=crop&q=80&w=800", // Laptop/Work
    "https://images.unsplash.com/photo-1511632765486-a01980e01a18?auto=format&fit=crop&q=80&w=800", // Social gathering
    "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?auto=format&fit=crop&q=80&w=800", // Music
    "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?auto=format&fit=crop&q=80&w=800", // Food
    "https://images.unsplash.com/photo-1529333166437-7750a6dd5a70?auto=format&fit=crop&q=80&w=800", // Friends/Park
    "https://images.unsplash.com/photo-1543002588-bfa74002ed7e?auto=format&fit=crop&q=80&w=800", // Reading
    "https://images.unsplash.com/photo-1524368535928-5b5e00ddc76b?auto=format&fit=crop&q=80&w=800", // Concert
    "https://images.unsplash.com/photo-1554118811-1e0d58224f24?auto=format&fit=crop&q=80&w=800", // Cafe
    "https://images.unsplash.com/photo-1492684223066-81342ee5ff30?auto=format&fit=crop&q=80&w=800", // Event crowd
];

pub const DEFAULT_CATEGORY: &str = "Social";

/// Venue name used when a stored event has no location at all.
pub const UNKNOWN_VENUE: &str = "Unknown";

pub const DEFAULT_USER_ID: &str = "test-user-1";
pub const DEFAULT_USER_NAME: &str = "Soda Popper";
pub const DEFAULT_AVATAR_SEED: &str = "Soda";

// Local storage keys
pub const EVENTS_STORAGE_KEY: &str = "sodapop_events";
pub const USER_STORAGE_KEY: &str = "sodapop_user";

// Remote collections
pub const EVENTS_COLLECTION: &str = "events";
pub const USERS_COLLECTION: &str = "users";

/// Generated avatar for a profile.
pub fn avatar_url(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}")
}
