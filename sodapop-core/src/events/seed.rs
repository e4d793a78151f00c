//! Built-in sample events for the mock backend.

use crate::event::{Event, Location};

#[allow(clippy::too_many_arguments)]
fn event(
    id: &str,
    title: &str,
    date: &str,
    time: &str,
    (name, address): (&str, &str),
    image_url: &str,
    description: &str,
    category: &str,
) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: Location {
            name: name.to_string(),
            address: address.to_string(),
            city: "Metropolis".to_string(),
        },
        image_url: image_url.to_string(),
        category: category.to_string(),
        coordinates: None,
    }
}

/// Five events around Metropolis, ids "1" through "5".
pub fn sample_events() -> Vec<Event> {
    vec![
        event(
            "1",
            "Saturday Morning Storytime",
            "2023-10-28",
            "10:00 AM",
            ("City Library", "123 Library Ln"),
            "https://images.unsplash.com/photo-1519331379826-f9478558d136?w=800&q=80",
            "Join us for a magical journey through stories! Perfect for kids aged 3-8.",
            "Social",
        ),
        event(
            "2",
            "Main St. Night Market",
            "2023-10-28",
            "6:00 PM",
            ("Downtown Plaza", "456 Main St"),
            "https://images.unsplash.com/photo-1533900298318-6b8da08a523e?w=800&q=80",
            "Experience local food, crafts, and live music under the stars.",
            "Food",
        ),
        event(
            "3",
            "Beginner Pottery Workshop",
            "2023-10-29",
            "2:00 PM",
            ("Local Art Studio", "789 Art Ave"),
            "https://images.unsplash.com/photo-1493106641515-6b5631de4bb9?w=800&q=80",
            "Learn the basics of wheel throwing and hand-building. All materials provided.",
            "Workshop",
        ),
        event(
            "4",
            "Community Yoga in the Park",
            "2023-10-29",
            "9:00 AM",
            ("Central Park", "101 Park Blvd"),
            "https://images.unsplash.com/photo-1544367563-12123d8965cd?w=800&q=80",
            "Relax and rejuvenate with a free community yoga session. Bring your own mat!",
            "Health",
        ),
        event(
            "5",
            "Tech Meetup: AI & Future",
            "2023-10-30",
            "7:00 PM",
            ("Innovation Hub", "202 Tech Way"),
            "https://images.unsplash.com/photo-1531482615713-2afd69097998?w=800&q=80",
            "Discuss the latest trends in Artificial Intelligence with industry experts.",
            "Tech",
        ),
    ]
}
