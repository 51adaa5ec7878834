use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an event. This is also what goes in the saved set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point of interest with a place on the map. Events don't expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    /// Unique among events
    pub id: EventId,

    /// What's happening
    pub title: String,

    /// How far away the event is when we don't know where the user is
    pub distance_label: String,

    /// How long until the event is over, e.g. "2 hr"
    pub time_left_label: String,

    /// Where it is
    pub location: Coordinates,

    /// URI of the cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    /// When it starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,

    /// Longer blurb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventItem {
    /// Construct an event with only the required fields set
    pub fn new(
        id: u32,
        title: impl Into<String>,
        distance_label: impl Into<String>,
        time_left_label: impl Into<String>,
        location: Coordinates,
    ) -> Self {
        Self {
            id: EventId(id),
            title: title.into(),
            distance_label: distance_label.into(),
            time_left_label: time_left_label.into(),
            location,
            cover: None,
            starts_at: None,
            description: None,
        }
    }

    /// The "0.4 km • 2 hr" line under each title, given whichever distance
    /// label applies right now.
    pub fn summary(&self, distance_label: &str) -> String {
        format!("{distance_label} • {}", self.time_left_label)
    }
}

/// The events shown on load, all around Nairobi CBD.
pub fn seed() -> Vec<EventItem> {
    vec![
        EventItem::new(
            1,
            "Street Food Pop-up",
            "0.4 km",
            "2 hr",
            Coordinates::new(-1.286_389, 36.817_223),
        ),
        EventItem::new(
            2,
            "Open Mic Night",
            "0.9 km",
            "5 hr",
            Coordinates::new(-1.283_33, 36.816_67),
        ),
        EventItem::new(
            3,
            "Tech Meetup",
            "1.2 km",
            "1 hr",
            Coordinates::new(-1.29, 36.82),
        ),
        EventItem::new(
            4,
            "Live Jazz Concert",
            "2.0 km",
            "3 hr",
            Coordinates::new(-1.295, 36.815),
        ),
        EventItem::new(
            5,
            "Pop-up Art Gallery",
            "1.8 km",
            "6 hr",
            Coordinates::new(-1.292, 36.819),
        ),
    ]
}
