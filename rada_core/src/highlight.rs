use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightId(pub u32);

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A time-boxed promotional entry with a visible countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightItem {
    /// Unique within a carousel
    pub id: HighlightId,

    /// What's happening
    pub title: String,

    /// Seconds until this highlight drops out of the carousel
    pub expires_in_seconds: u32,

    /// Which city this is in
    pub region: String,

    /// URI of the cover image
    pub cover: String,
}

impl HighlightItem {
    /// Construct a new highlight
    pub fn new(
        id: u32,
        title: impl Into<String>,
        expires_in_seconds: u32,
        region: impl Into<String>,
        cover: impl Into<String>,
    ) -> Self {
        Self {
            id: HighlightId(id),
            title: title.into(),
            expires_in_seconds,
            region: region.into(),
            cover: cover.into(),
        }
    }

    /// Whole minutes left, rounded up, so a highlight never reads "0 min"
    /// while it's still visible.
    pub fn expires_in_minutes(&self) -> u32 {
        self.expires_in_seconds.div_ceil(60)
    }

    /// The hover text shown on each bubble in the strip
    pub fn tooltip(&self) -> String {
        format!(
            "{} • expires in {} min",
            self.title,
            self.expires_in_minutes()
        )
    }

    /// Whether the countdown has run out
    pub fn is_expired(&self) -> bool {
        self.expires_in_seconds == 0
    }
}

/// The highlights shown on load. There's no feed service yet, so this is
/// the whole data set.
pub fn seed() -> Vec<HighlightItem> {
    vec![
        HighlightItem::new(1, "Street Food Pop-up", 30, "Nairobi", "/images/food.jpg"),
        HighlightItem::new(2, "Open Mic Night", 90, "Nairobi", "/images/music.jpg"),
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minutes_round_up() {
        let mut item = HighlightItem::new(1, "Test", 61, "Nairobi", "");
        assert_eq!(item.expires_in_minutes(), 2);

        item.expires_in_seconds = 60;
        assert_eq!(item.expires_in_minutes(), 1);

        item.expires_in_seconds = 1;
        assert_eq!(item.expires_in_minutes(), 1);
    }

    #[test]
    fn tooltip_includes_title_and_minutes() {
        assert_eq!(
            seed()[1].tooltip(),
            "Open Mic Night • expires in 2 min".to_string()
        );
    }

    #[test]
    fn seed_ids_are_unique() {
        let items = seed();
        let mut ids: Vec<_> = items.iter().map(|item| item.id).collect();
        ids.dedup();

        assert_eq!(ids.len(), items.len());
    }
}
