use crate::browser::{EventBrowser, Layout};
use crate::carousel::Carousel;
use crate::header::HeaderBar;
use crate::saved::SavedSet;
use crate::tiles::TileStyle;
use crate::{event, highlight};

/// Everything on the page. Each slice belongs to one component and is only
/// changed in response to that component's own events; the slices never
/// talk to each other.
#[derive(Debug, Clone)]
pub struct Page {
    /// Menu drawer, city filter, profile menu
    pub header: HeaderBar,

    /// Trending highlights and their viewer
    pub carousel: Carousel,

    /// Nearby events
    pub browser: EventBrowser,
}

impl Page {
    /// A page with the built-in highlights and events and the given
    /// bookmarks.
    pub fn seeded(saved: SavedSet, layout: Layout, tiles: TileStyle) -> Self {
        Self {
            header: HeaderBar::new(),
            carousel: Carousel::new(highlight::seed()),
            browser: EventBrowser::new(event::seed(), saved)
                .with_layout(layout)
                .with_tiles(tiles),
        }
    }
}
