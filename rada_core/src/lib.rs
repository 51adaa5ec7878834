//! The functional core of rada: every piece of page state and every
//! transition on it, with platform services injected from outside.

/// Platform services (geolocation, sharing, clipboard) as injected handles.
pub mod capability;
pub use capability::Capability;

/// Highlights and the full-screen viewer that autoplays through them.
pub mod carousel;
pub use carousel::Carousel;

/// Nearby events, the selection cursor, and how they're presented.
pub mod browser;
pub use browser::EventBrowser;

/// Nearby points of interest.
pub mod event;
pub use event::EventItem;

/// Coordinates and great-circle distances.
pub mod geo;
pub use geo::Coordinates;

/// The navigation bar at the top of the page.
pub mod header;
pub use header::HeaderBar;

/// Time-limited promotional entries.
pub mod highlight;
pub use highlight::HighlightItem;

/// Outbound URLs (sharing, directions.)
pub mod links;

/// The page-level state container.
pub mod page;
pub use page::Page;

/// The user's bookmarked events.
pub mod saved;
pub use saved::SavedSet;

/// Map tile providers.
pub mod tiles;
pub use tiles::TileStyle;
