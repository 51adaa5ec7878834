use crate::capability::{
    Capability, Clipboard, Geolocate, LocateError, Share, ShareError, SharePayload,
};
use crate::event::{EventId, EventItem};
use crate::geo::{self, Bounds, Coordinates};
use crate::links;
use crate::saved::{SavedSet, Toggled};
use crate::tiles::TileStyle;
use url::Url;

/// Zoom level the map flies to when an event is selected
pub const FLY_TO_ZOOM: u8 = 16;

/// Padding (in pixels) kept around the events when fitting them all on the
/// map
pub const FIT_PADDING: u16 = 50;

/// Where the map starts: Nairobi CBD
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: -1.286_389,
    lng: 36.817_223,
};

/// Zoom level the map starts at
pub const DEFAULT_ZOOM: u8 = 14;

/// How much room we have to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Narrow: one pane at a time, switched by the user
    #[default]
    Mobile,

    /// Wide: the list and the map side by side
    Desktop,
}

/// What's on screen in the mobile layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// The list of events
    #[default]
    ShowingList,

    /// The map of events
    ShowingMap,
}

/// Requests for the map to move. The map is drawn by the shell; these tell it
/// where to look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapCommand {
    /// Animate over to a point and zoom in
    FlyTo {
        /// Where to go
        center: Coordinates,

        /// How far in
        zoom: u8,
    },

    /// Jump to a point, keeping the zoom level
    Recenter {
        /// Where to go
        center: Coordinates,
    },

    /// Show all of `bounds`, leaving `padding` pixels around the edge
    FitBounds {
        /// What must be visible
        bounds: Bounds,

        /// Margin, in pixels
        padding: u16,
    },
}

/// How a share went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The native share sheet took it
    Shared,

    /// There was no share sheet, so we put the link on the clipboard
    Copied(Url),
}

/// A share that's ready to hand to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    payload: SharePayload,
    url: Url,
}

impl ShareRequest {
    /// The link being shared
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// What the share sheet gets
    pub fn payload(&self) -> &SharePayload {
        &self.payload
    }

    /// Hand off to the native share sheet, or the clipboard if there isn't
    /// one.
    ///
    /// ## Errors
    ///
    /// - `ShareError::Unavailable` if there's neither a share sheet nor a
    ///   clipboard
    /// - `ShareError::Cancelled` if the user backed out of the share sheet
    /// - `ShareError::Failed` if the platform failed
    pub fn perform<S: Share, C: Clipboard>(
        self,
        share: &Capability<S>,
        clipboard: &Capability<C>,
    ) -> Result<ShareOutcome, ShareError> {
        match (share, clipboard) {
            (Capability::Available(share), _) => {
                share.share(&self.payload)?;

                Ok(ShareOutcome::Shared)
            }
            (Capability::Unavailable, Capability::Available(clipboard)) => {
                clipboard.copy(self.url.as_str())?;

                Ok(ShareOutcome::Copied(self.url))
            }
            (Capability::Unavailable, Capability::Unavailable) => Err(ShareError::Unavailable),
        }
    }
}

/// A selectable list of nearby events, shown as a list and/or a map.
#[derive(Debug, Clone)]
pub struct EventBrowser {
    events: Vec<EventItem>,
    selected: Option<EventId>,
    saved: SavedSet,
    user_location: Option<Coordinates>,
    layout: Layout,
    display: DisplayMode,
    tiles: TileStyle,
}

impl EventBrowser {
    /// Browse the given events, with nothing selected and no user location.
    pub fn new(events: Vec<EventItem>, saved: SavedSet) -> Self {
        Self {
            events,
            selected: None,
            saved,
            user_location: None,
            layout: Layout::default(),
            display: DisplayMode::default(),
            tiles: TileStyle::default(),
        }
    }

    /// Builder-style: use a specific layout
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder-style: use a specific tile style
    #[must_use]
    pub fn with_tiles(mut self, tiles: TileStyle) -> Self {
        self.tiles = tiles;
        self
    }

    /// All events, in display order
    pub fn events(&self) -> &[EventItem] {
        &self.events
    }

    /// Look up an event
    pub fn event(&self, id: EventId) -> Option<&EventItem> {
        self.events.iter().find(|event| event.id == id)
    }

    /// The selected event's ID, if any
    pub fn selected(&self) -> Option<EventId> {
        self.selected
    }

    /// The selected event, if any
    pub fn selected_event(&self) -> Option<&EventItem> {
        self.selected.and_then(|id| self.event(id))
    }

    /// The user's bookmarks
    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    /// Where the user is, if they've told us
    pub fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    /// Current layout
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Switch layouts (e.g. when the screen is resized)
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// What's showing in the mobile layout
    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    /// Is the map on screen? Always in the desktop layout; on mobile, only
    /// when the user switched to it.
    pub fn map_visible(&self) -> bool {
        match self.layout {
            Layout::Desktop => true,
            Layout::Mobile => self.display == DisplayMode::ShowingMap,
        }
    }

    /// Is the list on screen?
    pub fn list_visible(&self) -> bool {
        match self.layout {
            Layout::Desktop => true,
            Layout::Mobile => self.display == DisplayMode::ShowingList,
        }
    }

    /// Swap between list and map. Only meaningful on mobile, but harmless
    /// elsewhere.
    pub fn toggle_display(&mut self) -> DisplayMode {
        self.display = match self.display {
            DisplayMode::ShowingList => DisplayMode::ShowingMap,
            DisplayMode::ShowingMap => DisplayMode::ShowingList,
        };
        self.display
    }

    /// The active tile style
    pub fn tiles(&self) -> TileStyle {
        self.tiles
    }

    /// Move to the next tile style
    pub fn cycle_tiles(&mut self) -> TileStyle {
        self.tiles = self.tiles.next();
        self.tiles
    }

    /// Select an event and ask the map to fly over to it. Unknown IDs leave
    /// the selection alone and return `None`.
    pub fn select_event(&mut self, id: EventId) -> Option<MapCommand> {
        let center = self.event(id)?.location;
        self.selected = Some(id);

        Some(MapCommand::FlyTo {
            center,
            zoom: FLY_TO_ZOOM,
        })
    }

    /// Select the event below the current one (or the first, if nothing is
    /// selected.) Stops at the bottom.
    pub fn select_next(&mut self) -> Option<MapCommand> {
        let next = match self.selected_index() {
            Some(index) => (index + 1).min(self.events.len().saturating_sub(1)),
            None => 0,
        };

        let id = self.events.get(next)?.id;
        self.select_event(id)
    }

    /// Select the event above the current one. Stops at the top.
    pub fn select_previous(&mut self) -> Option<MapCommand> {
        let previous = self.selected_index().map_or(0, |index| index.saturating_sub(1));

        let id = self.events.get(previous)?.id;
        self.select_event(id)
    }

    /// Where the selection is in `events()`
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .and_then(|id| self.events.iter().position(|event| event.id == id))
    }

    /// Save or unsave an event. The caller is responsible for persisting
    /// `saved()` afterwards.
    pub fn toggle_saved(&mut self, id: EventId) -> Toggled {
        let toggled = self.saved.toggle(id);
        tracing::debug!(%id, ?toggled, "toggled saved event");

        toggled
    }

    /// Is this event bookmarked?
    pub fn is_saved(&self, id: EventId) -> bool {
        self.saved.contains(id)
    }

    /// Ask the platform where the user is, once. On success the map
    /// recenters on them and distances are recomputed from there.
    ///
    /// ## Errors
    ///
    /// `LocateError::Unavailable` if the platform can't locate at all,
    /// otherwise whatever the platform reported. The user location is left
    /// as it was.
    pub fn locate<G: Geolocate>(
        &mut self,
        geolocation: &Capability<G>,
    ) -> Result<MapCommand, LocateError> {
        let position = geolocation.current_position()?;

        Ok(self.set_user_location(position))
    }

    /// Record where the user is (for example, after an asynchronous locate
    /// finished) and recenter on them.
    pub fn set_user_location(&mut self, position: Coordinates) -> MapCommand {
        self.user_location = Some(position);

        MapCommand::Recenter { center: position }
    }

    /// How far away an event is. Computed from the user's location when we
    /// have it; otherwise, the event's own label.
    pub fn distance_label(&self, event: &EventItem) -> String {
        match self.user_location {
            Some(user) => geo::format_distance(user.distance_km(&event.location)),
            None => event.distance_label.clone(),
        }
    }

    /// Ask the map to show every event. `None` if there aren't any.
    pub fn fit_all_events(&self) -> Option<MapCommand> {
        Bounds::around(self.events.iter().map(|event| &event.location)).map(|bounds| {
            MapCommand::FitBounds {
                bounds,
                padding: FIT_PADDING,
            }
        })
    }

    /// Prepare to share an event: work out the link and what the share
    /// sheet would say. Nothing touches the platform until `perform`.
    ///
    /// ## Errors
    ///
    /// `ShareError::Failed` if `page_url` isn't a usable URL.
    pub fn share_request(
        &self,
        event: &EventItem,
        page_url: &str,
    ) -> Result<ShareRequest, ShareError> {
        let url = links::share_url(page_url, event.id)
            .map_err(|err| ShareError::Failed(err.to_string()))?;

        Ok(ShareRequest {
            payload: SharePayload {
                title: event.title.clone(),
                text: event.summary(&self.distance_label(event)),
                url: url.to_string(),
            },
            url,
        })
    }

    /// Share an event: with the native share sheet if there is one, or by
    /// copying its link to the clipboard if not.
    ///
    /// ## Errors
    ///
    /// See `share_request` and `ShareRequest::perform`.
    pub fn share_event<S: Share, C: Clipboard>(
        &self,
        event: &EventItem,
        page_url: &str,
        share: &Capability<S>,
        clipboard: &Capability<C>,
    ) -> Result<ShareOutcome, ShareError> {
        self.share_request(event, page_url)?
            .perform(share, clipboard)
    }

    /// Walking directions to an event, starting from the user if we know
    /// where they are.
    ///
    /// ## Errors
    ///
    /// See `links::directions_url`.
    pub fn directions_url(&self, event: &EventItem) -> Result<Url, url::ParseError> {
        links::directions_url(event, self.user_location)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::capability::{FixedPosition, NoShare};
    use std::cell::RefCell;

    fn browser() -> EventBrowser {
        EventBrowser::new(crate::event::seed(), SavedSet::new())
    }

    #[derive(Default)]
    struct FakeClipboard(RefCell<Vec<String>>);

    impl Clipboard for FakeClipboard {
        fn copy(&self, text: &str) -> Result<(), ShareError> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeShare(RefCell<Vec<SharePayload>>);

    impl Share for FakeShare {
        fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
            self.0.borrow_mut().push(payload.clone());
            Ok(())
        }
    }

    struct Refuses;

    impl Geolocate for Refuses {
        fn current_position(&self) -> Result<Coordinates, LocateError> {
            Err(LocateError::Denied)
        }
    }

    #[test]
    fn selecting_flies_the_map_to_the_event() {
        let mut browser = browser();

        assert_eq!(
            browser.select_event(EventId(3)),
            Some(MapCommand::FlyTo {
                center: Coordinates::new(-1.29, 36.82),
                zoom: FLY_TO_ZOOM,
            })
        );
        assert_eq!(browser.selected(), Some(EventId(3)));
    }

    #[test]
    fn selecting_an_unknown_event_does_nothing() {
        let mut browser = browser();
        browser.select_event(EventId(1));

        assert_eq!(browser.select_event(EventId(99)), None);
        assert_eq!(browser.selected(), Some(EventId(1)));
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut browser = browser();

        browser.select_previous();
        assert_eq!(browser.selected(), Some(EventId(1)));

        for _ in 0..10 {
            browser.select_next();
        }
        assert_eq!(browser.selected(), Some(EventId(5)));
    }

    #[test]
    fn toggling_saved_twice_is_a_no_op() {
        let mut browser = browser();

        assert_eq!(browser.toggle_saved(EventId(5)), Toggled::Saved);
        assert!(browser.is_saved(EventId(5)));

        assert_eq!(browser.toggle_saved(EventId(5)), Toggled::Removed);
        assert!(browser.saved().is_empty());
    }

    #[test]
    fn distance_falls_back_to_the_static_label() {
        let browser = browser();
        let event = &browser.events()[1];

        assert_eq!(browser.distance_label(event), "0.9 km");
    }

    #[test]
    fn locate_computes_distances_from_the_user() {
        let mut browser = browser();

        let command = browser
            .locate(&Capability::Available(FixedPosition(DEFAULT_CENTER)))
            .unwrap();

        assert_eq!(
            command,
            MapCommand::Recenter {
                center: DEFAULT_CENTER
            }
        );
        assert_eq!(browser.distance_label(&browser.events()[0]), "0 m");
        assert_eq!(browser.distance_label(&browser.events()[1]), "346 m");
        assert_eq!(browser.distance_label(&browser.events()[3]), "989 m");

        browser.set_user_location(Coordinates::new(-1.27, 36.80));
        assert_eq!(browser.distance_label(&browser.events()[3]), "3.2 km");
    }

    #[test]
    fn locate_without_geolocation_leaves_location_unset() {
        let mut browser = browser();

        assert_eq!(
            browser.locate(&Capability::<FixedPosition>::Unavailable),
            Err(LocateError::Unavailable)
        );
        assert_eq!(browser.user_location(), None);
    }

    #[test]
    fn locate_when_denied_leaves_location_unset() {
        let mut browser = browser();

        assert_eq!(
            browser.locate(&Capability::Available(Refuses)),
            Err(LocateError::Denied)
        );
        assert_eq!(browser.user_location(), None);
    }

    #[test]
    fn fits_every_event() {
        let browser = browser();

        let Some(MapCommand::FitBounds { bounds, padding }) = browser.fit_all_events() else {
            panic!("expected to fit bounds");
        };

        assert_eq!(padding, FIT_PADDING);
        for event in browser.events() {
            assert!(bounds.contains(&event.location));
        }
    }

    #[test]
    fn nothing_to_fit_without_events() {
        let browser = EventBrowser::new(vec![], SavedSet::new());

        assert_eq!(browser.fit_all_events(), None);
    }

    #[test]
    fn share_prefers_the_native_sheet() {
        let browser = browser();
        let share = FakeShare::default();
        let clipboard = FakeClipboard::default();

        let outcome = browser
            .share_event(
                &browser.events()[0],
                "https://rada.app/",
                &Capability::Available(&share),
                &Capability::Available(&clipboard),
            )
            .unwrap();

        assert_eq!(outcome, ShareOutcome::Shared);
        assert_eq!(
            share.0.borrow().clone(),
            vec![SharePayload {
                title: "Street Food Pop-up".to_string(),
                text: "0.4 km • 2 hr".to_string(),
                url: "https://rada.app/#event-1".to_string(),
            }]
        );
        assert!(clipboard.0.borrow().is_empty());
    }

    #[test]
    fn share_falls_back_to_the_clipboard() {
        let browser = browser();
        let clipboard = FakeClipboard::default();

        let outcome = browser
            .share_event(
                &browser.events()[1],
                "https://rada.app/",
                &Capability::<NoShare>::Unavailable,
                &Capability::Available(&clipboard),
            )
            .unwrap();

        assert!(matches!(
            outcome,
            ShareOutcome::Copied(url) if url.as_str() == "https://rada.app/#event-2"
        ));
        assert_eq!(
            clipboard.0.borrow().clone(),
            vec!["https://rada.app/#event-2".to_string()]
        );
    }

    #[test]
    fn share_with_nothing_available_is_an_error() {
        let browser = browser();

        assert_eq!(
            browser.share_event(
                &browser.events()[0],
                "https://rada.app/",
                &Capability::<NoShare>::Unavailable,
                &Capability::<FakeClipboard>::Unavailable,
            ),
            Err(ShareError::Unavailable)
        );
    }

    #[test]
    fn map_visibility_depends_on_layout() {
        let mut browser = browser();
        assert!(browser.list_visible());
        assert!(!browser.map_visible());

        browser.toggle_display();
        assert!(!browser.list_visible());
        assert!(browser.map_visible());

        browser.set_layout(Layout::Desktop);
        assert!(browser.list_visible());
        assert!(browser.map_visible());
    }

    #[test]
    fn directions_start_from_the_user_once_located() {
        let mut browser = browser();
        let event = browser.events()[2].clone();

        assert!(!browser.directions_url(&event).unwrap().as_str().contains("origin"));

        browser.set_user_location(DEFAULT_CENTER);
        assert!(browser.directions_url(&event).unwrap().as_str().contains("origin="));
    }
}
