use rada_core::{
    browser::{MapCommand, DEFAULT_CENTER, DEFAULT_ZOOM},
    geo::Coordinates,
    EventBrowser,
};
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders,
    },
    Frame,
};

/// The nominal width of the map in pixels. Padding in `MapCommand::FitBounds`
/// is relative to this.
const NOMINAL_MAP_PIXELS: f64 = 512.0;

/// Never zoom in further than this many degrees across
const MIN_SPAN: f64 = 0.001;

/// What part of the world the map is looking at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The middle of the view
    pub center: Coordinates,

    /// How many degrees (of both latitude and longitude) fit across the view
    pub span: f64,
}

impl Camera {
    /// Degrees across at a web-map zoom level, where zoom 0 shows the whole
    /// world and each level halves it.
    pub fn span_for_zoom(zoom: u8) -> f64 {
        360.0 / 2f64.powi(i32::from(zoom))
    }

    /// Move the camera the way the browser asked.
    pub fn apply(&mut self, command: MapCommand) {
        match command {
            MapCommand::FlyTo { center, zoom } => {
                self.center = center;
                self.span = Self::span_for_zoom(zoom);
            }
            MapCommand::Recenter { center } => {
                self.center = center;
            }
            MapCommand::FitBounds { bounds, padding } => {
                let extent = (bounds.north_east.lat - bounds.south_west.lat)
                    .max(bounds.north_east.lng - bounds.south_west.lng);

                let margin = 1.0 + 2.0 * f64::from(padding) / NOMINAL_MAP_PIXELS;

                self.center = bounds.center();
                self.span = (extent * margin).max(MIN_SPAN);
            }
        }
    }

    /// Longitude range on screen
    pub fn x_bounds(&self) -> [f64; 2] {
        [
            self.center.lng - self.span / 2.0,
            self.center.lng + self.span / 2.0,
        ]
    }

    /// Latitude range on screen
    pub fn y_bounds(&self) -> [f64; 2] {
        [
            self.center.lat - self.span / 2.0,
            self.center.lat + self.span / 2.0,
        ]
    }

    /// Whether a point is in view
    pub fn shows(&self, point: &Coordinates) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();

        (west..=east).contains(&point.lng) && (south..=north).contains(&point.lat)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            span: Self::span_for_zoom(DEFAULT_ZOOM),
        }
    }
}

/// Draw the events (and the user, if located) as markers on a canvas.
pub fn render(frame: &mut Frame<'_>, area: Rect, browser: &EventBrowser, camera: &Camera) {
    let tiles = browser.tiles();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Map ({tiles})"))
        .title_bottom(Line::from(tiles.attribution()).right_aligned().dark_gray());

    let selected = browser.selected();
    let user = browser.user_location();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(camera.x_bounds())
        .y_bounds(camera.y_bounds())
        .paint(move |ctx| {
            for event in browser.events() {
                let is_selected = selected == Some(event.id);
                let color = if is_selected { Color::Red } else { Color::Blue };

                ctx.draw(&Points {
                    coords: &[(event.location.lng, event.location.lat)],
                    color,
                });

                let label = if is_selected {
                    Line::from(format!("● {}", event.title)).red().bold()
                } else {
                    Line::from(format!("● {}", event.title)).blue()
                };
                ctx.print(event.location.lng, event.location.lat, label);
            }

            if let Some(user) = user {
                ctx.print(
                    user.lng,
                    user.lat,
                    Line::styled("◎ you", Style::new().fg(Color::Green)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod test {
    use super::*;
    use rada_core::{browser::FIT_PADDING, event, SavedSet};

    #[test]
    fn starts_over_nairobi() {
        let camera = Camera::default();

        assert_eq!(camera.center, DEFAULT_CENTER);
        assert!(camera.shows(&DEFAULT_CENTER));
    }

    #[test]
    fn flying_in_narrows_the_view() {
        let mut camera = Camera::default();
        let target = Coordinates::new(-1.29, 36.82);

        camera.apply(MapCommand::FlyTo {
            center: target,
            zoom: 16,
        });

        assert_eq!(camera.center, target);
        assert!(camera.span < Camera::default().span);
    }

    #[test]
    fn recenter_keeps_the_zoom() {
        let mut camera = Camera::default();
        let span = camera.span;

        camera.apply(MapCommand::Recenter {
            center: Coordinates::new(0.0, 0.0),
        });

        assert!((camera.span - span).abs() < f64::EPSILON);
        assert_eq!(camera.center, Coordinates::new(0.0, 0.0));
    }

    #[test]
    fn fitting_shows_every_event() {
        let mut camera = Camera {
            center: Coordinates::new(10.0, 10.0),
            span: 0.001,
        };
        let browser = EventBrowser::new(event::seed(), SavedSet::new());

        camera.apply(browser.fit_all_events().unwrap());

        for event in browser.events() {
            assert!(camera.shows(&event.location), "{} was off screen", event.title);
        }
    }

    #[test]
    fn fitting_one_point_keeps_a_minimum_span() {
        let mut camera = Camera::default();
        let only = Coordinates::new(-1.29, 36.82);

        camera.apply(MapCommand::FitBounds {
            bounds: rada_core::geo::Bounds::around([&only]).unwrap(),
            padding: FIT_PADDING,
        });

        assert!(camera.span >= MIN_SPAN);
    }
}
