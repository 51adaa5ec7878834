/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks for
mod effect;
pub use effect::{Effect, EffectContext};

/// Drawing events on a map
mod map;

/// Things drawn over the page
mod popover;

use crate::config::LayoutPreference;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use map::Camera;
use popover::Popover;
use rada_core::{
    browser::{Layout as PageLayout, ShareOutcome},
    carousel::{Direction, Swipe},
    header::{DrawerEntry, ProfileEntry},
    saved::Toggled,
    Page, TileStyle,
};
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use std::{mem, process::ExitCode};

/// Terminals at least this wide get the desktop layout in `auto` mode
pub const DESKTOP_MIN_WIDTH: u16 = 100;

/// A mouse drag in the viewer needs to cover at least this many columns to
/// count as a swipe
const SWIPE_THRESHOLD: u16 = 5;

/// Width of each bubble in the highlight strip
const STRIP_ITEM_WIDTH: u16 = 26;

/// The "functional core" of the app.
pub struct App {
    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// Where the app is in its lifecycle
    state: AppState,

    /// The page URL shared links point at
    page_url: String,

    /// How to pick between the mobile and desktop layouts
    layout_preference: LayoutPreference,

    /// Which tiles the map starts with
    initial_tiles: TileStyle,

    /// Last known terminal width
    width: u16,
}

impl App {
    /// Create a new instance of the app
    pub fn new(page_url: String, layout_preference: LayoutPreference, tiles: TileStyle) -> Self {
        Self {
            status_line: None,
            state: AppState::Unloaded,
            page_url,
            layout_preference,
            initial_tiles: tiles,
            width: DESKTOP_MIN_WIDTH,
        }
    }

    /// The layout we should be using at the current width
    fn page_layout(&self) -> PageLayout {
        match self.layout_preference {
            LayoutPreference::Mobile => PageLayout::Mobile,
            LayoutPreference::Desktop => PageLayout::Desktop,
            LayoutPreference::Auto if self.width >= DESKTOP_MIN_WIDTH => PageLayout::Desktop,
            LayoutPreference::Auto => PageLayout::Mobile,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ]);
        let [header_area, strip_area, body_area, status_area] = vertical.areas(frame.area());

        match &self.state {
            AppState::Unloaded => {
                frame.render_widget(Paragraph::new("Loading…"), body_area);
            }
            AppState::Loaded(loaded) => {
                loaded.render_header(frame, header_area);
                loaded.render_strip(frame, strip_area);
                loaded.render_body(frame, body_area);

                if let Some(popover) = &loaded.popover {
                    popover.render(frame, body_area, &loaded.page.browser);
                }

                // the viewer covers everything but the status line
                let viewer_area = Rect::new(
                    header_area.x,
                    header_area.y,
                    header_area.width,
                    header_area.height + strip_area.height + body_area.height,
                );
                popover::render_viewer(frame, viewer_area, &loaded.page.carousel);
            }
            AppState::Exiting(_) => frame.render_widget(Paragraph::new("Exiting…"), body_area),
        }

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "All good! Press ? for help.",
        });

        frame.render_widget(status, status_area);
    }

    /// Produce any side effects as needed to initialize the app.
    #[expect(clippy::unused_self)]
    pub fn init(&self) -> Effect {
        Effect::LoadSaved
    }

    /// The open highlight viewer's session, if any. While there is one we
    /// need progress samples tagged with it.
    pub fn autoplay_session(&self) -> Option<u64> {
        match &self.state {
            AppState::Loaded(loaded) => loaded.page.carousel.session(),
            _ => None,
        }
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    #[expect(clippy::too_many_lines)]
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::LoadedSaved(saved) => {
                let count = saved.len();
                let page = Page::seeded(saved, self.page_layout(), self.initial_tiles);

                self.state = AppState::Loaded(Box::new(Loaded {
                    page,
                    focus: Focus::Events,
                    strip_cursor: 0,
                    camera: Camera::default(),
                    popover: None,
                    drag_from: None,
                    saves: 0,
                }));
                self.status_line = Some(format!("Loaded {count} saved event(s)"));

                vec![]
            }

            Action::PersistedSaved => {
                tracing::debug!("saved events persisted");

                vec![]
            }

            Action::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return vec![];
                }

                if let AppState::Loaded(loaded) = &mut self.state {
                    if loaded.page.carousel.autoplay_active() {
                        loaded.handle_viewer_key(key);
                        return vec![];
                    }

                    if loaded.popover.is_some() {
                        return self.handle_popover_key(key);
                    }
                }

                self.handle_page_key(key)
            }

            Action::Mouse(mouse) => {
                self.state.map_loaded_mut(|loaded| loaded.handle_mouse(mouse));

                vec![]
            }

            Action::Resized(width) => {
                self.width = width;
                let layout = self.page_layout();
                self.state
                    .map_loaded_mut(|loaded| loaded.page.browser.set_layout(layout));

                vec![]
            }

            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }

            Action::CountdownTick => {
                if let Some(expired) = self.state.map_loaded_mut(Loaded::tick) {
                    if !expired.is_empty() {
                        tracing::info!(?expired, "highlights expired");
                    }
                }

                vec![]
            }

            Action::ProgressSample(session) => {
                self.state.map_loaded_mut(|loaded| {
                    if loaded.page.carousel.session() == Some(session) {
                        loaded.page.carousel.sample_progress();
                    } else {
                        tracing::debug!(session, "dropping sample from a closed viewer");
                    }
                });

                vec![]
            }

            Action::Located(Ok(position)) => {
                self.state.map_loaded_mut(|loaded| {
                    let command = loaded.page.browser.set_user_location(position);
                    loaded.camera.apply(command);
                });
                self.status_line = Some(format!("Located you at {position}"));

                vec![]
            }

            Action::Located(Err(err)) => {
                tracing::warn!(?err, "could not locate");
                self.status_line = Some(err.to_string());

                vec![]
            }

            Action::Shared(Ok(ShareOutcome::Shared)) => {
                self.status_line = Some("Shared!".to_string());

                vec![]
            }

            Action::Shared(Ok(ShareOutcome::Copied(url))) => {
                self.status_line = Some(format!("Link copied: {url}"));

                vec![]
            }

            Action::Shared(Err(err)) => {
                tracing::warn!(?err, "could not share");
                self.status_line = Some(err.to_string());

                vec![]
            }

            Action::OpenedUrl(url) => {
                tracing::debug!(%url, "opened url");
                self.status_line = Some("Opened directions in your browser".to_string());

                vec![]
            }
        }
    }

    /// Keys while a popover is showing
    fn handle_popover_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let AppState::Loaded(loaded) = &mut self.state else {
            return vec![];
        };
        let Some(popover) = loaded.popover else {
            return vec![];
        };

        match (popover, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q')) => {
                loaded.close_popover();
                vec![]
            }

            (Popover::Help, _) => vec![],

            (Popover::Drawer(cursor), KeyCode::Char('j') | KeyCode::Down) => {
                let last = DrawerEntry::ALL.len() - 1;
                loaded.popover = Some(Popover::Drawer((cursor + 1).min(last)));
                vec![]
            }
            (Popover::Drawer(cursor), KeyCode::Char('k') | KeyCode::Up) => {
                loaded.popover = Some(Popover::Drawer(cursor.saturating_sub(1)));
                vec![]
            }
            (Popover::Drawer(cursor), KeyCode::Enter) => {
                let entry = loaded
                    .page
                    .header
                    .choose_drawer_entry(DrawerEntry::ALL[cursor]);
                loaded.popover = None;

                match entry {
                    DrawerEntry::Home => {}
                    DrawerEntry::Highlights => loaded.focus = Focus::Highlights,
                    DrawerEntry::Map => {
                        loaded.focus = Focus::Events;
                        if !loaded.page.browser.map_visible() {
                            loaded.page.browser.toggle_display();
                        }
                    }
                    DrawerEntry::Profile => {
                        self.status_line = Some("Profiles aren't available yet".to_string());
                    }
                }
                vec![]
            }

            (Popover::Profile(cursor), KeyCode::Char('j') | KeyCode::Down) => {
                let last = ProfileEntry::ALL.len() - 1;
                loaded.popover = Some(Popover::Profile((cursor + 1).min(last)));
                vec![]
            }
            (Popover::Profile(cursor), KeyCode::Char('k') | KeyCode::Up) => {
                loaded.popover = Some(Popover::Profile(cursor.saturating_sub(1)));
                vec![]
            }
            (Popover::Profile(cursor), KeyCode::Enter) => {
                let entry = loaded
                    .page
                    .header
                    .choose_profile_entry(ProfileEntry::ALL[cursor]);
                loaded.popover = None;
                self.status_line = Some(format!("{} isn't available yet", entry.label()));
                vec![]
            }

            (Popover::EventDetail(_), KeyCode::Char('s' | 'x' | 'd')) => {
                let effects = loaded.event_action(key.code, &self.page_url);
                self.report(effects)
            }

            _ => vec![],
        }
    }

    /// Keys on the page itself
    #[expect(clippy::too_many_lines)]
    fn handle_page_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('q') {
            let pre_quit_state =
                mem::replace(&mut self.state, AppState::Exiting(ExitCode::SUCCESS));

            return match pre_quit_state {
                AppState::Loaded(mut loaded) => vec![loaded.persist_saved()],
                _ => vec![],
            };
        }

        let AppState::Loaded(loaded) = &mut self.state else {
            return vec![];
        };

        match key.code {
            KeyCode::Char('?') | KeyCode::F(1) => {
                loaded.popover = Some(Popover::Help);
                vec![]
            }

            KeyCode::Tab | KeyCode::BackTab => {
                loaded.focus = match loaded.focus {
                    Focus::Highlights => Focus::Events,
                    Focus::Events => Focus::Highlights,
                };
                vec![]
            }

            KeyCode::Char('M') => {
                loaded.page.header.toggle_drawer();
                loaded.popover = loaded.page.header.drawer_open().then_some(Popover::Drawer(0));
                vec![]
            }

            KeyCode::Char('u') => {
                loaded.page.header.toggle_profile_menu();
                loaded.popover = loaded
                    .page
                    .header
                    .profile_menu_open()
                    .then_some(Popover::Profile(0));
                vec![]
            }

            KeyCode::Char('c') => {
                let city = loaded.page.header.cycle_city();
                self.status_line = Some(format!("Showing {city}"));
                vec![]
            }

            KeyCode::Char('h') | KeyCode::Left if loaded.focus == Focus::Highlights => {
                loaded.strip_cursor = loaded.strip_cursor.saturating_sub(1);
                vec![]
            }

            KeyCode::Char('l') | KeyCode::Right if loaded.focus == Focus::Highlights => {
                let last = loaded.page.carousel.items().len().saturating_sub(1);
                loaded.strip_cursor = (loaded.strip_cursor + 1).min(last);
                vec![]
            }

            KeyCode::Enter if loaded.focus == Focus::Highlights => {
                if let Err(err) = loaded.page.carousel.open(loaded.strip_cursor) {
                    tracing::debug!(?err, "nothing to open");
                    self.status_line = Some("No highlights yet".to_string());
                }
                vec![]
            }

            KeyCode::Char('j') | KeyCode::Down => {
                let command = loaded.page.browser.select_next();
                loaded.apply_map(command);
                vec![]
            }

            KeyCode::Char('k') | KeyCode::Up => {
                let command = loaded.page.browser.select_previous();
                loaded.apply_map(command);
                vec![]
            }

            KeyCode::Enter => {
                loaded.popover = loaded.page.browser.selected().map(Popover::EventDetail);
                vec![]
            }

            KeyCode::Char('s' | 'x' | 'd') => {
                let effects = loaded.event_action(key.code, &self.page_url);
                self.report(effects)
            }

            KeyCode::Char('g') => vec![Effect::Locate],

            KeyCode::Char('f') => {
                let command = loaded.page.browser.fit_all_events();
                loaded.apply_map(command);
                vec![]
            }

            KeyCode::Char('v') => {
                loaded.page.browser.toggle_display();
                vec![]
            }

            KeyCode::Char('t') => {
                let tiles = loaded.page.browser.cycle_tiles();
                self.status_line = Some(format!("Tiles: {}", tiles.url_template()));
                vec![]
            }

            _ => {
                self.status_line = Some(format!("Unknown key {:?}", key.code));
                vec![]
            }
        }
    }

    /// Show the status message from an event action (if any) and pass its
    /// effects along
    fn report(&mut self, (status, effects): (Option<String>, Vec<Effect>)) -> Vec<Effect> {
        if status.is_some() {
            self.status_line = status;
        }

        effects
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        if let AppState::Exiting(code) = &self.state {
            Some(*code)
        } else {
            None
        }
    }
}

/// Which part of the page keyboard navigation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    /// The highlight strip
    Highlights,

    /// The event list
    Events,
}

/// App lifecycle
#[derive(Debug)]
enum AppState {
    /// We haven't loaded saved events yet
    Unloaded,

    /// Saved events are loaded and the page is live
    Loaded(Box<Loaded>),

    /// We're done and want the following exit code after final effects
    Exiting(ExitCode),
}

impl AppState {
    /// Do something to the inner loaded state, if the app is indeed in that state.
    fn map_loaded_mut<T>(&mut self, edit: impl FnOnce(&mut Loaded) -> T) -> Option<T> {
        if let Self::Loaded(loaded) = self {
            Some(edit(loaded))
        } else {
            None
        }
    }
}

/// State when we have loaded and are running
#[derive(Debug)]
struct Loaded {
    /// Everything on the page
    page: Page,

    /// Where keyboard navigation goes
    focus: Focus,

    /// Which bubble in the highlight strip has focus
    strip_cursor: usize,

    /// Where the map is looking
    camera: Camera,

    /// What's drawn over the page, if anything
    popover: Option<Popover>,

    /// Column a mouse drag started at, for swipes in the viewer
    drag_from: Option<u16>,

    /// How many times we've asked to persist the saved set
    saves: u64,
}

impl Loaded {
    /// Ask for the current saved set to be written, newer than any before it
    fn persist_saved(&mut self) -> Effect {
        self.saves += 1;

        Effect::PersistSaved {
            saved: self.page.browser.saved().clone(),
            generation: self.saves,
        }
    }

    /// A second passed
    fn tick(&mut self) -> Vec<rada_core::highlight::HighlightId> {
        let expired = self.page.carousel.tick();

        let last = self.page.carousel.items().len().saturating_sub(1);
        self.strip_cursor = self.strip_cursor.min(last);

        expired
    }

    fn apply_map(&mut self, command: Option<rada_core::browser::MapCommand>) {
        if let Some(command) = command {
            self.camera.apply(command);
        }
    }

    fn close_popover(&mut self) {
        match self.popover.take() {
            Some(Popover::Drawer(_)) => self.page.header.close_drawer(),
            Some(Popover::Profile(_)) => self.page.header.toggle_profile_menu(),
            _ => {}
        }
    }

    /// Keys while the highlight viewer is open
    fn handle_viewer_key(&mut self, key: KeyEvent) {
        let carousel = &mut self.page.carousel;

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => carousel.advance(Direction::Previous),
            KeyCode::Right | KeyCode::Char('l' | ' ') => {
                carousel.advance(Direction::Next);
            }
            KeyCode::Esc | KeyCode::Char('q') => carousel.close(),
            _ => {}
        }

        if let Some(index) = self.current_highlight_index() {
            self.strip_cursor = index;
        }
    }

    fn current_highlight_index(&self) -> Option<usize> {
        match self.page.carousel.viewer() {
            rada_core::carousel::Viewer::Open { index, .. } => Some(index),
            rada_core::carousel::Viewer::Closed => None,
        }
    }

    /// Treat a horizontal mouse drag in the viewer as a swipe
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.page.carousel.autoplay_active() {
            self.drag_from = None;
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_from = Some(mouse.column),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(from) = self.drag_from.take() {
                    if mouse.column.saturating_add(SWIPE_THRESHOLD) <= from {
                        self.page.carousel.swipe(Swipe::Left);
                    } else if from.saturating_add(SWIPE_THRESHOLD) <= mouse.column {
                        self.page.carousel.swipe(Swipe::Right);
                    }
                }
            }
            _ => {}
        }
    }

    /// Save, share, or get directions for the selected event. Returns a
    /// status message and effects to run.
    fn event_action(&mut self, code: KeyCode, page_url: &str) -> (Option<String>, Vec<Effect>) {
        let Some(event) = self.page.browser.selected_event().cloned() else {
            return (Some("Select an event first".to_string()), vec![]);
        };

        match code {
            KeyCode::Char('s') => {
                let status = match self.page.browser.toggle_saved(event.id) {
                    Toggled::Saved => format!("Saved {}", event.title),
                    Toggled::Removed => format!("Removed {}", event.title),
                };

                (Some(status), vec![self.persist_saved()])
            }
            KeyCode::Char('x') => match self.page.browser.share_request(&event, page_url) {
                Ok(request) => (None, vec![Effect::Share(request)]),
                Err(err) => (Some(err.to_string()), vec![]),
            },
            KeyCode::Char('d') => match self.page.browser.directions_url(&event) {
                Ok(url) => (None, vec![Effect::OpenUrl(url)]),
                Err(err) => (Some(format!("Couldn't build directions: {err}")), vec![]),
            },
            _ => (None, vec![]),
        }
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let header = &self.page.header;

        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("☰ "),
                Span::raw("Rada").bold(),
                Span::raw(format!("  [{} ▾]", header.city())).dark_gray(),
            ])),
            left,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(" Post Event ").black().on_blue(),
                Span::raw("  ◉ profile"),
            ]))
            .right_aligned(),
            right,
        );
    }

    fn render_strip(&self, frame: &mut Frame<'_>, area: Rect) {
        let items = self.page.carousel.items();
        let mobile = self.page.browser.layout() == PageLayout::Mobile;

        // sticky bar on mobile, a titled card on desktop
        let mut block = if mobile {
            Block::default().borders(Borders::BOTTOM)
        } else {
            Block::default()
                .borders(Borders::ALL)
                .title("🔥 Highlights (Trending Soon)")
        };

        if self.focus == Focus::Highlights {
            if let Some(item) = items.get(self.strip_cursor) {
                block = block.title_bottom(Line::from(item.tooltip()).dark_gray());
            }
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No highlights yet").dark_gray().centered(),
                inner,
            );
            return;
        }

        let fits = usize::from((inner.width / STRIP_ITEM_WIDTH).max(1));
        let first = self.strip_cursor.saturating_sub(fits - 1);

        let cells = Layout::horizontal(
            items
                .iter()
                .skip(first)
                .take(fits)
                .map(|_| Constraint::Length(STRIP_ITEM_WIDTH)),
        )
        .flex(Flex::Start)
        .split(inner);

        for ((index, item), cell) in items.iter().enumerate().skip(first).zip(cells.iter()) {
            let focused = self.focus == Focus::Highlights && index == self.strip_cursor;
            let border = if focused {
                Style::new().red().bold()
            } else {
                Style::new().red()
            };

            let bubble = Paragraph::new(vec![
                Line::from(item.title.clone()).centered(),
                Line::from(format!("{} min", item.expires_in_minutes()))
                    .dark_gray()
                    .centered(),
            ])
            .block(Block::default().borders(Borders::ALL).border_style(border));

            frame.render_widget(bubble, *cell);
        }
    }

    fn render_body(&self, frame: &mut Frame<'_>, area: Rect) {
        let browser = &self.page.browser;

        match (browser.list_visible(), browser.map_visible()) {
            (true, true) => {
                let [list_area, map_area] =
                    Layout::horizontal([Constraint::Percentage(34), Constraint::Fill(1)])
                        .areas(area);
                self.render_list(frame, list_area);
                map::render(frame, map_area, browser, &self.camera);
            }
            (false, true) => map::render(frame, area, browser, &self.camera),
            _ => self.render_list(frame, area),
        }
    }

    fn render_list(&self, frame: &mut Frame<'_>, area: Rect) {
        let browser = &self.page.browser;

        let rows: Vec<Row> = browser
            .events()
            .iter()
            .map(|event| {
                Row::new(vec![
                    if browser.is_saved(event.id) {
                        Cell::new("★").yellow()
                    } else {
                        Cell::new(" ")
                    },
                    Cell::new(event.title.clone()),
                    Cell::new(event.summary(&browser.distance_label(event))).dark_gray(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(1), Constraint::Fill(2), Constraint::Fill(1)],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Events nearby")
                .border_style(if self.focus == Focus::Events {
                    Style::new().blue()
                } else {
                    Style::new()
                }),
        )
        .column_spacing(1)
        .highlight_symbol("● ")
        .row_highlight_style(Style::new().add_modifier(Modifier::BOLD));

        let mut state = TableState::new().with_selected(browser.selected_index());
        frame.render_stateful_widget(table, area, &mut state);
    }
}
