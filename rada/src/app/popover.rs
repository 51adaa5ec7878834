use chrono::Local;
use rada_core::{
    carousel::AUTOPLAY_DURATION,
    event::EventId,
    header::{DrawerEntry, ProfileEntry},
    Carousel, EventBrowser,
};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListState, Padding, Paragraph, Row, Table, Wrap},
    Frame,
};

/// States shown above the main page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popover {
    /// Show a table of keyboard shortcuts
    Help,

    /// The side drawer, with the cursor on an entry
    Drawer(usize),

    /// The profile dropdown, with the cursor on an entry
    Profile(usize),

    /// Details and actions for one event
    EventDetail(EventId),
}

/// Center a box of the given size in `area`
fn centered(area: Rect, width: Constraint, height: Constraint) -> Rect {
    let [area] = Layout::vertical([height]).flex(Flex::Center).areas(area);
    let [area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    area
}

impl Popover {
    /// Render the popover over `body_area`
    pub fn render(&self, frame: &mut Frame<'_>, body_area: Rect, browser: &EventBrowser) {
        match self {
            Popover::Help => {
                let popup_area =
                    centered(body_area, Constraint::Percentage(60), Constraint::Length(22));

                let popup = Table::new(
                    [
                        Row::new(vec!["? / F1", "Display this help"]),
                        Row::new(vec!["tab", "Switch between highlights and events"]),
                        Row::new(vec!["h / l", "Move along the highlights"]),
                        Row::new(vec!["j / k", "Select event below / above"]),
                        Row::new(vec!["enter", "View highlight / event details"]),
                        Row::new(vec!["s", "Save or unsave the selected event"]),
                        Row::new(vec!["x", "Share the selected event"]),
                        Row::new(vec!["d", "Walking directions to the selected event"]),
                        Row::new(vec!["g", "Locate me"]),
                        Row::new(vec!["f", "Fit all events on the map"]),
                        Row::new(vec!["v", "Switch between list and map"]),
                        Row::new(vec!["t", "Change map tiles"]),
                        Row::new(vec!["M", "Open the menu drawer"]),
                        Row::new(vec!["c", "Change city"]),
                        Row::new(vec!["u", "Profile menu"]),
                        Row::new(vec!["← / → (viewer)", "Previous / next highlight"]),
                        Row::new(vec!["drag (viewer)", "Swipe"]),
                        Row::new(vec!["esc (viewer)", "Close"]),
                        Row::new(vec!["q", "Quit / Close popover"]),
                    ],
                    [Constraint::Max(16), Constraint::Fill(1)],
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Keyboard Shortcuts")
                        .padding(Padding::horizontal(1))
                        .border_style(Style::new().blue()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }

            Popover::Drawer(cursor) => {
                let [drawer_area, _] =
                    Layout::horizontal([Constraint::Length(24), Constraint::Fill(1)])
                        .areas(body_area);

                render_menu(
                    frame,
                    drawer_area,
                    "Menu",
                    DrawerEntry::ALL.iter().map(|entry| entry.label()),
                    *cursor,
                );
            }

            Popover::Profile(cursor) => {
                let [_, menu_area] =
                    Layout::horizontal([Constraint::Fill(1), Constraint::Length(18)])
                        .areas(body_area);
                let [menu_area, _] =
                    Layout::vertical([Constraint::Length(5), Constraint::Fill(1)])
                        .areas(menu_area);

                render_menu(
                    frame,
                    menu_area,
                    "Profile",
                    ProfileEntry::ALL.iter().map(|entry| entry.label()),
                    *cursor,
                );
            }

            Popover::EventDetail(id) => {
                let Some(event) = browser.event(*id) else {
                    return;
                };

                let popup_area =
                    centered(body_area, Constraint::Percentage(60), Constraint::Length(10));

                let mut lines = vec![
                    Line::from(event.summary(&browser.distance_label(event))),
                    Line::from(format!(
                        "{:.5}, {:.5}",
                        event.location.lat, event.location.lng
                    ))
                    .dark_gray(),
                ];

                if let Some(starts_at) = event.starts_at {
                    lines.push(Line::from(format!(
                        "Starts {}",
                        starts_at.with_timezone(&Local).format("%a %e %b, %H:%M")
                    )));
                }

                if let Some(description) = &event.description {
                    lines.push(Line::from(description.clone()));
                }

                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::raw(if browser.is_saved(event.id) {
                        "[s] unsave  "
                    } else {
                        "[s] save  "
                    }),
                    Span::raw("[x] share  "),
                    Span::raw("[d] directions  "),
                    Span::raw("[esc] close"),
                ]));

                let popup = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(event.title.clone())
                        .padding(Padding::horizontal(1))
                        .border_style(Style::new().blue()),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
        }
    }
}

/// A bordered list with one highlighted row
fn render_menu<'a>(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'a str,
    labels: impl Iterator<Item = &'a str>,
    cursor: usize,
) {
    let menu = List::new(labels)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::new().blue()),
        )
        .highlight_symbol("› ")
        .highlight_style(Style::new().add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(cursor));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(menu, area, &mut state);
}

/// The full-screen highlight viewer, with an autoplay progress bar along the
/// top. Draws nothing if the viewer is closed.
pub fn render_viewer(frame: &mut Frame<'_>, area: Rect, carousel: &Carousel) {
    let Some(item) = carousel.current() else {
        return;
    };

    let [progress_area, body_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = carousel.progress().round() as u16;

    let progress = Gauge::default()
        .gauge_style(Style::new().fg(Color::White).bg(Color::DarkGray))
        .percent(percent)
        .label(format!("{}s", AUTOPLAY_DURATION.as_secs()));

    let position = carousel
        .items()
        .iter()
        .position(|candidate| candidate.id == item.id)
        .map_or(0, |index| index + 1);

    let body = Paragraph::new(vec![
        Line::default(),
        Line::from(item.title.clone()).bold().centered(),
        Line::from(item.region.clone()).centered(),
        Line::default(),
        Line::from(format!("expires in {} min", item.expires_in_minutes()))
            .red()
            .centered(),
        Line::from(item.cover.clone()).dark_gray().centered(),
        Line::default(),
        Line::from(format!(
            "{position}/{}   ← previous · next →   esc closes",
            carousel.items().len()
        ))
        .dark_gray()
        .centered(),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::new().red()),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(progress, progress_area);
    frame.render_widget(body, body_area);
}
