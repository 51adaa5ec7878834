use crate::highlight::{HighlightId, HighlightItem};
use std::time::Duration;

/// How long each highlight stays up in the viewer before autoplay moves on.
pub const AUTOPLAY_DURATION: Duration = Duration::from_millis(5000);

/// How often the shell should sample autoplay progress while the viewer is
/// open.
pub const PROGRESS_SAMPLE: Duration = Duration::from_millis(100);

/// Which way to move through the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the strip
    Previous,

    /// Towards the end of the strip
    Next,
}

/// A horizontal swipe gesture in the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved right-to-left; shows the next highlight
    Left,

    /// Finger moved left-to-right; shows the previous highlight
    Right,
}

impl From<Swipe> for Direction {
    fn from(swipe: Swipe) -> Self {
        match swipe {
            Swipe::Left => Direction::Next,
            Swipe::Right => Direction::Previous,
        }
    }
}

/// The full-screen highlight viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Nothing is being viewed
    Closed,

    /// The highlight at `index` is on screen, and autoplay has been running
    /// for `elapsed`.
    Open {
        /// Position in the current (post-expiry) collection
        index: usize,

        /// Autoplay time accumulated since the last reset
        elapsed: Duration,
    },
}

/// Problems with carousel operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    /// Tried to open a highlight that isn't there
    #[error("no highlight at index {index} (there are {len})")]
    OutOfRange {
        /// The index that was asked for
        index: usize,

        /// How many highlights there actually are
        len: usize,
    },
}

/// A strip of live highlights plus a viewer with timed auto-advance.
#[derive(Debug, Clone)]
pub struct Carousel {
    items: Vec<HighlightItem>,
    viewer: Viewer,

    /// How many times the viewer has been opened
    opened: u64,
}

impl Carousel {
    /// Start with the given highlights, in the order given, and the viewer
    /// closed. Items that have already run out are dropped.
    pub fn new(mut items: Vec<HighlightItem>) -> Self {
        items.retain(|item| !item.is_expired());

        Self {
            items,
            viewer: Viewer::Closed,
            opened: 0,
        }
    }

    /// The highlights that haven't expired yet
    pub fn items(&self) -> &[HighlightItem] {
        &self.items
    }

    /// Where the viewer is at
    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    /// The highlight on screen, if the viewer is open
    pub fn current(&self) -> Option<&HighlightItem> {
        match self.viewer {
            Viewer::Closed => None,
            Viewer::Open { index, .. } => self.items.get(index),
        }
    }

    /// Whether the shell should be running the progress timer. This is true
    /// exactly while the viewer is open.
    pub fn autoplay_active(&self) -> bool {
        matches!(self.viewer, Viewer::Open { .. })
    }

    /// Identifies one stretch of the viewer being open, from `open` until it
    /// closes. Moving between highlights keeps the session; closing and
    /// opening again starts a new one. `None` while closed.
    ///
    /// The shell tags progress samples with this so samples from a viewer
    /// that has since closed don't count towards a new one.
    pub fn session(&self) -> Option<u64> {
        self.autoplay_active().then_some(self.opened)
    }

    /// Autoplay progress as a percentage in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        match self.viewer {
            Viewer::Closed => 0.0,
            Viewer::Open { elapsed, .. } => {
                (elapsed.as_secs_f64() / AUTOPLAY_DURATION.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
        }
    }

    /// One second passed. Every countdown goes down by one and anything that
    /// hits zero is removed. Returns the IDs of the removed highlights.
    ///
    /// If the highlight on screen expires, the viewer moves on to whatever
    /// took its place (the next survivor) or closes if nothing did, just
    /// like `advance(Direction::Next)` off the end.
    pub fn tick(&mut self) -> Vec<HighlightId> {
        let showing = self.current().map(|item| item.id);

        let mut expired = Vec::new();
        let mut survivors_before_cursor = 0;

        let cursor = match self.viewer {
            Viewer::Open { index, .. } => Some(index),
            Viewer::Closed => None,
        };

        let mut position = 0;
        self.items.retain_mut(|item| {
            item.expires_in_seconds = item.expires_in_seconds.saturating_sub(1);
            let keep = !item.is_expired();

            if keep {
                if cursor.is_some_and(|cursor| position < cursor) {
                    survivors_before_cursor += 1;
                }
            } else {
                expired.push(item.id);
            }

            position += 1;
            keep
        });

        if let Viewer::Open { index, elapsed } = self.viewer {
            let still_there = showing
                .and_then(|id| self.items.iter().position(|item| item.id == id));

            self.viewer = match still_there {
                Some(new_index) => Viewer::Open {
                    index: new_index,
                    elapsed,
                },
                None if survivors_before_cursor < self.items.len() => {
                    tracing::debug!(index, "highlight expired while open, moving on");
                    Viewer::Open {
                        index: survivors_before_cursor,
                        elapsed: Duration::ZERO,
                    }
                }
                None => {
                    tracing::debug!(index, "highlight expired while open, closing");
                    Viewer::Closed
                }
            };
        }

        expired
    }

    /// Start viewing the highlight at `index`, with progress back at zero.
    ///
    /// ## Errors
    ///
    /// `CarouselError::OutOfRange` if there's no highlight at `index`. The
    /// viewer is left alone in that case.
    pub fn open(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.items.len() {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }

        self.opened += 1;
        self.viewer = Viewer::Open {
            index,
            elapsed: Duration::ZERO,
        };

        Ok(())
    }

    /// Stop viewing.
    pub fn close(&mut self) {
        self.viewer = Viewer::Closed;
    }

    /// Move through the viewer. Going past the last highlight closes the
    /// viewer instead of wrapping around; going back from the first does
    /// nothing at all.
    pub fn advance(&mut self, direction: Direction) {
        let Viewer::Open { index, .. } = self.viewer else {
            return;
        };

        self.viewer = match direction {
            Direction::Next if index + 1 < self.items.len() => Viewer::Open {
                index: index + 1,
                elapsed: Duration::ZERO,
            },
            Direction::Next => Viewer::Closed,
            Direction::Previous if index > 0 => Viewer::Open {
                index: index - 1,
                elapsed: Duration::ZERO,
            },
            Direction::Previous => self.viewer,
        };
    }

    /// Handle a swipe gesture in the viewer
    pub fn swipe(&mut self, swipe: Swipe) {
        self.advance(swipe.into());
    }

    /// One `PROGRESS_SAMPLE` of autoplay time passed. When the highlight has
    /// been up for the full `AUTOPLAY_DURATION` we move on as if the user had
    /// asked for the next one.
    pub fn sample_progress(&mut self) {
        let Viewer::Open { index, elapsed } = self.viewer else {
            return;
        };

        let elapsed = elapsed + PROGRESS_SAMPLE;

        if elapsed >= AUTOPLAY_DURATION {
            self.advance(Direction::Next);
        } else {
            self.viewer = Viewer::Open { index, elapsed };
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn carousel(countdowns: &[u32]) -> Carousel {
        Carousel::new(
            countdowns
                .iter()
                .zip(1..)
                .map(|(seconds, id)| {
                    HighlightItem::new(id, format!("#{id}"), *seconds, "Nairobi", "")
                })
                .collect(),
        )
    }

    fn samples_per_highlight() -> u32 {
        u32::try_from(AUTOPLAY_DURATION.as_millis() / PROGRESS_SAMPLE.as_millis()).unwrap()
    }

    #[test]
    fn starts_closed() {
        let carousel = carousel(&[30, 90]);

        assert_eq!(carousel.viewer(), Viewer::Closed);
        assert!(!carousel.autoplay_active());
        assert_eq!(carousel.progress(), 0.0);
    }

    #[test]
    fn drops_already_expired_seeds() {
        let carousel = carousel(&[0, 5]);

        assert_eq!(carousel.items().len(), 1);
        assert_eq!(carousel.items()[0].id, HighlightId(2));
    }

    #[test]
    fn open_resets_progress() {
        let mut carousel = carousel(&[30, 90]);
        carousel.open(0).unwrap();
        carousel.sample_progress();
        assert!(carousel.progress() > 0.0);

        carousel.open(1).unwrap();
        assert_eq!(
            carousel.viewer(),
            Viewer::Open {
                index: 1,
                elapsed: Duration::ZERO
            }
        );
    }

    #[test]
    fn sessions_span_one_opening_of_the_viewer() {
        let mut carousel = carousel(&[30, 90]);
        assert_eq!(carousel.session(), None);

        carousel.open(0).unwrap();
        let first = carousel.session();
        assert!(first.is_some());

        carousel.advance(Direction::Next);
        assert_eq!(carousel.session(), first);

        carousel.close();
        assert_eq!(carousel.session(), None);

        carousel.open(0).unwrap();
        assert!(carousel.session().is_some());
        assert_ne!(carousel.session(), first);
    }

    #[test]
    fn open_out_of_range_is_an_error() {
        let mut carousel = carousel(&[30]);

        assert_eq!(
            carousel.open(1),
            Err(CarouselError::OutOfRange { index: 1, len: 1 })
        );
        assert_eq!(carousel.viewer(), Viewer::Closed);
    }

    #[test]
    fn close_stops_autoplay() {
        let mut carousel = carousel(&[30]);
        carousel.open(0).unwrap();
        carousel.sample_progress();
        carousel.close();

        assert_eq!(carousel.viewer(), Viewer::Closed);
        assert!(!carousel.autoplay_active());
        assert_eq!(carousel.progress(), 0.0);
    }

    #[test]
    fn next_past_the_end_closes_instead_of_wrapping() {
        let mut carousel = carousel(&[30, 90]);
        carousel.open(1).unwrap();
        carousel.advance(Direction::Next);

        assert_eq!(carousel.viewer(), Viewer::Closed);
    }

    #[test]
    fn previous_at_the_start_is_a_no_op() {
        let mut carousel = carousel(&[30, 90]);
        carousel.open(0).unwrap();
        carousel.sample_progress();
        let before = carousel.viewer();

        carousel.advance(Direction::Previous);

        assert_eq!(carousel.viewer(), before);
    }

    #[test]
    fn advancing_resets_progress() {
        let mut carousel = carousel(&[30, 90, 120]);
        carousel.open(1).unwrap();
        carousel.sample_progress();

        carousel.advance(Direction::Previous);
        assert_eq!(carousel.progress(), 0.0);

        carousel.sample_progress();
        carousel.advance(Direction::Next);
        assert_eq!(carousel.progress(), 0.0);
    }

    #[test]
    fn swipes_map_to_directions() {
        let mut carousel = carousel(&[30, 90]);
        carousel.open(0).unwrap();

        carousel.swipe(Swipe::Left);
        assert_eq!(carousel.current().map(|item| item.id), Some(HighlightId(2)));

        carousel.swipe(Swipe::Right);
        assert_eq!(carousel.current().map(|item| item.id), Some(HighlightId(1)));
    }

    #[test]
    fn autoplay_advances_after_the_full_duration() {
        let mut carousel = carousel(&[30, 90]);
        carousel.open(0).unwrap();

        for _ in 1..samples_per_highlight() {
            carousel.sample_progress();
        }
        assert_eq!(carousel.current().map(|item| item.id), Some(HighlightId(1)));
        assert!(carousel.progress() < 100.0);

        carousel.sample_progress();
        assert_eq!(
            carousel.viewer(),
            Viewer::Open {
                index: 1,
                elapsed: Duration::ZERO
            }
        );

        for _ in 0..samples_per_highlight() {
            carousel.sample_progress();
        }
        assert_eq!(carousel.viewer(), Viewer::Closed);
    }

    #[test]
    fn single_highlight_expires_after_thirty_ticks_and_closes_the_viewer() {
        let mut carousel = carousel(&[30]);
        carousel.open(0).unwrap();

        for _ in 0..29 {
            assert!(carousel.tick().is_empty());
        }
        assert_eq!(carousel.items()[0].expires_in_seconds, 1);
        assert!(carousel.autoplay_active());

        assert_eq!(carousel.tick(), vec![HighlightId(1)]);
        assert!(carousel.items().is_empty());
        assert_eq!(carousel.viewer(), Viewer::Closed);
    }

    #[test]
    fn viewer_follows_its_highlight_when_an_earlier_one_expires() {
        let mut carousel = carousel(&[1, 90]);
        carousel.open(1).unwrap();
        carousel.sample_progress();

        carousel.tick();

        assert_eq!(carousel.current().map(|item| item.id), Some(HighlightId(2)));
        assert!(carousel.progress() > 0.0);
    }

    #[test]
    fn viewer_moves_to_the_next_survivor_when_its_highlight_expires() {
        let mut carousel = carousel(&[90, 1, 90]);
        carousel.open(1).unwrap();
        carousel.sample_progress();

        carousel.tick();

        assert_eq!(
            carousel.viewer(),
            Viewer::Open {
                index: 1,
                elapsed: Duration::ZERO
            }
        );
        assert_eq!(carousel.current().map(|item| item.id), Some(HighlightId(3)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn countdowns_go_down_by_one_per_tick(
                countdowns in crate::test::countdowns(),
                ticks in 0..150u32,
            ) {
                let mut carousel = carousel(&countdowns);

                for _ in 0..ticks {
                    carousel.tick();
                }

                let expected: Vec<(HighlightId, u32)> = countdowns
                    .iter()
                    .zip(1..)
                    .filter(|(seconds, _)| **seconds > ticks)
                    .map(|(seconds, id)| (HighlightId(id), seconds - ticks))
                    .collect();

                let actual: Vec<(HighlightId, u32)> = carousel
                    .items()
                    .iter()
                    .map(|item| (item.id, item.expires_in_seconds))
                    .collect();

                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn progress_is_monotonic_between_resets(
                countdowns in crate::test::countdowns(),
                samples in 0..100usize,
            ) {
                prop_assume!(!countdowns.is_empty());

                let mut carousel = carousel(&countdowns);
                carousel.open(0).unwrap();

                let mut last = (carousel.viewer(), carousel.progress());
                for _ in 0..samples {
                    carousel.sample_progress();
                    let progress = carousel.progress();

                    prop_assert!((0.0..=100.0).contains(&progress));

                    if let (
                        Viewer::Open { index: before, .. },
                        Viewer::Open { index: after, .. },
                    ) = (last.0, carousel.viewer())
                    {
                        if before == after {
                            prop_assert!(progress >= last.1);
                        }
                    }

                    last = (carousel.viewer(), progress);
                }
            }
        }
    }

    mod state_machine {
        use super::*;
        use proptest::prelude::*;
        use proptest_state_machine::{prop_state_machine, ReferenceStateMachine, StateMachineTest};

        #[derive(Debug, Clone)]
        enum Transition {
            Tick,
            Open(usize),
            Close,
            Advance(Direction),
            Swipe(Swipe),
            Sample,
        }

        /// A deliberately naive model: ids and countdowns in a list, and the
        /// viewer as "which id, how many samples."
        #[derive(Debug, Clone)]
        struct RefState {
            items: Vec<(HighlightId, u32)>,
            viewing: Option<(HighlightId, u32)>,
        }

        impl RefState {
            fn position(&self, id: HighlightId) -> Option<usize> {
                self.items.iter().position(|(item, _)| *item == id)
            }

            fn step(&mut self, direction: Direction) {
                let Some((id, _)) = self.viewing else {
                    return;
                };
                let Some(index) = self.position(id) else {
                    return;
                };

                match direction {
                    Direction::Next => {
                        self.viewing = self.items.get(index + 1).map(|(id, _)| (*id, 0));
                    }
                    Direction::Previous if index > 0 => {
                        self.viewing = Some((self.items[index - 1].0, 0));
                    }
                    Direction::Previous => {}
                }
            }
        }

        impl ReferenceStateMachine for RefState {
            type State = RefState;

            type Transition = Transition;

            fn init_state() -> BoxedStrategy<Self::State> {
                crate::test::countdowns()
                    .prop_map(|countdowns| RefState {
                        items: countdowns
                            .into_iter()
                            .zip(1..)
                            .map(|(seconds, id)| (HighlightId(id), seconds))
                            .collect(),
                        viewing: None,
                    })
                    .boxed()
            }

            fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
                let len = state.items.len().max(1);

                prop_oneof![
                    5 => Just(Transition::Tick),
                    2 => (0..len).prop_map(Transition::Open),
                    1 => Just(Transition::Close),
                    2 => prop_oneof![Just(Direction::Previous), Just(Direction::Next)]
                        .prop_map(Transition::Advance),
                    1 => prop_oneof![Just(Swipe::Left), Just(Swipe::Right)]
                        .prop_map(Transition::Swipe),
                    10 => Just(Transition::Sample),
                ]
                .boxed()
            }

            fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
                match transition {
                    Transition::Tick => {
                        let cursor = state
                            .viewing
                            .and_then(|(id, _)| state.position(id));

                        for (_, seconds) in &mut state.items {
                            *seconds -= 1;
                        }

                        if let (Some((id, samples)), Some(cursor)) = (state.viewing, cursor) {
                            let expired = state.items[cursor].1 == 0;
                            let survivors_before = state.items[..cursor]
                                .iter()
                                .filter(|(_, seconds)| *seconds > 0)
                                .count();

                            state.items.retain(|(_, seconds)| *seconds > 0);

                            state.viewing = if expired {
                                state.items.get(survivors_before).map(|(id, _)| (*id, 0))
                            } else {
                                Some((id, samples))
                            };
                        } else {
                            state.items.retain(|(_, seconds)| *seconds > 0);
                        }
                    }
                    Transition::Open(index) => {
                        state.viewing = Some((state.items[*index].0, 0));
                    }
                    Transition::Close => state.viewing = None,
                    Transition::Advance(direction) => state.step(*direction),
                    Transition::Swipe(swipe) => state.step((*swipe).into()),
                    Transition::Sample => {
                        if let Some((id, samples)) = state.viewing {
                            if samples + 1 >= samples_per_highlight() {
                                state.step(Direction::Next);
                            } else {
                                state.viewing = Some((id, samples + 1));
                            }
                        }
                    }
                }

                state
            }

            fn preconditions(state: &Self::State, transition: &Self::Transition) -> bool {
                match transition {
                    Transition::Open(index) => *index < state.items.len(),
                    _ => true,
                }
            }
        }

        struct CarouselStateMachine {}

        impl StateMachineTest for CarouselStateMachine {
            type SystemUnderTest = Carousel;

            type Reference = RefState;

            fn init_test(
                ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            ) -> Self::SystemUnderTest {
                carousel(
                    &ref_state
                        .items
                        .iter()
                        .map(|(_, seconds)| *seconds)
                        .collect::<Vec<_>>(),
                )
            }

            fn apply(
                mut state: Self::SystemUnderTest,
                ref_state: &<Self::Reference as ReferenceStateMachine>::State,
                transition: <Self::Reference as ReferenceStateMachine>::Transition,
            ) -> Self::SystemUnderTest {
                match transition {
                    Transition::Tick => {
                        state.tick();
                    }
                    Transition::Open(index) => state.open(index).unwrap(),
                    Transition::Close => state.close(),
                    Transition::Advance(direction) => state.advance(direction),
                    Transition::Swipe(swipe) => state.swipe(swipe),
                    Transition::Sample => state.sample_progress(),
                }

                let items: Vec<(HighlightId, u32)> = state
                    .items()
                    .iter()
                    .map(|item| (item.id, item.expires_in_seconds))
                    .collect();
                assert_eq!(items, ref_state.items);

                assert_eq!(
                    state.current().map(|item| item.id),
                    ref_state.viewing.map(|(id, _)| id)
                );

                if let (Viewer::Open { elapsed, .. }, Some((_, samples))) =
                    (state.viewer(), ref_state.viewing)
                {
                    assert_eq!(elapsed, PROGRESS_SAMPLE * samples);
                }

                state
            }

            fn check_invariants(
                state: &Self::SystemUnderTest,
                _: &<Self::Reference as ReferenceStateMachine>::State,
            ) {
                if let Viewer::Open { index, .. } = state.viewer() {
                    assert!(index < state.items().len(), "{index} is out of range");
                }

                assert!((0.0..=100.0).contains(&state.progress()));

                // seeds are numbered in order, so seed order means ascending ids
                assert!(state.items().windows(2).all(|pair| pair[0].id < pair[1].id));
            }
        }

        prop_state_machine! {
            #[test]
            fn state_machine(sequential 1..40 => CarouselStateMachine);
        }
    }
}
