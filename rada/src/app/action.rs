use crossterm::event::{KeyEvent, MouseEvent};
use rada_core::{
    browser::ShareOutcome,
    capability::{LocateError, ShareError},
    Coordinates, SavedSet,
};
use url::Url;

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// We read the saved events from disk (or found none)
    LoadedSaved(SavedSet),

    /// We wrote the saved events to disk
    PersistedSaved,

    /// The user did something on the keyboard
    Key(KeyEvent),

    /// The user did something with the mouse. Drags in the viewer are swipes.
    Mouse(MouseEvent),

    /// The terminal changed size; we only care about the width
    Resized(u16),

    /// Something bad happened; display it to the user
    Problem(String),

    /// A second passed; highlight countdowns go down
    CountdownTick,

    /// A progress sample passed while the viewer was open, tagged with the
    /// viewer session the timer was started for
    ProgressSample(u64),

    /// The platform answered our location request
    Located(Result<Coordinates, LocateError>),

    /// A share finished, one way or another
    Shared(Result<ShareOutcome, ShareError>),

    /// We handed a URL off to the browser
    OpenedUrl(Url),
}
