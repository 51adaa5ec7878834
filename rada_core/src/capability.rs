use crate::geo::Coordinates;

/// A platform service that may or may not exist. We figure out which once,
/// at startup, and hand the result in to whatever needs it.
#[derive(Debug, Clone)]
pub enum Capability<T> {
    /// The service exists; here's a handle to it
    Available(T),

    /// The platform doesn't offer this service
    Unavailable,
}

impl<T> Capability<T> {
    /// Wrap an optional handle
    pub fn from_option(handle: Option<T>) -> Self {
        match handle {
            Some(handle) => Self::Available(handle),
            None => Self::Unavailable,
        }
    }

    /// Borrow the handle, if there is one
    pub fn handle(&self) -> Option<&T> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable => None,
        }
    }

    /// Whether the service exists
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl<G: Geolocate> Capability<G> {
    /// Ask for the current position, if we can ask at all.
    ///
    /// ## Errors
    ///
    /// `LocateError::Unavailable` if there's no geolocation, otherwise
    /// whatever the platform said.
    pub fn current_position(&self) -> Result<Coordinates, LocateError> {
        self.handle()
            .ok_or(LocateError::Unavailable)?
            .current_position()
    }
}

/// Problems finding out where the user is
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// There's no way to ask for a position on this platform
    #[error("Geolocation is not supported here")]
    Unavailable,

    /// The user said no
    #[error("Location permission was denied")]
    Denied,

    /// We asked, but didn't get an answer
    #[error("Couldn't get your location: {0}")]
    Failed(String),
}

/// Problems sharing an event
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// Neither native sharing nor the clipboard is available
    #[error("Sharing is not supported here")]
    Unavailable,

    /// The user backed out of the share sheet
    #[error("Share was cancelled")]
    Cancelled,

    /// The platform reported a problem
    #[error("Couldn't share: {0}")]
    Failed(String),
}

/// Ask the platform where the user is. One request, one answer.
pub trait Geolocate {
    /// Get the current position.
    ///
    /// ## Errors
    ///
    /// `LocateError::Denied` or `LocateError::Failed`, depending on what
    /// the platform says.
    fn current_position(&self) -> Result<Coordinates, LocateError>;
}

/// What gets handed to a native share sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    /// Usually the event title
    pub title: String,

    /// A one-line description
    pub text: String,

    /// Where the event lives on the page
    pub url: String,
}

/// A native share sheet.
pub trait Share {
    /// Hand the payload to the platform.
    ///
    /// ## Errors
    ///
    /// `ShareError::Cancelled` if the user backed out, `ShareError::Failed`
    /// otherwise.
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// A system clipboard.
pub trait Clipboard {
    /// Put `text` on the clipboard.
    ///
    /// ## Errors
    ///
    /// `ShareError::Failed` if the platform refused.
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

/// Always answers with the same position. Useful when the platform can't
/// locate but the user told us where they are.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl Geolocate for FixedPosition {
    fn current_position(&self) -> Result<Coordinates, LocateError> {
        Ok(self.0)
    }
}

impl<T: Geolocate> Geolocate for &T {
    fn current_position(&self) -> Result<Coordinates, LocateError> {
        (**self).current_position()
    }
}

impl<T: Share> Share for &T {
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        (**self).share(payload)
    }
}

impl<T: Clipboard> Clipboard for &T {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        (**self).copy(text)
    }
}

/// Marker for "this platform has no native share sheet"; never constructed
/// as `Available`.
#[derive(Debug, Clone, Copy)]
pub enum NoShare {}

impl Share for NoShare {
    fn share(&self, _: &SharePayload) -> Result<(), ShareError> {
        match *self {}
    }
}
