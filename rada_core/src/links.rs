use crate::event::{EventId, EventItem};
use crate::geo::Coordinates;
use url::Url;

/// Base of the routing service we send people to for directions.
pub const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";

/// The link we share for an event: the page URL with the event's anchor.
///
/// ## Errors
///
/// If `page_url` isn't a valid absolute URL.
pub fn share_url(page_url: &str, id: EventId) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(page_url)?;
    url.set_fragment(Some(&format!("event-{id}")));

    Ok(url)
}

/// Walking directions to an event, from `origin` if we know it (otherwise
/// the routing service will guess.)
///
/// ## Errors
///
/// Only if `DIRECTIONS_BASE` stops being a valid URL.
pub fn directions_url(
    event: &EventItem,
    origin: Option<Coordinates>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(DIRECTIONS_BASE)?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api", "1");
        query.append_pair("destination", &event.location.to_string());
        if let Some(origin) = origin {
            query.append_pair("origin", &origin.to_string());
        }
        query.append_pair("travelmode", "walking");
    }

    Ok(url)
}
