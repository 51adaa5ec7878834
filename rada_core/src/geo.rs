use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Mean radius of the Earth, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, positive north of the equator
    pub lat: f64,

    /// Longitude, positive east of Greenwich
    pub lng: f64,
}

impl Coordinates {
    /// Construct a new point
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in kilometers, using the Haversine
    /// formula.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);

        // rounding can push near-antipodal points just past 1
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Problems parsing a `LAT,LNG` pair
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseCoordinatesError {
    /// There was no comma between the two numbers
    #[error("expected LAT,LNG")]
    MissingComma,

    /// One of the halves was not a number
    #[error("invalid number: {0}")]
    InvalidNumber(#[from] std::num::ParseFloatError),

    /// The numbers parsed but don't describe a place on Earth
    #[error("{0} is out of range")]
    OutOfRange(String),
}

impl FromStr for Coordinates {
    type Err = ParseCoordinatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or(ParseCoordinatesError::MissingComma)?;

        let lat: f64 = lat.trim().parse()?;
        let lng: f64 = lng.trim().parse()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ParseCoordinatesError::OutOfRange(s.to_string()));
        }

        Ok(Self { lat, lng })
    }
}

/// Render a distance the way people read it on a phone: whole meters up close,
/// kilometers to one decimal place further out.
#[expect(clippy::cast_possible_truncation)]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.1} km")
    }
}

/// The smallest box containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// South-west corner
    pub south_west: Coordinates,

    /// North-east corner
    pub north_east: Coordinates,
}

impl Bounds {
    /// Fit a box around every point. Returns `None` for an empty input.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |acc, point| {
            Some(match acc {
                None => Bounds {
                    south_west: *point,
                    north_east: *point,
                },
                Some(Bounds {
                    south_west,
                    north_east,
                }) => Bounds {
                    south_west: Coordinates::new(
                        south_west.lat.min(point.lat),
                        south_west.lng.min(point.lng),
                    ),
                    north_east: Coordinates::new(
                        north_east.lat.max(point.lat),
                        north_east.lng.max(point.lng),
                    ),
                },
            })
        })
    }

    /// Whether the point is inside (or on the edge of) the box
    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// The middle of the box
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}
