use std::{fmt, str::FromStr};

/// Named map tile providers. The map draws whichever one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileStyle {
    /// Regular OpenStreetMap tiles
    #[default]
    Standard,

    /// The Humanitarian OpenStreetMap Team style; higher contrast, better
    /// on small screens outdoors
    Humanitarian,
}

impl TileStyle {
    /// Every style, in the order they cycle
    pub const ALL: [TileStyle; 2] = [TileStyle::Standard, TileStyle::Humanitarian];

    /// Tile URL template with `{s}`, `{z}`, `{x}`, and `{y}` placeholders
    pub fn url_template(self) -> &'static str {
        match self {
            Self::Standard => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::Humanitarian => "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
        }
    }

    /// Credit line the provider requires
    pub fn attribution(self) -> &'static str {
        match self {
            Self::Standard => "© OpenStreetMap contributors",
            Self::Humanitarian => {
                "© OpenStreetMap contributors, Tiles style by Humanitarian OpenStreetMap Team"
            }
        }
    }

    /// The style after this one
    pub fn next(self) -> Self {
        match self {
            Self::Standard => Self::Humanitarian,
            Self::Humanitarian => Self::Standard,
        }
    }
}

impl fmt::Display for TileStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Humanitarian => write!(f, "humanitarian"),
        }
    }
}

impl FromStr for TileStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tile style {s:?} (try standard or humanitarian)"))
    }
}
