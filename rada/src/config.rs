use clap::{Parser, ValueEnum};
use rada_core::{Coordinates, TileStyle};
use std::path::PathBuf;

/// Browse trending highlights and nearby events from the terminal
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Config {
    /// Where should we store data (saved events, logs)?
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// The page URL that shared links point at
    #[clap(long, default_value = "https://rada.app/")]
    pub page_url: String,

    /// Where you are, as LAT,LNG. Without this, "locate me" is unavailable.
    #[clap(long, allow_hyphen_values = true)]
    pub location: Option<Coordinates>,

    /// Map tile style to start with
    #[clap(long, default_value_t = TileStyle::Standard)]
    pub tiles: TileStyle,

    /// Show the list and map side by side (desktop) or one at a time
    /// (mobile.) `auto` decides from the terminal width.
    #[clap(long, value_enum, default_value_t = LayoutPreference::Auto)]
    pub layout: LayoutPreference,
}

/// How to choose a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutPreference {
    /// Mobile below `DESKTOP_MIN_WIDTH` columns, desktop otherwise
    Auto,

    /// Always one pane at a time
    Mobile,

    /// Always side by side
    Desktop,
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("app", "rada", "rada")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Where the saved events live
    pub fn saved_events_path(&self) -> PathBuf {
        self.data_dir().join("saved_events.json")
    }
}
