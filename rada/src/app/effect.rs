use super::Action;
use crate::config::Config;
use rada_core::{
    browser::ShareRequest,
    capability::{Clipboard, FixedPosition, NoShare, ShareError},
    Capability, SavedSet,
};
use std::sync::Arc;
use tokio::{fs, io, sync::Mutex, task};
use url::Url;

/// Platform services that effects use. We figure out what's available once,
/// at startup, and keep the handles around for the app as a whole.
pub struct EffectContext {
    /// Where the user is. Terminals can't ask, so this only exists if the
    /// user passed `--location`.
    geolocation: Capability<FixedPosition>,

    /// Terminals don't have a native share sheet.
    share: Capability<NoShare>,

    /// The system clipboard, if we could open it
    clipboard: Capability<SystemClipboard>,

    /// The generation of the last saved set written to disk. Holding the lock
    /// makes us the only writer.
    persisted: Mutex<u64>,
}

impl EffectContext {
    /// Resolve platform services
    pub fn new(config: &Config) -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Capability::Available(SystemClipboard::new(clipboard)),
            Err(err) => {
                tracing::warn!(?err, "no clipboard available");
                Capability::Unavailable
            }
        };

        let ctx = Self {
            geolocation: Capability::from_option(config.location.map(FixedPosition)),
            share: Capability::Unavailable,
            clipboard,
            persisted: Mutex::new(0),
        };

        tracing::info!(
            geolocation = ctx.geolocation.is_available(),
            share = ctx.share.is_available(),
            clipboard = ctx.clipboard.is_available(),
            "resolved platform services"
        );

        ctx
    }
}

/// The system clipboard via `arboard`. We hold one handle for the life of the
/// app: on X11 and Wayland the copied text goes away when the handle that set
/// it is dropped.
#[derive(Clone)]
pub struct SystemClipboard(Arc<std::sync::Mutex<arboard::Clipboard>>);

impl SystemClipboard {
    fn new(clipboard: arboard::Clipboard) -> Self {
        Self(Arc::new(std::sync::Mutex::new(clipboard)))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut clipboard = self
            .0
            .lock()
            .map_err(|_| ShareError::Failed("the clipboard is stuck".to_string()))?;

        clipboard
            .set_text(text)
            .map_err(|err| ShareError::Failed(err.to_string()))
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug)]
pub enum Effect {
    /// Read saved events from disk
    LoadSaved,

    /// Write saved events to disk. Higher generations are newer; a write
    /// never replaces a newer one.
    PersistSaved {
        /// What to write
        saved: SavedSet,

        /// Where this set falls in the order of saves
        generation: u64,
    },

    /// Ask the platform where the user is
    Locate,

    /// Share an event's link
    Share(ShareRequest),

    /// Open a URL (e.g. directions) in the browser
    OpenUrl(Url),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, ctx: &EffectContext, config: &Config) -> Option<Action> {
        match self.run_inner(ctx, config).await {
            Ok(action) => action,
            Err(problem) => {
                tracing::error!(?problem, "problem running effect");
                Some(Action::Problem(problem.to_string()))
            }
        }
    }

    /// The actual implementation of `run`, but with a `Result` wrapper to make
    /// it more ergonomic to write.
    async fn run_inner(
        self,
        ctx: &EffectContext,
        config: &Config,
    ) -> Result<Option<Action>, Problem> {
        match self {
            Self::LoadSaved => {
                let store = config.saved_events_path();
                tracing::debug!(?store, "loading saved events");

                // Not being able to read the file is the same as not having
                // one: we start with nothing saved.
                let data = match fs::read(&store).await {
                    Ok(data) => Some(data),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => None,
                    Err(err) => {
                        tracing::warn!(?err, ?store, "could not read saved events");
                        None
                    }
                };

                Ok(Some(Action::LoadedSaved(SavedSet::load(data.as_deref()))))
            }

            Self::PersistSaved { saved, generation } => {
                let mut persisted = ctx.persisted.lock().await;
                if *persisted >= generation {
                    tracing::debug!(generation, newest = *persisted, "skipping stale save");
                    return Ok(None);
                }

                tracing::debug!(count = saved.len(), generation, "persisting saved events");

                fs::create_dir_all(config.data_dir()).await?;

                // write aside and rename so readers never see a partial file
                let store = config.saved_events_path();
                let scratch = store.with_extension("json.tmp");
                fs::write(&scratch, serde_json::to_vec(&saved)?).await?;
                fs::rename(&scratch, &store).await?;

                *persisted = generation;

                Ok(Some(Action::PersistedSaved))
            }

            Self::Locate => {
                tracing::info!("locating");

                Ok(Some(Action::Located(ctx.geolocation.current_position())))
            }

            Self::Share(request) => {
                tracing::info!(url = %request.url(), "sharing");

                // clipboard handoff can block, so keep it off the async workers
                let share = ctx.share.clone();
                let clipboard = ctx.clipboard.clone();
                let outcome =
                    task::spawn_blocking(move || request.perform(&share, &clipboard)).await?;

                Ok(Some(Action::Shared(outcome)))
            }

            Self::OpenUrl(url) => {
                tracing::info!(%url, "opening url");

                open::that(url.as_str())?;

                Ok(Some(Action::OpenedUrl(url)))
            }
        }
    }
}

/// Problems that can happen while running an `Effect`.
#[derive(Debug, thiserror::Error)]
pub enum Problem {
    /// We had a problem writing to disk or launching a program, for example
    /// with permissions or missing files.
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// We had a problem loading or saving JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] task::JoinError),
}
