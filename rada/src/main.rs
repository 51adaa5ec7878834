//! Browse trending highlights and nearby events from the terminal

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Recurring actions that stop when dropped
mod timer;

use app::{Action, App, Effect, EffectContext};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{io, process::ExitCode, sync::Arc};
use timer::Timer;
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time::Duration,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file in the data dir.
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let (log_writer, _log_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&data_dir, "rada.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_writer)
                .with_ansi(false),
        )
        .init();

    tracing::info!(?data_dir, "starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(io::stdout(), EnableMouseCapture)?;

    let res = run(terminal, Arc::new(config)).await;

    execute!(io::stdout(), DisableMouseCapture)?;
    ratatui::restore();

    if let Err(err) = &res {
        tracing::error!(?err, "exiting with an error");
    }
    res
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, config: Arc<config::Config>) -> io::Result<ExitCode> {
    let mut app = App::new(config.page_url.clone(), config.layout, config.tiles);
    let ctx = Arc::new(EffectContext::new(&config));

    // Effects, timers, and terminal events all end up as actions on this
    // channel (terminal events are read separately below.) We keep track of
    // outstanding effects so we can exit cleanly.
    let (action_tx, mut action_rx) = unbounded_channel();
    let mut outstanding_effects = Vec::with_capacity(1);

    outstanding_effects.push(spawn_effect_task(
        action_tx.clone(),
        Arc::clone(&ctx),
        Arc::clone(&config),
        app.init(),
    ));

    let size = terminal.size()?;
    app.handle(Action::Resized(size.width));
    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Highlight countdowns run for the whole session. Autoplay progress only
    // runs while the viewer is open, so we start and stop it as needed, with
    // a fresh timer for each viewer session.
    let _countdown = Timer::every(
        "countdown",
        Duration::from_secs(1),
        action_tx.clone(),
        || Action::CountdownTick,
    );
    let mut progress: Option<(u64, Timer)> = None;

    loop {
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => Some(Action::Key(key_event)),
                    Some(Ok(Event::Mouse(mouse_event))) => Some(Action::Mouse(mouse_event)),
                    Some(Ok(Event::Resize(width, _))) => Some(Action::Resized(width)),
                    Some(Err(err)) => Some(Action::Problem(err.to_string())),
                    _ => None,
                }
            },

            action_opt = action_rx.recv() => action_opt,
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    action_tx.clone(),
                    Arc::clone(&ctx),
                    Arc::clone(&config),
                    effect,
                ));
            }
        }

        match (app.autoplay_session(), &progress) {
            (Some(session), Some((running, _))) if *running == session => {}
            (Some(session), _) => {
                progress = Some((
                    session,
                    Timer::every(
                        "progress",
                        rada_core::carousel::PROGRESS_SAMPLE,
                        action_tx.clone(),
                        move || Action::ProgressSample(session),
                    ),
                ));
            }
            (None, Some(_)) => progress = None,
            (None, None) => {}
        }

        terminal.draw(|frame| app.render(frame))?;

        outstanding_effects.retain(|handle| !handle.is_finished());

        // Wait for outstanding effects (e.g. persisting saved events) before
        // exiting with the app's exit code.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                if let Err(err) = effect.await {
                    tracing::error!(?err, "effect task failed during shutdown");
                }
            }

            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    action_tx: UnboundedSender<Action>,
    ctx: Arc<EffectContext>,
    config: Arc<config::Config>,
    effect: Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(next_action) = effect.run(&ctx, &config).await {
            if action_tx.send(next_action).is_err() {
                tracing::debug!("event loop is gone; dropping action");
            }
        }
    })
}
