use crate::app::Action;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Duration, MissedTickBehavior},
};

/// A recurring task that sends an action into the event loop every
/// `period`. The task is aborted when the `Timer` is dropped, so whoever owns
/// the `Timer` owns the task's lifetime.
#[derive(Debug)]
pub struct Timer {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Timer {
    /// Start sending `make_action()` every `period`. The first action comes
    /// after one full period, not immediately.
    pub fn every(
        name: &'static str,
        period: Duration,
        tx: UnboundedSender<Action>,
        make_action: impl Fn() -> Action + Send + 'static,
    ) -> Self {
        tracing::debug!(name, ?period, "starting timer");

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                if tx.send(make_action()).is_err() {
                    // the event loop is gone, so nobody is listening
                    break;
                }
            }
        });

        Self { name, handle }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(name = self.name, "stopping timer");
        self.handle.abort();
    }
}
