//! Probing session: drives a prober at a fixed cadence and folds every
//! outcome into a [`PingResult`]

use crate::{
    client::Prober,
    models::{ProbeOutcome, Target},
    stats::PingResult,
};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Cloneable signal that ends a running session
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Ask the session to stop; calling it again has no further effect
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }
}

/// One probing session against a single target
pub struct Session {
    target: Arc<Target>,
    prober: Box<dyn Prober>,
    stop: Arc<watch::Sender<bool>>,
}

impl Session {
    pub fn new(target: Target, prober: Box<dyn Prober>) -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            target: Arc::new(target),
            prober,
            stop: Arc::new(sender),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn prober_name(&self) -> &'static str {
        self.prober.name()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            sender: self.stop.clone(),
        }
    }

    /// Probe until the counter is reached or the session is stopped.
    ///
    /// The first probe fires immediately, later ones at least `interval`
    /// apart. `on_probe` sees each outcome right after it was folded. A stop
    /// that arrives while a probe is in flight discards that probe.
    pub async fn run<F>(&self, mut on_probe: F) -> PingResult
    where
        F: FnMut(u32, &ProbeOutcome, &PingResult),
    {
        let mut result = PingResult::new(self.target.clone());
        let mut stop = self.stop.subscribe();
        let counter = self.target.counter();

        let mut ticker = interval(self.target.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut seq = 0u32;
        loop {
            if counter != 0 && result.counter() >= counter {
                break;
            }

            tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = stopped(&mut stop) => break,
                outcome = self.prober.probe(&self.target) => outcome,
            };

            seq += 1;
            result.fold(&outcome);
            on_probe(seq, &outcome, &result);
        }

        result
    }
}

/// Resolves once the stop flag is set
async fn stopped(receiver: &mut watch::Receiver<bool>) {
    loop {
        let is_stopped = *receiver.borrow_and_update();
        if is_stopped {
            return;
        }
        if receiver.changed().await.is_err() {
            // Sender gone: nobody can stop us any more
            std::future::pending::<()>().await;
        }
    }
}

/// Stop the session on Ctrl-C
pub fn spawn_ctrl_c(handle: StopHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    })
}
