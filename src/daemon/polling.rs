use crate::core::error::DeliveryError;
use crate::core::models::OrderStatus;
use crate::providers::OrderTracker;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    Refresh,
    Quit,
}

/// Receives the outcome of every poll.
#[async_trait]
pub trait StatusPresenter: Send {
    async fn present(&mut self, result: &Result<OrderStatus, DeliveryError>);
}

/// Cloneable trigger for the poll loop.
#[derive(Clone)]
pub struct PollHandle {
    tx: mpsc::UnboundedSender<PollCommand>,
}

impl PollHandle {
    /// Returns `false` once the loop has stopped.
    pub fn refresh(&self) -> bool {
        self.tx.send(PollCommand::Refresh).is_ok()
    }

    pub fn quit(&self) -> bool {
        self.tx.send(PollCommand::Quit).is_ok()
    }
}

pub struct PollingLoop<T> {
    tracker: T,
    interval: Duration,
    commands: mpsc::UnboundedReceiver<PollCommand>,
}

impl<T: OrderTracker> PollingLoop<T> {
    pub fn new(tracker: T, interval: Duration) -> (Self, PollHandle) {
        let (tx, commands) = mpsc::unbounded_channel();
        let polling = Self {
            tracker,
            interval,
            commands,
        };
        (polling, PollHandle { tx })
    }

    /// Polls once immediately, then on every tick or refresh command, until a
    /// quit command arrives or every handle is dropped.
    ///
    /// Each poll is awaited inline, so polls never overlap and the tracker's
    /// session is never refreshed concurrently. Quit is only observed between
    /// polls.
    pub async fn run<P: StatusPresenter>(mut self, presenter: &mut P) {
        tracing::info!("Polling loop started (interval: {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(PollCommand::Refresh) => {
                        tracing::info!("Manual refresh requested");
                        self.poll(presenter).await;
                        ticker.reset();
                    }
                    Some(PollCommand::Quit) | None => {
                        tracing::info!("Quit requested, stopping polling loop");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.poll(presenter).await;
                }
            }
        }
    }

    async fn poll<P: StatusPresenter>(&mut self, presenter: &mut P) {
        let result = self.tracker.refresh_order_status().await;
        presenter.present(&result).await;
    }
}
