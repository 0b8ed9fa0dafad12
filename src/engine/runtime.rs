// Single-task runtime driving the exchange from a command queue and two timers

use std::future;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::core::types::{HistoryEntry, LineItem, OrderReceipt, PriceSnapshot};
use crate::engine::events::{EventBus, ExchangeEvent};
use crate::engine::exchange::Exchange;
use crate::error::{ExchangeError, ExchangeResult};

const COMMAND_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug)]
enum Command {
    Crash {
        reply: oneshot::Sender<()>,
    },
    SetAutoUpdate {
        enabled: bool,
        reply: oneshot::Sender<()>,
    },
    Buy {
        index: usize,
        reply: oneshot::Sender<ExchangeResult<LineItem>>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    Finish {
        reply: oneshot::Sender<OrderReceipt>,
    },
    GetSnapshot {
        reply: oneshot::Sender<Vec<PriceSnapshot>>,
    },
    GetHistory {
        index: usize,
        reply: oneshot::Sender<ExchangeResult<Vec<HistoryEntry>>>,
    },
    GetCart {
        reply: oneshot::Sender<Vec<LineItem>>,
    },
    GetTotal {
        reply: oneshot::Sender<f64>,
    },
    GetAutoUpdate {
        reply: oneshot::Sender<bool>,
    },
    GetOrderFinished {
        reply: oneshot::Sender<bool>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle used by the presentation layer to talk to the engine
#[derive(Debug, Clone)]
pub struct ExchangeHandle {
    sender: mpsc::Sender<Command>,
    events: EventBus,
}

impl ExchangeHandle {
    pub async fn crash(&self) -> ExchangeResult<()> {
        self.request(|reply| Command::Crash { reply }).await
    }

    pub async fn set_auto_update(&self, enabled: bool) -> ExchangeResult<()> {
        self.request(|reply| Command::SetAutoUpdate { enabled, reply }).await
    }

    pub async fn buy(&self, index: usize) -> ExchangeResult<LineItem> {
        self.request(|reply| Command::Buy { index, reply }).await?
    }

    pub async fn clear(&self) -> ExchangeResult<()> {
        self.request(|reply| Command::Clear { reply }).await
    }

    pub async fn finish(&self) -> ExchangeResult<OrderReceipt> {
        self.request(|reply| Command::Finish { reply }).await
    }

    pub async fn snapshot(&self) -> ExchangeResult<Vec<PriceSnapshot>> {
        self.request(|reply| Command::GetSnapshot { reply }).await
    }

    pub async fn history_of(&self, index: usize) -> ExchangeResult<Vec<HistoryEntry>> {
        self.request(|reply| Command::GetHistory { index, reply }).await?
    }

    pub async fn cart_contents(&self) -> ExchangeResult<Vec<LineItem>> {
        self.request(|reply| Command::GetCart { reply }).await
    }

    pub async fn total(&self) -> ExchangeResult<f64> {
        self.request(|reply| Command::GetTotal { reply }).await
    }

    pub async fn is_auto_update_enabled(&self) -> ExchangeResult<bool> {
        self.request(|reply| Command::GetAutoUpdate { reply }).await
    }

    pub async fn is_order_finished(&self) -> ExchangeResult<bool> {
        self.request(|reply| Command::GetOrderFinished { reply }).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.events.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> ExchangeResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| ExchangeError::EngineStopped)?;
        response.await.map_err(|_| ExchangeError::EngineStopped)
    }
}

/// Owns the engine task. Dropping it without `shutdown` leaves the task
/// running until every handle is gone.
pub struct ExchangeRuntime {
    handle: ExchangeHandle,
    task: JoinHandle<Exchange>,
}

impl ExchangeRuntime {
    /// Spawn the engine task. Must be called from within a tokio runtime.
    pub fn start(exchange: Exchange, timing: TimingConfig) -> Self {
        let (sender, commands) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let handle = ExchangeHandle {
            sender,
            events: exchange.event_bus(),
        };

        let task = tokio::spawn(run(exchange, timing, commands));
        Self { handle, task }
    }

    pub fn handle(&self) -> ExchangeHandle {
        self.handle.clone()
    }

    /// Stop the loop, cancel pending timers and hand back the final engine state
    pub async fn shutdown(self) -> ExchangeResult<Exchange> {
        let (reply, done) = oneshot::channel();
        if self.handle.sender.send(Command::Shutdown { reply }).await.is_ok() {
            let _ = done.await;
        }
        self.task
            .await
            .map_err(|e| ExchangeError::Internal(format!("engine task failed: {}", e)))
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}

async fn run(mut exchange: Exchange, timing: TimingConfig, mut commands: mpsc::Receiver<Command>) -> Exchange {
    let period = timing.tick_interval();
    let recovery_delay = timing.crash_recovery();

    // Present only while auto-update is on
    let mut ticker = exchange.is_auto_update_enabled().then(|| new_ticker(period));
    let mut recoveries: JoinSet<()> = JoinSet::new();

    info!("🚀 Exchange engine started (tick every {:?})", period);

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("All handles dropped");
                    break;
                };

                match command {
                    Command::Crash { reply } => {
                        exchange.crash();
                        recoveries.spawn(time::sleep(recovery_delay));
                        let _ = reply.send(());
                    }
                    Command::SetAutoUpdate { enabled, reply } => {
                        if exchange.set_auto_update(enabled) {
                            ticker = enabled.then(|| new_ticker(period));
                        }
                        let _ = reply.send(());
                    }
                    Command::Buy { index, reply } => {
                        let result = exchange.buy(index);
                        if let Err(e) = &result {
                            warn!("⚠️  Buy rejected: {}", e);
                        }
                        let _ = reply.send(result);
                    }
                    Command::Clear { reply } => {
                        exchange.clear();
                        let _ = reply.send(());
                    }
                    Command::Finish { reply } => {
                        let _ = reply.send(exchange.finish());
                    }
                    Command::GetSnapshot { reply } => {
                        let _ = reply.send(exchange.snapshot());
                    }
                    Command::GetHistory { index, reply } => {
                        let history = exchange
                            .history_of(index)
                            .map(|entries| entries.iter().cloned().collect());
                        let _ = reply.send(history);
                    }
                    Command::GetCart { reply } => {
                        let _ = reply.send(exchange.cart_contents().to_vec());
                    }
                    Command::GetTotal { reply } => {
                        let _ = reply.send(exchange.total());
                    }
                    Command::GetAutoUpdate { reply } => {
                        let _ = reply.send(exchange.is_auto_update_enabled());
                    }
                    Command::GetOrderFinished { reply } => {
                        let _ = reply.send(exchange.is_order_finished());
                    }
                    Command::Shutdown { reply } => {
                        let _ = reply.send(());
                        break;
                    }
                }
            }
            Some(joined) = recoveries.join_next() => {
                if let Err(e) = joined {
                    warn!("⚠️  Crash recovery timer failed: {}", e);
                    continue;
                }
                if exchange.complete_crash_recovery() {
                    ticker = Some(new_ticker(period));
                }
            }
            _ = next_tick(&mut ticker) => {
                exchange.tick();
            }
        }
    }

    recoveries.abort_all();
    info!("🛑 Exchange engine stopped");
    exchange
}
