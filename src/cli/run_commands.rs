// Live session: runs the engine on its timers and takes console commands
use std::future;
use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use menu_exchange::{Config, Exchange, ExchangeEvent, ExchangeHandle, ExchangeResult, ExchangeRuntime};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const CONSOLE_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Buy(usize),
    Crash,
    Auto(bool),
    Clear,
    Finish,
    Cart,
    Prices,
    History(usize),
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| "empty command".to_string())?;
        let arg = parts.next();

        let index = |arg: Option<&str>| -> Result<usize, String> {
            arg.ok_or_else(|| format!("'{}' needs an item index", verb))?
                .parse::<usize>()
                .map_err(|e| format!("bad index: {}", e))
        };

        match verb.to_lowercase().as_str() {
            "buy" | "b" => Ok(ConsoleCommand::Buy(index(arg)?)),
            "crash" => Ok(ConsoleCommand::Crash),
            "auto" => match arg {
                Some("on") => Ok(ConsoleCommand::Auto(true)),
                Some("off") => Ok(ConsoleCommand::Auto(false)),
                _ => Err("usage: auto on|off".to_string()),
            },
            "clear" => Ok(ConsoleCommand::Clear),
            "finish" => Ok(ConsoleCommand::Finish),
            "cart" => Ok(ConsoleCommand::Cart),
            "prices" | "p" => Ok(ConsoleCommand::Prices),
            "history" | "h" => Ok(ConsoleCommand::History(index(arg)?)),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
            other => Err(format!("unknown command '{}' (try: help)", other)),
        }
    }
}

pub async fn run_exchange(config: Config, seconds: Option<u64>) -> ExchangeResult<()> {
    let input = spawn_console_reader();
    let exchange = run_session(&config, seconds, input).await?;

    info!("📊 Session Summary:");
    for snap in exchange.snapshot() {
        info!("   {:<12} ₹{}", snap.name, snap.price);
    }
    info!("   🛒 Cart: {} items, total ₹{}", exchange.cart_contents().len(), exchange.total());
    Ok(())
}

/// Run one exchange session fed by `input` and return the final engine state
/// once the console quits, the time limit passes or Ctrl+C arrives.
pub async fn run_session(
    config: &Config,
    seconds: Option<u64>,
    input: mpsc::Receiver<String>,
) -> ExchangeResult<Exchange> {
    let exchange = Exchange::from_config(config)?;
    let runtime = ExchangeRuntime::start(exchange, config.timing.clone());
    let handle = runtime.handle();
    let watcher = tokio::spawn(watch_events(handle.subscribe()));

    info!("🍹 Exchange open with {} items - type 'help' for commands", config.catalog.len());
    show_prices(&handle).await?;

    let session_limit = async {
        match seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => future::pending::<()>().await,
        }
    };

    let outcome = tokio::select! {
        result = console_loop(&handle, input) => result,
        _ = session_limit => {
            info!("⏰ Session time elapsed");
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Received shutdown signal");
            Ok(())
        }
    };

    let exchange = runtime.shutdown().await?;
    watcher.abort();
    outcome?;
    Ok(exchange)
}

/// Blocking stdin reads live on their own detached thread so that leaving
/// the session never waits for the next console line.
fn spawn_console_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(CONSOLE_QUEUE_CAPACITY);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.blocking_send(line).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("⚠️  Console read failed: {}", e);
                    return;
                }
            }
        }
    });
    receiver
}

async fn console_loop(handle: &ExchangeHandle, mut input: mpsc::Receiver<String>) -> ExchangeResult<()> {
    while let Some(line) = input.recv().await {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(msg) => {
                warn!("⚠️  {}", msg);
                continue;
            }
        };

        match command {
            ConsoleCommand::Buy(index) => {
                recoverable(handle.buy(index).await)?;
            }
            ConsoleCommand::Crash => handle.crash().await?,
            ConsoleCommand::Auto(enabled) => handle.set_auto_update(enabled).await?,
            ConsoleCommand::Clear => handle.clear().await?,
            ConsoleCommand::Finish => {
                handle.finish().await?;
            }
            ConsoleCommand::Cart => show_cart(handle).await?,
            ConsoleCommand::Prices => show_prices(handle).await?,
            ConsoleCommand::History(index) => {
                if let Some(history) = recoverable(handle.history_of(index).await)? {
                    info!("📜 History for item {} ({} entries)", index, history.len());
                    for entry in history {
                        info!(
                            "   {} ₹{} {}",
                            entry.timestamp.format("%H:%M:%S"),
                            entry.price,
                            entry.direction.arrow()
                        );
                    }
                }
            }
            ConsoleCommand::Help => show_help(),
            ConsoleCommand::Quit => return Ok(()),
        }
    }

    // stdin closed: keep the market running until time limit or Ctrl+C
    debug!("Console input closed");
    future::pending().await
}

/// Report a rejected command and carry on; session-ending errors propagate
fn recoverable<T>(result: ExchangeResult<T>) -> ExchangeResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if !e.is_fatal() => {
            warn!("⚠️  [{}] {}", e.category(), e.user_message());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn watch_events(mut events: broadcast::Receiver<ExchangeEvent>) {
    loop {
        match events.recv().await {
            Ok(ExchangeEvent::OrderFinished { receipt }) => {
                info!("🎉 Have a Good Day! (order {}, ₹{})", receipt.order_id, receipt.total);
            }
            Ok(event) => debug!("🔔 cue: {:?}", event),
            Err(RecvError::Lagged(missed)) => warn!("⚠️  Missed {} notifications", missed),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn show_prices(handle: &ExchangeHandle) -> ExchangeResult<()> {
    let auto = handle.is_auto_update_enabled().await?;
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ (auto-update {})", if auto { "on" } else { "off" });
    for (index, snap) in handle.snapshot().await?.iter().enumerate() {
        let arrow = snap.direction.map(|d| d.arrow()).unwrap_or(" ");
        let marker = if snap.is_above_base() { "🟢" } else { "🔴" };
        info!("  [{}] {:<12} ₹{:<6} {} {}", index, snap.name, snap.price, arrow, marker);
    }
    Ok(())
}

async fn show_cart(handle: &ExchangeHandle) -> ExchangeResult<()> {
    let cart = handle.cart_contents().await?;
    info!("🛒 Cart ({} items)", cart.len());
    for line in &cart {
        info!("   {:<12} ₹{}", line.name, line.price_at_purchase);
    }
    info!("   Total: ₹{}", handle.total().await?);
    if handle.is_order_finished().await? {
        info!("   ✅ Order finished - 'clear' for the next customer");
    }
    Ok(())
}

fn show_help() {
    info!("Commands:");
    info!("  buy <i>       add item i to the cart at its current price");
    info!("  crash         force every price to the crash floor");
    info!("  auto on|off   toggle scheduled price updates");
    info!("  clear         empty the cart (new customer)");
    info!("  finish        finish the current order");
    info!("  cart          show the cart and total");
    info!("  prices        show current prices");
    info!("  history <i>   show price history of item i");
    info!("  quit          close the exchange");
}
