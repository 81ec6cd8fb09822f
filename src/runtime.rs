use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the kiosk loop.
#[derive(Clone, Debug)]
pub enum KioskEvent {
    Key(KeyEvent),
    /// A card was presented to the reader; carries the card id.
    Card(String),
    Resize,
    Tick,
}

/// Source of kiosk events (keyboard, card reader, resize).
pub trait KioskEventSource: Send + 'static {
    /// Blocks for up to `timeout` waiting for an event, or Err(Timeout).
    fn recv_timeout(&self, timeout: Duration) -> Result<KioskEvent, RecvTimeoutError>;
}

/// Production source: crossterm input on a reader thread, card ids injected
/// through the returned sender (a reader daemon or a simulator feeds it).
pub struct CrosstermEventSource {
    rx: Receiver<KioskEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> (Self, Sender<String>) {
        let (tx, rx) = mpsc::channel();

        let card_tx = tx.clone();
        let (card_in, card_out) = mpsc::channel::<String>();
        std::thread::spawn(move || {
            while let Ok(id) = card_out.recv() {
                if card_tx.send(KioskEvent::Card(id)).is_err() {
                    break;
                }
            }
        });

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(KioskEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(KioskEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        (Self { rx }, card_in)
    }
}

impl KioskEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KioskEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Event source for unit tests, fed from a plain channel.
pub struct TestEventSource {
    rx: Receiver<KioskEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<KioskEvent>) -> Self {
        Self { rx }
    }
}

impl KioskEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KioskEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the kiosk one event at a time, synthesizing ticks on timeout.
pub struct Runner<E: KioskEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: KioskEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the tick interval; returns the next event or Tick.
    pub fn step(&self) -> KioskEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                KioskEvent::Tick
            }
        }
    }
}
