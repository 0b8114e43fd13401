//! A cancelable periodic task that keeps the next-prayer countdown fresh.
//!
//! The worker thread owns the current `PrayerTimeSet`. Every period it samples
//! the clock, runs [`resolve`] and replaces the published result in full.
//! New times arrive over a channel and are picked up right away.
//!
//! Results are published to an internal channel read with
//! [`NextPrayerTicker::recv_timeout`] / [`NextPrayerTicker::try_recv`], or
//! handed to a callback when started with [`NextPrayerTicker::spawn_with_callback`].

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::models::{PrayerTimeSet, ResolvedNextPrayer};
use crate::prayer_times::clock::Clock;
use crate::prayer_times::resolver::resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    AwaitingData,
    Resolved,
}

impl TickerState {
    pub fn label(self) -> &'static str {
        match self {
            TickerState::AwaitingData => "awaiting prayer times",
            TickerState::Resolved => "live",
        }
    }
}

enum Command {
    SetTimes(Option<PrayerTimeSet>),
    Stop,
}

pub struct NextPrayerTicker {
    commands: mpsc::Sender<Command>,
    published: mpsc::Receiver<Option<ResolvedNextPrayer>>,
    latest: Arc<Mutex<Option<ResolvedNextPrayer>>>,
    handle: Option<JoinHandle<()>>,
}

impl NextPrayerTicker {
    /// Start ticking with no times yet. The first evaluation happens
    /// immediately and every result lands in the receive queue.
    pub fn spawn(clock: Arc<dyn Clock>, period: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self::start(clock, period, rx, move |r| {
            let _ = tx.send(r);
        })
    }

    /// Like [`spawn`](Self::spawn), but every result goes to `on_tick`
    /// instead. The receive methods then report a disconnected queue.
    pub fn spawn_with_callback<F>(clock: Arc<dyn Clock>, period: Duration, on_tick: F) -> Self
    where
        F: FnMut(Option<ResolvedNextPrayer>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        drop(tx);
        Self::start(clock, period, rx, on_tick)
    }

    fn start<F>(
        clock: Arc<dyn Clock>,
        period: Duration,
        published: mpsc::Receiver<Option<ResolvedNextPrayer>>,
        on_tick: F,
    ) -> Self
    where
        F: FnMut(Option<ResolvedNextPrayer>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let latest = Arc::new(Mutex::new(None));
        let worker = Worker {
            clock,
            period,
            times: None,
            latest: Arc::clone(&latest),
            on_tick: Box::new(on_tick),
        };

        let handle = thread::spawn(move || worker.run(rx));

        Self {
            commands: tx,
            published,
            latest,
            handle: Some(handle),
        }
    }

    /// Replace the input. Last writer wins.
    pub fn set_times(&self, times: Option<PrayerTimeSet>) {
        if self.commands.send(Command::SetTimes(times)).is_err() {
            log::debug!("ticker already stopped, dropping new times");
        }
    }

    pub fn latest(&self) -> Option<ResolvedNextPrayer> {
        *self.latest.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn state(&self) -> TickerState {
        match self.latest() {
            Some(_) => TickerState::Resolved,
            None => TickerState::AwaitingData,
        }
    }

    /// Wait up to `timeout` for the next published evaluation.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<ResolvedNextPrayer>, RecvTimeoutError> {
        self.published.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<Option<ResolvedNextPrayer>, TryRecvError> {
        self.published.try_recv()
    }

    /// Cancel the task and wait for the worker to exit. Safe to call twice.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.commands.send(Command::Stop);
        if handle.join().is_err() {
            log::warn!("next-prayer ticker thread panicked");
        }
    }
}

impl Drop for NextPrayerTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    clock: Arc<dyn Clock>,
    period: Duration,
    times: Option<PrayerTimeSet>,
    latest: Arc<Mutex<Option<ResolvedNextPrayer>>>,
    on_tick: Box<dyn FnMut(Option<ResolvedNextPrayer>) + Send>,
}

impl Worker {
    fn run(mut self, commands: mpsc::Receiver<Command>) {
        self.evaluate();
        let mut next_tick = Instant::now() + self.period;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());

            match commands.recv_timeout(timeout) {
                Ok(Command::SetTimes(times)) => {
                    self.times = times;
                    self.evaluate();
                }
                Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.evaluate();
                    next_tick += self.period;
                    // Fell behind (suspend, slow consumer): restart the cadence
                    let now = Instant::now();
                    if next_tick <= now {
                        next_tick = now + self.period;
                    }
                }
            }
        }
        log::debug!("next-prayer ticker stopped");
    }

    fn evaluate(&mut self) {
        let result = resolve(self.times.as_ref(), self.clock.now());
        log::trace!("tick: {:?}", result);
        *self.latest.lock().unwrap_or_else(|p| p.into_inner()) = result;
        (self.on_tick)(result);
    }
}
