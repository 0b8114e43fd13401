use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent};

use chrono::NaiveDate;

use crate::models::{PrayerTimeSet, ResolvedNextPrayer};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// A fresh evaluation from the next-prayer ticker.
    Tick(Option<ResolvedNextPrayer>),
    /// A background fetch finished. `None` means the provider failed.
    Times {
        date: NaiveDate,
        times: Option<PrayerTimeSet>,
    },
}

/// Merges terminal input and countdown ticks into one queue.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(poll_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();
        let poll = Duration::from_millis(poll_ms);

        thread::spawn(move || loop {
            if event::poll(poll).unwrap_or(false) {
                match event::read() {
                    Ok(CEvent::Key(key)) => {
                        if key_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });

        Self { tx, rx }
    }

    /// Handle for producers outside this module, e.g. the ticker callback.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
