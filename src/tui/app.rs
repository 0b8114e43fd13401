use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    DefaultTerminal, Frame,
};

use crate::config::{AppConfig, TimesSource};
use crate::models::{PrayerTimeSet, ResolvedNextPrayer};
use crate::prayer_times::{
    provider_from_config, times_or_absent, NextPrayerTicker, SystemClock, TickerState,
    TimesProvider,
};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, next_prayer, prayers, statusbar};

pub struct App {
    pub config: AppConfig,
    pub date: NaiveDate,
    pub times: Option<PrayerTimeSet>,
    pub next: Option<ResolvedNextPrayer>,
    pub ticker_state: TickerState,
    pub loading: bool,
    pub should_quit: bool,
    reload_requested: bool,
}

impl App {
    pub fn new(config: AppConfig, date: NaiveDate, times: Option<PrayerTimeSet>) -> Self {
        App {
            config,
            date,
            times,
            next: None,
            ticker_state: TickerState::AwaitingData,
            loading: false,
            should_quit: false,
            reload_requested: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle actual key presses, ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.reload_requested = true,
            _ => {}
        }
    }

    /// A tick carries the full replacement for the countdown.
    pub fn on_tick(&mut self, next: Option<ResolvedNextPrayer>) {
        self.next = next;
    }

    /// Decide whether a fetch should start: the day rolled over or a reload
    /// was asked for, and none is in flight. Returns the date to fetch.
    fn due_refresh(&mut self, today: NaiveDate) -> Option<NaiveDate> {
        if self.loading || (today == self.date && !self.reload_requested) {
            return None;
        }
        self.reload_requested = false;
        self.loading = true;
        self.date = today;
        Some(today)
    }

    /// Take the result of a background fetch. Returns the new set when the
    /// ticker needs to hear about it; results for another day are dropped.
    fn on_times(
        &mut self,
        date: NaiveDate,
        times: Option<PrayerTimeSet>,
    ) -> Option<Option<PrayerTimeSet>> {
        self.loading = false;
        if date != self.date {
            log::debug!("dropping stale prayer times for {}", date);
            return None;
        }
        self.times = times;
        Some(self.times.clone())
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer[0], &self.config.location.name, self.date);
        statusbar::render(frame, outer[2], self.ticker_state, self.loading);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(outer[1]);

        let now = Local::now().time();
        prayers::render(frame, columns[0], self.times.as_ref(), self.next.as_ref(), now);
        next_prayer::render(frame, columns[1], self.next.as_ref());
    }
}

/// Fetch a day's times off the UI thread and post them back as an event.
fn spawn_fetch(provider: Arc<dyn TimesProvider>, date: NaiveDate, tx: Sender<Event>) {
    thread::spawn(move || {
        let times = times_or_absent(provider.as_ref(), date);
        let _ = tx.send(Event::Times { date, times });
    });
}

/// Run the countdown dashboard until the user quits.
pub fn run(config: AppConfig, source: Option<TimesSource>) -> Result<()> {
    let provider: Arc<dyn TimesProvider> = Arc::from(provider_from_config(&config, source)?);
    let today = Local::now().date_naive();
    // First load happens before the terminal is taken over
    let times = times_or_absent(provider.as_ref(), today);
    let period = Duration::from_millis(config.countdown.tick_ms.max(1));

    let events = EventHandler::new(250);
    let tick_tx = events.sender();
    let mut ticker = NextPrayerTicker::spawn_with_callback(Arc::new(SystemClock), period, move |r| {
        let _ = tick_tx.send(Event::Tick(r));
    });
    ticker.set_times(times.clone());

    let mut app = App::new(config, today, times);
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &events, &ticker, provider);

    ticker.stop();
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    events: &EventHandler,
    ticker: &NextPrayerTicker,
    provider: Arc<dyn TimesProvider>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key);
                if app.should_quit {
                    return Ok(());
                }
            }
            Event::Tick(next) => app.on_tick(next),
            Event::Times { date, times } => {
                if let Some(times) = app.on_times(date, times) {
                    log::info!("prayer times refreshed for {}", date);
                    ticker.set_times(times);
                }
            }
        }
        app.ticker_state = ticker.state();

        if let Some(date) = app.due_refresh(Local::now().date_naive()) {
            spawn_fetch(Arc::clone(&provider), date, events.sender());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use anyhow::anyhow;
    use crossterm::event::KeyModifiers;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::mpsc::{self, TryRecvError};
    use std::sync::Mutex;

    fn sample_times() -> PrayerTimeSet {
        PrayerTimeSet::parse("05:30", "06:45", "12:15", "15:45", "18:20", "19:45").unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    /// Blocks every fetch until the test lets it through.
    struct GatedProvider {
        gate: Mutex<mpsc::Receiver<()>>,
        calls: AtomicU32,
        fail: bool,
    }

    impl TimesProvider for GatedProvider {
        fn times_for_date(&self, _date: NaiveDate) -> Result<PrayerTimeSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.lock().unwrap().recv();
            if self.fail {
                return Err(anyhow!("offline"));
            }
            Ok(sample_times())
        }
    }

    fn gated(fail: bool) -> (Arc<GatedProvider>, mpsc::Sender<()>) {
        let (open, gate) = mpsc::channel();
        let provider = GatedProvider {
            gate: Mutex::new(gate),
            calls: AtomicU32::new(0),
            fail,
        };
        (Arc::new(provider), open)
    }

    #[test]
    fn quits_on_esc_or_q() {
        let mut app = App::new(AppConfig::default(), day(14), None);
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!app.should_quit);
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn refresh_due_only_on_new_day_or_reload() {
        let mut app = App::new(AppConfig::default(), day(14), None);
        assert_eq!(app.due_refresh(day(14)), None);

        assert_eq!(app.due_refresh(day(15)), Some(day(15)));
        assert_eq!(app.date, day(15));
        assert!(app.loading);

        // One fetch at a time, even if a reload is asked for meanwhile
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        assert_eq!(app.due_refresh(day(15)), None);

        assert!(app.on_times(day(15), Some(sample_times())).is_some());
        assert!(!app.loading);
        assert_eq!(app.due_refresh(day(15)), Some(day(15)));
        app.on_times(day(15), None);
        assert_eq!(app.due_refresh(day(15)), None);
    }

    #[test]
    fn failed_reload_clears_times() {
        let mut app = App::new(AppConfig::default(), day(14), Some(sample_times()));
        app.due_refresh(day(15));
        assert_eq!(app.on_times(day(15), None), Some(None));
        assert_eq!(app.times, None);
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut app = App::new(AppConfig::default(), day(15), Some(sample_times()));
        app.loading = true;
        assert_eq!(app.on_times(day(14), None), None);
        assert_eq!(app.times, Some(sample_times()));
        assert!(!app.loading);
    }

    #[test]
    fn fetch_runs_off_the_calling_thread() {
        let (provider, open) = gated(false);
        let (tx, rx) = mpsc::channel();

        // Returns while the provider is still blocked
        spawn_fetch(provider.clone(), day(15), tx);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        open.send(()).unwrap();
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            Event::Times { date, times } => {
                assert_eq!(date, day(15));
                assert_eq!(times, Some(sample_times()));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_fetch_posts_absent_times() {
        let (provider, open) = gated(true);
        let (tx, rx) = mpsc::channel();
        open.send(()).unwrap();
        spawn_fetch(provider, day(15), tx);

        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            Event::Times { times, .. } => assert_eq!(times, None),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn tick_replaces_countdown() {
        let mut app = App::new(AppConfig::default(), day(14), None);
        let next = ResolvedNextPrayer {
            name: PrayerName::Asr,
            seconds_remaining: 10,
        };
        app.on_tick(Some(next));
        assert_eq!(app.next, Some(next));
        app.on_tick(None);
        assert_eq!(app.next, None);
    }
}
