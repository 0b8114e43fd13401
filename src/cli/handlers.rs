use std::io::{self, Write};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use unicode_width::UnicodeWidthStr;

use crate::cli::args::{RegisterArgs, SetupArgs, SpaceFilterArgs};
use crate::config::{AppConfig, TimesSource};
use crate::models::{PrayerName, ResolvedNextPrayer, SpaceKind};
use crate::prayer_times::calculator::{CALC_METHODS, MADHABS};
use crate::prayer_times::{
    aladhan, provider_from_config, resolve, times_or_absent, Clock, FixedClock, NextPrayerTicker,
    PrayerCalculator, SystemClock,
};
use crate::spaces::{nearest, sample_spaces, SpaceFilters, SpaceRegistration};
use crate::utils::format::{format_countdown, format_duration_secs, format_time_12h, pad_display};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup(config: &mut AppConfig, args: &SetupArgs) -> Result<()> {
    if !(-90.0..=90.0).contains(&args.lat) {
        return Err(anyhow!("Latitude must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&args.lng) {
        return Err(anyhow!("Longitude must be between -180 and 180"));
    }

    config.location.latitude = args.lat;
    config.location.longitude = args.lng;
    if let Some(name) = &args.name {
        config.location.name = name.clone();
    }
    if let Some(tz) = &args.tz_offset {
        config.location.timezone_offset = if tz.eq_ignore_ascii_case("local") {
            None
        } else {
            Some(parse_tz_offset(tz).with_context(|| format!("Bad UTC offset '{}'", tz))?)
        };
    }
    if let Some(method) = &args.method {
        config.prayer.calc_method = method.clone();
    }
    if let Some(madhab) = &args.madhab {
        config.prayer.madhab = madhab.clone();
    }
    if let Some(source) = args.source {
        config.prayer.source = source;
    }
    if let Some(m) = &args.aladhan_method {
        config.prayer.aladhan_method = m.clone();
    }

    // Fails on an unknown method/madhab before anything is written
    PrayerCalculator::new(
        config.location.latitude,
        config.location.longitude,
        &config.prayer.calc_method,
        &config.prayer.madhab,
        config.location.timezone_offset,
    )?;

    let path = config.save()?;
    println_colored!(GREEN, "  ✓ Saved to {}", path.display());
    let zone = match config.location.timezone_offset {
        Some(minutes) => format!("UTC{}", format_tz_offset(minutes)),
        None => "system timezone".to_string(),
    };
    println!(
        "  {} ({:.4}, {:.4})  {}",
        config.location.name, config.location.latitude, config.location.longitude, zone
    );
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    config: &AppConfig,
    date: Option<NaiveDate>,
    source: Option<TimesSource>,
) -> Result<()> {
    let now = Local::now().naive_local();
    let date = date.unwrap_or(now.date());
    let provider = provider_from_config(config, source)?;
    let times = provider
        .times_for_date(date)
        .context("Could not load prayer times")?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.location.name,
        date.format("%Y-%m-%d")
    );
    println!();

    let is_today = date == now.date();
    let next = if is_today { resolve(Some(&times), now) } else { None };

    for (name, time) in times.entries() {
        let label = format_time_12h(time);
        let is_next = next.map(|n| n.name == name && date.and_time(time) > now).unwrap_or(false);
        if is_next {
            println_colored!(AMBER, "  {:<10}  {:>8}  ◂ next", name.display_name(), label);
        } else if is_today && date.and_time(time) <= now {
            println_colored!(DIM, "  {:<10}  {:>8}", name.display_name(), label);
        } else {
            println_colored!(BOLD, "  {:<10}  {:>8}", name.display_name(), label);
        }
    }

    if let Some(next) = next {
        println!();
        println_colored!(
            AMBER,
            "  Next: {} in {}  ({})",
            next.name.display_name(),
            format_countdown(next.seconds_remaining),
            format_duration_secs(next.seconds_remaining)
        );
    }
    println!();
    Ok(())
}

pub fn handle_next(
    config: &AppConfig,
    at: Option<NaiveDateTime>,
    watch: bool,
    source: Option<TimesSource>,
) -> Result<()> {
    let clock: Arc<dyn Clock> = match at {
        Some(at) => Arc::new(FixedClock::new(at)),
        None => Arc::new(SystemClock),
    };
    let now = clock.now();
    let provider = provider_from_config(config, source)?;
    let times = times_or_absent(provider.as_ref(), now.date());

    if !watch {
        match resolve(times.as_ref(), now) {
            Some(next) => println!("{}", next_line(&next)),
            None => println_colored!(RED, "  Could not load prayer times."),
        }
        return Ok(());
    }

    let period = Duration::from_millis(config.countdown.tick_ms.max(1));
    let ticker = NextPrayerTicker::spawn(Arc::clone(&clock), period);
    ticker.set_times(times);
    let mut date = now.date();
    let mut stdout = io::stdout();

    // Runs until interrupted
    loop {
        match ticker.recv_timeout(period * 5) {
            Ok(Some(next)) => print!("\r\x1b[2K{}", next_line(&next)),
            Ok(None) => print!("\r\x1b[2K{}Waiting for prayer times...\x1b[0m", DIM),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
        stdout.flush()?;

        let today = clock.now().date();
        if today != date {
            date = today;
            ticker.set_times(times_or_absent(provider.as_ref(), today));
        }
    }
    println!();
    Ok(())
}

fn next_line(next: &ResolvedNextPrayer) -> String {
    format!(
        "{} in {}",
        next.name.display_name(),
        format_countdown(next.seconds_remaining)
    )
}

// ─── Spaces ──────────────────────────────────────────────────────────────────

impl From<&SpaceFilterArgs> for SpaceFilters {
    fn from(a: &SpaceFilterArgs) -> Self {
        SpaceFilters {
            masjid: !a.no_masjid,
            home: !a.no_home,
            wudu: a.wudu,
            sisters: a.sisters,
            parking: a.parking,
            wheelchair: a.wheelchair,
            jummah: a.jummah,
        }
    }
}

pub fn handle_spaces(config: &AppConfig, args: &SpaceFilterArgs) -> Result<()> {
    let filters = SpaceFilters::from(args);
    let spaces = sample_spaces();
    let matching = filters.apply(&spaces);
    let here = config.location.position();

    println!();
    println_colored!(GOLD, "  Prayer spaces near {}", config.location.name);
    println!();

    if matching.is_empty() {
        println_colored!(DIM, "  No spaces match these filters.");
        println!();
        return Ok(());
    }

    let width = matching.iter().map(|s| s.name.width()).max().unwrap_or(0) + 2;
    for (space, km) in nearest(&matching, &here) {
        let detail = match &space.kind {
            SpaceKind::Masjid => String::new(),
            SpaceKind::Home { capacity, hours } => format!("  fits {}, {}", capacity, hours),
        };
        println!(
            "  {}{:<7}{:>6.1} km{}",
            pad_display(&space.name, width),
            space.kind_label(),
            km,
            detail
        );
        if !space.amenities.is_empty() {
            let amenities: Vec<_> = space.amenities.iter().map(|a| a.label()).collect();
            println_colored!(DIM, "    {}", amenities.join(" · "));
        }
    }
    println!();
    Ok(())
}

// ─── Register ────────────────────────────────────────────────────────────────

pub fn handle_register(args: RegisterArgs) -> Result<()> {
    let reg = SpaceRegistration {
        name: args.name,
        capacity: args.capacity,
        available_hours: args.hours,
        street: args.street,
        city: args.city,
        state: args.state,
        zip: args.zip,
        amenities: args.amenities,
        notes: args.notes,
        consent: args.consent,
    };

    match reg.validate() {
        Ok(()) => {
            println_colored!(GREEN, "  ✓ {} looks good", reg.name);
            println!("{}", serde_json::to_string_pretty(&reg)?);
            Ok(())
        }
        Err(err) => {
            for e in &err.0 {
                println_colored!(RED, "  ✗ {:<16} {}", e.field, e.message);
            }
            Err(err.into())
        }
    }
}

// ─── Methods ─────────────────────────────────────────────────────────────────

pub fn handle_methods() -> Result<()> {
    println!();
    println_colored!(GOLD, "  Offline (--method)");
    for m in CALC_METHODS {
        println!("  {}", m);
    }
    println_colored!(DIM, "  Madhabs: {}", MADHABS.join(", "));
    println!();
    println_colored!(GOLD, "  Al-Adhan (--aladhan-method)");
    for (name, id) in aladhan::METHODS {
        println!("  {:>2}  {}", id, name);
    }
    println!();
    println_colored!(
        DIM,
        "  Countdown skips {}; it is shown but is not a prayer.",
        PrayerName::Sunrise
    );
    println!();
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Parse a UTC offset string into total minutes.
/// Accepts: "5:30", "+5:30", "-5:30", "5", "+5", "5.5"
fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim().trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if s.contains(':') {
        let mut parts = s.splitn(2, ':');
        let hours: i32 = parts.next().unwrap_or("0").parse()?;
        let mins: i32 = parts.next().unwrap_or("0").parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    if minutes >= 24 * 60 {
        return Err(anyhow!("offset must be less than 24 hours"));
    }
    Ok(sign * minutes)
}

/// Format total minutes as "+H:MM" string
fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let h = abs / 60;
    let m = abs % 60;
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}
