use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

use crate::config::TimesSource;
use crate::models::Amenity;

#[derive(Parser, Debug)]
#[command(name = "musalla", version, author, about = "Find a place to pray and count down to the next prayer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save your location and calculation preferences
    Setup(SetupArgs),
    /// Show today's prayer times and countdown to next prayer
    Times {
        /// Show times for another day
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Where to get the times from (overrides config)
        #[arg(long, value_enum)]
        source: Option<TimesSource>,
    },
    /// Print the next prayer and time remaining
    Next {
        /// Pretend it is this local time, e.g. "2024-06-14T17:00:00"
        #[arg(long)]
        at: Option<NaiveDateTime>,
        /// Keep printing the countdown on every tick
        #[arg(long, short)]
        watch: bool,
        #[arg(long, value_enum)]
        source: Option<TimesSource>,
    },
    /// Live countdown to the next prayer
    Countdown {
        #[arg(long, value_enum)]
        source: Option<TimesSource>,
    },
    /// List prayer spaces near you
    Spaces(SpaceFilterArgs),
    /// Check a new home prayer space before submitting it
    Register(RegisterArgs),
    /// List calculation methods
    Methods,
}

#[derive(Args, Debug)]
pub struct SetupArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,
    /// Display name for the location
    #[arg(long)]
    pub name: Option<String>,
    /// Offline calculation method (see `musalla methods`)
    #[arg(long)]
    pub method: Option<String>,
    /// Hanafi or Shafi
    #[arg(long)]
    pub madhab: Option<String>,
    /// UTC offset such as "+5:30", "-5" or "5.5", or "local" for the system timezone
    #[arg(long, allow_hyphen_values = true)]
    pub tz_offset: Option<String>,
    #[arg(long, value_enum)]
    pub source: Option<TimesSource>,
    /// Al-Adhan method name, or part of one
    #[arg(long)]
    pub aladhan_method: Option<String>,
}

#[derive(Args, Debug)]
pub struct SpaceFilterArgs {
    /// Hide masjids
    #[arg(long)]
    pub no_masjid: bool,
    /// Hide homes
    #[arg(long)]
    pub no_home: bool,
    /// Only spaces with a wudu area
    #[arg(long)]
    pub wudu: bool,
    /// Only spaces with a sisters' area
    #[arg(long)]
    pub sisters: bool,
    #[arg(long)]
    pub parking: bool,
    #[arg(long)]
    pub wheelchair: bool,
    /// Only places holding Jummah
    #[arg(long)]
    pub jummah: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value_t = 1)]
    pub capacity: u32,
    /// When the space is available, e.g. "Dhuhr & Asr"
    #[arg(long, default_value = "")]
    pub hours: String,
    #[arg(long, default_value = "")]
    pub street: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub zip: String,
    /// Repeatable: wudu, sisters, parking, wheelchair
    #[arg(long = "amenity")]
    pub amenities: Vec<Amenity>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Agree to the host terms
    #[arg(long)]
    pub consent: bool,
}
