//! Calendar clock for vocabr
//!
//! Scheduling works on calendar days only. Everything that needs "today" asks a
//! [`Clock`] so tests can pin the date.

use std::sync::{Arc, Mutex};

use chrono::{Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    /// The calendar day the current operation executes on.
    fn today(&self) -> NaiveDate;
}

/// Which timezone decides where one day ends and the next begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    #[default]
    Utc,
    Local,
}

/// Wall-clock date in the configured timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.timezone {
            Timezone::Utc => Utc::now().date_naive(),
            Timezone::Local => Local::now().date_naive(),
        }
    }
}

/// A clock stuck on one date. Used by tests and for replaying reviews.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A clock moved by hand, for simulating several days of reviews.
#[derive(Debug)]
pub struct ManualClock {
    date: Mutex<NaiveDate>,
}

impl ManualClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date: Mutex::new(date) }
    }

    pub fn set(&self, date: NaiveDate) {
        let mut current = self.date.lock().unwrap_or_else(|e| e.into_inner());
        *current = date;
    }

    /// Move forward by `days`, saturating at the last representable date.
    pub fn advance_days(&self, days: u64) {
        let mut current = self.date.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Stored date format (ISO 8601, sorts lexicographically).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date the way it is persisted.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a persisted date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}
