use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::debounce::Debouncer;

/// In-memory draft of all search criteria the user has entered. String
/// fields default to empty, date bounds to absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterRecord {
    pub title: String,
    pub content: String,
    pub news_provider: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Content,
    NewsProvider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    End,
}

impl FilterRecord {
    /// New record with exactly one text field replaced, verbatim.
    pub fn with_text(&self, field: TextField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            TextField::Title => next.title = value,
            TextField::Content => next.content = value,
            TextField::NewsProvider => next.news_provider = value,
        }
        next
    }

    /// New record with one date bound replaced. A calendar day is widened to
    /// the matching day boundary; `None` clears the bound.
    pub fn with_date(&self, field: DateField, day: Option<NaiveDate>) -> Self {
        let mut next = self.clone();
        match field {
            DateField::Start => next.start_date = day.map(start_of_day),
            DateField::End => next.end_date = day.map(end_of_day),
        }
        next
    }
}

/// 00:00:00.000 UTC of the given calendar day.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid wall-clock time")
        .and_utc()
}

/// 23:59:59.999 UTC of the given calendar day.
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid wall-clock time")
        .and_utc()
}

/// Owns the current draft filter and forwards every accepted edit to the
/// search loop through a debounced channel. Edits are visible to `current`
/// immediately; only the notification waits out the quiet period.
#[derive(Debug)]
pub struct FilterStore {
    current: FilterRecord,
    notifier: Debouncer<FilterRecord>,
}

impl FilterStore {
    pub fn new(debounce: Duration, tx: mpsc::Sender<FilterRecord>) -> Self {
        Self {
            current: FilterRecord::default(),
            notifier: Debouncer::new(debounce, tx),
        }
    }

    pub fn current(&self) -> &FilterRecord {
        &self.current
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) -> &FilterRecord {
        let next = self.current.with_text(field, value);
        self.commit(next)
    }

    pub fn set_date(&mut self, field: DateField, day: Option<NaiveDate>) -> &FilterRecord {
        let next = self.current.with_date(field, day);
        self.commit(next)
    }

    // Notifies unconditionally, even when the new value equals the old one;
    // coalescing identical edits is left to the debounce window.
    fn commit(&mut self, next: FilterRecord) -> &FilterRecord {
        self.notifier.trigger(next.clone());
        self.current = next;
        &self.current
    }
}
