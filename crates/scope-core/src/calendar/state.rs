use chrono::NaiveDate;

use super::event::CalendarEvent;
use crate::datetime::{
  DateRange,
  YearMonth
};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
  pub displayed: YearMonth,
  /// `None` shows today's agenda.
  pub selected:  Option<NaiveDate>,
  /// Always belongs to `displayed`; cleared
  /// whenever the displayed month changes.
  pub events:    Vec<CalendarEvent>
}

impl ViewState {
  #[must_use]
  pub fn new(displayed: YearMonth) -> Self {
    Self {
      displayed,
      selected: None,
      events: Vec::new()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct RequestToken(pub u64);

/// A fetch the caller must run against the
/// event source and hand back through
/// `complete_fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
  pub token: RequestToken,
  pub month: YearMonth,
  pub range: DateRange
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum FetchOutcome {
  Applied { events: usize },
  /// The fetch failed; the month renders
  /// with no events.
  Degraded,
  /// A newer navigation superseded this
  /// request; its result was dropped.
  Stale
}
