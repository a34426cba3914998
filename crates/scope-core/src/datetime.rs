use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{
  Datelike,
  Local,
  NaiveDate,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;
use scope_shared::EventRangeQuery;

use crate::error::CalendarError;

pub const TIMEZONE_ENV_VAR: &str =
  "SCOPE_TIMEZONE";

/// Builds a `YYYY-MM-DD` key from plain
/// integers. `month` is 1-based.
///
/// Keys are never derived from a
/// timezone-aware serializer, so a date near
/// midnight keeps its calendar day.
#[must_use]
pub fn format_date_key(
  year: i32,
  month: u32,
  day: u32
) -> String {
  format!("{year:04}-{month:02}-{day:02}")
}

#[must_use]
pub fn date_key(date: NaiveDate) -> String {
  format_date_key(
    date.year(),
    date.month(),
    date.day()
  )
}

fn date_key_regex() -> Option<&'static Regex>
{
  static DATE_KEY_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  DATE_KEY_RE
    .get_or_init(|| {
      Regex::new(
        r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})$"
      )
      .ok()
    })
    .as_ref()
}

/// Parses a strict `YYYY-MM-DD` key into a
/// real calendar day.
pub fn parse_date_key(
  raw: &str
) -> Result<NaiveDate, CalendarError> {
  let invalid = || {
    CalendarError::InvalidDateKey(
      raw.to_string()
    )
  };

  let caps = date_key_regex()
    .and_then(|re| re.captures(raw))
    .ok_or_else(invalid)?;

  let year = caps["year"]
    .parse::<i32>()
    .map_err(|_| invalid())?;
  let month = caps["month"]
    .parse::<u32>()
    .map_err(|_| invalid())?;
  let day = caps["day"]
    .parse::<u32>()
    .map_err(|_| invalid())?;

  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .ok_or_else(invalid)
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
  (year % 4 == 0 && year % 100 != 0)
    || year % 400 == 0
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  match month {
    | 1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
    | 4 | 6 | 9 | 11 => 30,
    | 2 if is_leap_year(year) => 29,
    | 2 => 28,
    | _ => 0
  }
}

/// A displayed calendar month. `month` is
/// 1-based; [`YearMonth::month_index`]
/// gives the 0-11 index.
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
pub struct YearMonth {
  year:  i32,
  month: u32
}

impl YearMonth {
  #[must_use]
  pub fn new(
    year: i32,
    month: u32
  ) -> Option<Self> {
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(|_| Self { year, month })
  }

  #[must_use]
  pub fn of(date: NaiveDate) -> Self {
    Self {
      year:  date.year(),
      month: date.month()
    }
  }

  #[must_use]
  pub fn year(&self) -> i32 {
    self.year
  }

  #[must_use]
  pub fn month(&self) -> u32 {
    self.month
  }

  #[must_use]
  pub fn month_index(&self) -> u32 {
    self.month - 1
  }

  fn ordinal(&self) -> i64 {
    i64::from(self.year) * 12
      + i64::from(self.month_index())
  }

  /// Moves by `months`, wrapping the month
  /// index modulo 12 and rolling the year.
  /// Saturates at the first and last month
  /// chrono can represent.
  #[must_use]
  pub fn shift(
    self,
    months: i32
  ) -> Self {
    let lowest = Self::of(NaiveDate::MIN);
    let highest = Self::of(NaiveDate::MAX);
    let absolute = (self.ordinal()
      + i64::from(months))
    .clamp(lowest.ordinal(), highest.ordinal());
    let year = absolute.div_euclid(12);
    let index = absolute.rem_euclid(12);
    match (
      i32::try_from(year),
      u32::try_from(index)
    ) {
      | (Ok(year), Ok(index)) => Self {
        year,
        month: index + 1
      },
      | _ => self
    }
  }

  #[must_use]
  pub fn succ(self) -> Self {
    self.shift(1)
  }

  #[must_use]
  pub fn pred(self) -> Self {
    self.shift(-1)
  }

  #[must_use]
  pub fn days(&self) -> u32 {
    days_in_month(self.year, self.month)
  }

  #[must_use]
  pub fn first_day(&self) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      self.year, self.month, 1
    )
    .unwrap_or(NaiveDate::MIN)
  }

  #[must_use]
  pub fn last_day(&self) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      self.year,
      self.month,
      self.days()
    )
    .unwrap_or(NaiveDate::MAX)
  }

  #[must_use]
  pub fn day(
    &self,
    day: u32
  ) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
      self.year, self.month, day
    )
  }

  /// The inclusive range requested from
  /// the event source for this month.
  #[must_use]
  pub fn range(&self) -> DateRange {
    DateRange {
      start: self.first_day(),
      end:   self.last_day()
    }
  }
}

impl fmt::Display for YearMonth {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}",
      self.year, self.month
    )
  }
}

impl FromStr for YearMonth {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let (year, month) = s
      .trim()
      .split_once('-')
      .ok_or_else(|| {
        anyhow::anyhow!(
          "expected YYYY-MM, got: {s}"
        )
      })?;
    let year = year.parse::<i32>()?;
    let month = month.parse::<u32>()?;
    Self::new(year, month).ok_or_else(
      || {
        anyhow::anyhow!(
          "month out of range: {s}"
        )
      }
    )
  }
}

/// Inclusive date range sent to the event
/// source as `start`/`end` keys.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl DateRange {
  /// Query parameters for the events
  /// endpoint.
  #[must_use]
  pub fn query(&self) -> EventRangeQuery {
    EventRangeQuery {
      start: self.start_key(),
      end:   self.end_key()
    }
  }

  #[must_use]
  pub fn start_key(&self) -> String {
    date_key(self.start)
  }

  #[must_use]
  pub fn end_key(&self) -> String {
    date_key(self.end)
  }

  #[must_use]
  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    self.start <= date && date <= self.end
  }
}

/// Source of the real current date.
pub trait Clock {
  fn today(&self) -> NaiveDate;
}

/// Reads the wall clock, optionally pinned
/// to a named timezone instead of the host
/// zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
  timezone: Option<Tz>
}

impl SystemClock {
  #[must_use]
  pub fn new(
    timezone: Option<Tz>
  ) -> Self {
    Self { timezone }
  }

  #[must_use]
  pub fn timezone(&self) -> Option<Tz> {
    self.timezone
  }
}

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    match self.timezone {
      | Some(tz) => {
        Utc::now()
          .with_timezone(&tz)
          .date_naive()
      }
      | None => Local::now().date_naive()
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    self.0
  }
}

/// Picks the timezone for "today":
/// `SCOPE_TIMEZONE` first, then the
/// configured value. `None` means host
/// local time.
#[must_use]
pub fn resolve_timezone(
  configured: Option<&str>
) -> Option<Tz> {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) =
      parse_timezone(&raw, TIMEZONE_ENV_VAR)
  {
    return Some(tz);
  }

  configured.and_then(|raw| {
    parse_timezone(raw, "scope.toml")
  })
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "resolved timezone"
      );
      Some(tz)
    }
    | Err(error) => {
      tracing::warn!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id; using host local time"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_keys_round_trip_every_day_of_leap_and_common_years()
   {
    for year in [2023, 2024] {
      for month in 1..=12 {
        for day in
          1..=days_in_month(year, month)
        {
          let key = format_date_key(
            year, month, day
          );
          let parsed =
            parse_date_key(&key)
              .expect("valid key");
          assert_eq!(
            (
              parsed.year(),
              parsed.month(),
              parsed.day()
            ),
            (year, month, day)
          );
        }
      }
    }
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(2023, 2), 28);
  }

  #[test]
  fn date_key_is_zero_padded() {
    assert_eq!(
      format_date_key(2024, 3, 5),
      "2024-03-05"
    );
  }

  #[test]
  fn rejects_malformed_date_keys() {
    for raw in [
      "",
      "2024-3-05",
      "2024-02-30",
      "2023-02-29",
      "2024-13-01",
      "20240315",
      " 2024-03-15",
      "2024-03-15T00:00:00"
    ] {
      assert_eq!(
        parse_date_key(raw),
        Err(CalendarError::InvalidDateKey(
          raw.to_string()
        )),
        "{raw:?} should be rejected"
      );
    }
  }

  #[test]
  fn month_shift_wraps_year() {
    let jan = YearMonth::new(2024, 1)
      .expect("valid month");
    assert_eq!(
      jan.pred(),
      YearMonth::new(2023, 12)
        .expect("valid month")
    );
    let dec = YearMonth::new(2024, 12)
      .expect("valid month");
    assert_eq!(
      dec.succ(),
      YearMonth::new(2025, 1)
        .expect("valid month")
    );
    assert_eq!(jan.shift(-25).to_string(), "2021-12");
  }

  #[test]
  fn month_range_spans_whole_month() {
    let feb = YearMonth::new(2024, 2)
      .expect("valid month");
    let range = feb.range();
    assert_eq!(range.start_key(), "2024-02-01");
    assert_eq!(range.end_key(), "2024-02-29");
  }

  #[test]
  fn parses_year_month_argument() {
    let parsed = "2024-03"
      .parse::<YearMonth>()
      .expect("parse month");
    assert_eq!(parsed.month_index(), 2);
    assert!("2024-00"
      .parse::<YearMonth>()
      .is_err());
    assert!("March".parse::<YearMonth>().is_err());
  }

  #[test]
  fn rejects_years_chrono_cannot_represent() {
    let err = "300000-01"
      .parse::<YearMonth>()
      .expect_err("year out of range");
    assert!(
      err.to_string().contains("300000-01")
    );
    assert_eq!(YearMonth::new(300_000, 1), None);
  }

  #[test]
  fn month_shift_saturates_at_calendar_limits() {
    let last = YearMonth::of(NaiveDate::MAX);
    assert_eq!(last.succ(), last);
    assert_eq!(last.shift(i32::MAX), last);
    let first = YearMonth::of(NaiveDate::MIN);
    assert_eq!(first.pred(), first);

    let range = last.succ().range();
    assert!(range.start <= range.end);
    assert_eq!(range.end, NaiveDate::MAX);
  }

  #[test]
  fn range_query_uses_date_keys() {
    let query = YearMonth::new(2024, 2)
      .expect("valid month")
      .range()
      .query();
    assert_eq!(query.start, "2024-02-01");
    assert_eq!(query.end, "2024-02-29");
  }
}
