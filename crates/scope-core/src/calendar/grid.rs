use std::collections::BTreeMap;

use chrono::{
  Datelike,
  NaiveDate
};

use super::event::CalendarEvent;
use crate::datetime::{
  YearMonth,
  date_key
};

pub const DEFAULT_MARKER_LIMIT: usize = 3;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum CellKind {
  /// Tail of the previous month.
  Leading,
  Current,
  /// Head of the next month.
  Trailing
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMarker {
  pub color:     String,
  pub completed: bool
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
  pub date:        NaiveDate,
  pub day:         u32,
  pub kind:        CellKind,
  pub is_today:    bool,
  pub is_selected: bool,
  pub markers:     Vec<EventMarker>,
  /// Events on this day beyond the marker
  /// limit.
  pub overflow:    usize
}

impl DayCell {
  fn adjacent(
    date: NaiveDate,
    kind: CellKind
  ) -> Self {
    Self {
      date,
      day: date.day(),
      kind,
      is_today: false,
      is_selected: false,
      markers: Vec::new(),
      overflow: 0
    }
  }

  /// Only days of the displayed month take
  /// part in selection and markers.
  #[must_use]
  pub fn is_selectable(&self) -> bool {
    self.kind == CellKind::Current
  }

  #[must_use]
  pub fn date_key(&self) -> String {
    date_key(self.date)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  pub month:    YearMonth,
  pub leading:  usize,
  pub trailing: usize,
  pub cells:    Vec<DayCell>
}

impl MonthGrid {
  #[must_use]
  pub fn rows(&self) -> usize {
    self.cells.len() / 7
  }

  pub fn weeks(
    &self
  ) -> impl Iterator<Item = &[DayCell]> {
    self.cells.chunks(7)
  }

  #[must_use]
  pub fn body(&self) -> &[DayCell] {
    let end = self
      .cells
      .len()
      .saturating_sub(self.trailing);
    &self.cells[self.leading..end]
  }
}

/// Weekday of the 1st, re-indexed so
/// Monday = 0 ... Sunday = 6.
#[must_use]
pub fn leading_days(
  month: YearMonth
) -> usize {
  month
    .first_day()
    .weekday()
    .num_days_from_monday() as usize
}

/// `ceil((leading + days) / 7) * 7`.
#[must_use]
pub fn total_cells(
  month: YearMonth
) -> usize {
  let used =
    leading_days(month) + month.days() as usize;
  used.div_ceil(7) * 7
}

/// Lays out the Monday-first month grid.
///
/// Leading cells show the last days of the
/// previous month, trailing cells the first
/// days of the next one, so the total is a
/// whole number of weeks. Only cells of
/// `month` carry today/selection flags and
/// event markers; at most `marker_limit`
/// markers are kept per day, in event order.
#[must_use]
pub fn build_month_grid(
  month: YearMonth,
  today: NaiveDate,
  selected: Option<NaiveDate>,
  events: &[CalendarEvent],
  marker_limit: usize
) -> MonthGrid {
  let leading = leading_days(month);
  let days = month.days();
  let trailing = total_cells(month)
    - leading
    - days as usize;

  let mut by_day: BTreeMap<
    NaiveDate,
    Vec<&CalendarEvent>
  > = BTreeMap::new();
  for event in events {
    by_day
      .entry(event.start)
      .or_default()
      .push(event);
  }

  let mut cells = Vec::with_capacity(
    leading + days as usize + trailing
  );

  let previous = month.pred();
  let previous_days = previous.days();
  let first_leading =
    previous_days + 1 - leading as u32;
  cells.extend(
    (first_leading..=previous_days)
      .filter_map(|day| previous.day(day))
      .map(|date| {
        DayCell::adjacent(
          date,
          CellKind::Leading
        )
      })
  );

  for date in
    (1..=days).filter_map(|day| month.day(day))
  {
    let day_events = by_day
      .get(&date)
      .map(Vec::as_slice)
      .unwrap_or_default();
    let markers = day_events
      .iter()
      .take(marker_limit)
      .map(|event| {
        EventMarker {
          color:     event.color.clone(),
          completed: event.completed
        }
      })
      .collect::<Vec<_>>();

    cells.push(DayCell {
      date,
      day: date.day(),
      kind: CellKind::Current,
      is_today: date == today,
      is_selected: selected == Some(date),
      overflow: day_events
        .len()
        .saturating_sub(markers.len()),
      markers
    });
  }

  let next = month.succ();
  cells.extend(
    (1..=trailing as u32)
      .filter_map(|day| next.day(day))
      .map(|date| {
        DayCell::adjacent(
          date,
          CellKind::Trailing
        )
      })
  );

  MonthGrid {
    month,
    leading,
    trailing,
    cells
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month)
      .expect("valid month")
  }

  fn ymd(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
      .expect("valid date")
  }

  fn event_on(
    date: NaiveDate,
    title: &str
  ) -> CalendarEvent {
    CalendarEvent::new(
      date,
      title,
      "/tasks/1/",
      "#3B82F6",
      false
    )
  }

  #[test]
  fn march_2024_fills_exactly_five_weeks() {
    let grid = build_month_grid(
      ym(2024, 3),
      ymd(2000, 1, 1),
      None,
      &[],
      DEFAULT_MARKER_LIMIT
    );

    assert_eq!(grid.leading, 4);
    assert_eq!(grid.body().len(), 31);
    assert_eq!(grid.trailing, 0);
    assert_eq!(grid.cells.len(), 35);
    assert_eq!(grid.rows(), 5);
    let leading_days = grid.cells[..4]
      .iter()
      .map(|cell| cell.day)
      .collect::<Vec<_>>();
    assert_eq!(leading_days, vec![
      26, 27, 28, 29
    ]);
  }

  #[test]
  fn every_month_is_whole_weeks() {
    for year in 1999..=2031 {
      for month in 1..=12 {
        let month = ym(year, month);
        let grid = build_month_grid(
          month,
          ymd(2000, 1, 1),
          None,
          &[],
          DEFAULT_MARKER_LIMIT
        );
        assert_eq!(grid.cells.len() % 7, 0);
        assert_eq!(
          grid.leading
            + grid.body().len()
            + grid.trailing,
          grid.rows() * 7
        );
        assert!(grid.leading < 7);
        assert!(grid.trailing < 7);
        assert_eq!(
          grid.weeks().count(),
          grid.rows()
        );
        assert_eq!(
          grid.cells[grid.leading].date,
          month.first_day()
        );
      }
    }
  }

  #[test]
  fn month_starting_monday_has_no_leading_cells()
   {
    // 2024-01-01 is a Monday.
    let grid = build_month_grid(
      ym(2024, 1),
      ymd(2000, 1, 1),
      None,
      &[],
      DEFAULT_MARKER_LIMIT
    );
    assert_eq!(grid.leading, 0);
    assert_eq!(grid.trailing, 4);
    assert_eq!(
      grid
        .cells
        .last()
        .map(|cell| cell.date),
      Some(ymd(2024, 2, 4))
    );
  }

  #[test]
  fn today_flag_only_inside_displayed_month() {
    let today = ymd(2024, 2, 28);

    let feb = build_month_grid(
      ym(2024, 2),
      today,
      None,
      &[],
      DEFAULT_MARKER_LIMIT
    );
    assert_eq!(
      feb
        .cells
        .iter()
        .filter(|cell| cell.is_today)
        .count(),
      1
    );

    // March 2024 leads with Feb 26..29.
    let march = build_month_grid(
      ym(2024, 3),
      today,
      None,
      &[],
      DEFAULT_MARKER_LIMIT
    );
    assert!(
      march
        .cells
        .iter()
        .all(|cell| !cell.is_today)
    );
  }

  #[test]
  fn markers_are_capped_and_overflow_counted()
   {
    let day = ymd(2024, 3, 15);
    let events = (0..5)
      .map(|idx| {
        event_on(day, &format!("task {idx}"))
      })
      .chain(std::iter::once(event_on(
        ymd(2024, 3, 16),
        "other"
      )))
      .collect::<Vec<_>>();

    let grid = build_month_grid(
      ym(2024, 3),
      ymd(2000, 1, 1),
      Some(day),
      &events,
      DEFAULT_MARKER_LIMIT
    );
    let cell = grid
      .cells
      .iter()
      .find(|cell| cell.date == day)
      .expect("cell for the 15th");
    assert_eq!(cell.markers.len(), 3);
    assert_eq!(cell.overflow, 2);
    assert!(cell.is_selected);

    let next = grid
      .cells
      .iter()
      .find(|cell| cell.date == ymd(2024, 3, 16))
      .expect("cell for the 16th");
    assert_eq!(next.markers.len(), 1);
    assert_eq!(next.overflow, 0);
    assert!(!next.is_selected);
  }

  #[test]
  fn adjacent_cells_ignore_events_and_selection()
   {
    let feb_29 = ymd(2024, 2, 29);
    let grid = build_month_grid(
      ym(2024, 3),
      feb_29,
      Some(feb_29),
      &[event_on(feb_29, "leap")],
      DEFAULT_MARKER_LIMIT
    );
    let leading = &grid.cells[3];
    assert_eq!(leading.date, feb_29);
    assert_eq!(leading.kind, CellKind::Leading);
    assert!(!leading.is_selectable());
    assert!(leading.markers.is_empty());
    assert!(!leading.is_selected);
    assert!(!leading.is_today);
  }
}
