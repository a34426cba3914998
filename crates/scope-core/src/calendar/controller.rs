use chrono::NaiveDate;
use tracing::{
  debug,
  info,
  warn
};

use super::event::CalendarEvent;
use super::grid::DEFAULT_MARKER_LIMIT;
use super::labels::Locale;
use super::state::{
  FetchOutcome,
  FetchRequest,
  RequestToken,
  ViewState
};
use super::view::{
  CalendarView,
  build_view
};
use crate::datetime::{
  Clock,
  SystemClock,
  YearMonth,
  parse_date_key
};
use crate::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
  pub locale:       Locale,
  pub marker_limit: usize
}

impl Default for ControllerOptions {
  fn default() -> Self {
    Self {
      locale:       Locale::default(),
      marker_limit: DEFAULT_MARKER_LIMIT
    }
  }
}

/// Owns the calendar [`ViewState`] and
/// decides which fetch results may replace
/// its events.
///
/// The controller does no I/O. Every
/// navigation returns a [`FetchRequest`];
/// the caller runs it and passes the result
/// to [`CalendarController::complete_fetch`].
/// Only the most recently issued request is
/// applied, so a slow response for an
/// earlier month never overwrites a later
/// navigation.
#[derive(Debug)]
pub struct CalendarController<C = SystemClock>
{
  clock:   C,
  options: ControllerOptions,
  state:   ViewState,
  latest:  RequestToken
}

impl<C: Clock> CalendarController<C> {
  pub fn new(
    clock: C,
    options: ControllerOptions
  ) -> Self {
    let displayed =
      YearMonth::of(clock.today());
    Self {
      clock,
      options,
      state: ViewState::new(displayed),
      latest: RequestToken(0)
    }
  }

  pub fn state(&self) -> &ViewState {
    &self.state
  }

  pub fn options(&self) -> ControllerOptions {
    self.options
  }

  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }

  /// First fetch for the month the
  /// controller was created on.
  pub fn initialize(&mut self) -> FetchRequest {
    info!(
      month = %self.state.displayed,
      "initializing calendar"
    );
    self.issue()
  }

  pub fn go_to_previous_month(
    &mut self
  ) -> FetchRequest {
    self.navigate(self.state.displayed.pred())
  }

  pub fn go_to_next_month(
    &mut self
  ) -> FetchRequest {
    self.navigate(self.state.displayed.succ())
  }

  pub fn go_to_today(&mut self) -> FetchRequest {
    let month = YearMonth::of(self.clock.today());
    self.navigate(month)
  }

  pub fn go_to_month(
    &mut self,
    month: YearMonth
  ) -> FetchRequest {
    self.navigate(month)
  }

  /// Re-fetches the displayed month keeping
  /// the selection, e.g. after a task was
  /// toggled.
  pub fn reload(&mut self) -> FetchRequest {
    self.issue()
  }

  fn navigate(
    &mut self,
    month: YearMonth
  ) -> FetchRequest {
    if month != self.state.displayed {
      self.state.events.clear();
    }
    self.state.displayed = month;
    self.state.selected = None;
    self.issue()
  }

  fn issue(&mut self) -> FetchRequest {
    self.latest =
      RequestToken(self.latest.0 + 1);
    let month = self.state.displayed;
    debug!(
      token = self.latest.0,
      %month,
      "issuing calendar fetch"
    );
    FetchRequest {
      token: self.latest,
      month,
      range: month.range()
    }
  }

  /// Selects a day without fetching.
  /// Malformed keys are rejected and leave
  /// the state as it was.
  pub fn select_date(
    &mut self,
    raw: &str
  ) -> Result<NaiveDate, CalendarError> {
    match parse_date_key(raw) {
      | Ok(date) => {
        debug!(date = %raw, "selected calendar day");
        self.state.selected = Some(date);
        Ok(date)
      }
      | Err(error) => {
        warn!(%error, "ignoring calendar day selection");
        Err(error)
      }
    }
  }

  pub fn complete_fetch(
    &mut self,
    request: &FetchRequest,
    result: Result<
      Vec<CalendarEvent>,
      CalendarError
    >
  ) -> FetchOutcome {
    if request.token != self.latest {
      debug!(
        token = request.token.0,
        latest = self.latest.0,
        month = %request.month,
        "discarding stale calendar fetch"
      );
      return FetchOutcome::Stale;
    }

    match result {
      | Ok(events) => {
        let count = events.len();
        self.state.events = events;
        debug!(
          month = %request.month,
          events = count,
          "applied calendar events"
        );
        FetchOutcome::Applied { events: count }
      }
      | Err(error) => {
        warn!(
          month = %request.month,
          %error,
          "calendar fetch failed; rendering without events"
        );
        self.state.events.clear();
        FetchOutcome::Degraded
      }
    }
  }

  /// Pure projection of the current state.
  pub fn render(&self) -> CalendarView {
    build_view(
      &self.state,
      self.clock.today(),
      self.options.locale.labels(),
      self.options.marker_limit
    )
  }
}
