use std::cell::RefCell;

use tracing::{
  debug,
  info
};

use super::controller::CalendarController;
use super::source::EventSource;
use super::state::{
  FetchOutcome,
  FetchRequest
};
use super::view::CalendarView;
use crate::datetime::{
  Clock,
  SystemClock,
  YearMonth
};
use crate::error::CalendarError;

/// Runs the controller's fetch-then-render
/// cycles against an [`EventSource`].
///
/// Meant for a single-threaded executor:
/// several navigations may be in flight at
/// once, and the controller keeps only the
/// newest one's result. No `RefCell` borrow
/// is held across an `.await`.
pub struct CalendarSession<S, C = SystemClock>
{
  source:     S,
  controller: RefCell<CalendarController<C>>
}

impl<S, C> CalendarSession<S, C>
where
  S: EventSource,
  C: Clock
{
  pub fn new(
    source: S,
    controller: CalendarController<C>
  ) -> Self {
    Self {
      source,
      controller: RefCell::new(controller)
    }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  pub async fn initialize(&self) -> CalendarView {
    let request =
      self.controller.borrow_mut().initialize();
    self.load(request).await
  }

  pub async fn go_to_previous_month(
    &self
  ) -> CalendarView {
    let request = self
      .controller
      .borrow_mut()
      .go_to_previous_month();
    self.load(request).await
  }

  pub async fn go_to_next_month(
    &self
  ) -> CalendarView {
    let request = self
      .controller
      .borrow_mut()
      .go_to_next_month();
    self.load(request).await
  }

  pub async fn go_to_today(&self) -> CalendarView {
    let request =
      self.controller.borrow_mut().go_to_today();
    self.load(request).await
  }

  pub async fn go_to_month(
    &self,
    month: YearMonth
  ) -> CalendarView {
    let request = self
      .controller
      .borrow_mut()
      .go_to_month(month);
    self.load(request).await
  }

  pub async fn reload(&self) -> CalendarView {
    let request =
      self.controller.borrow_mut().reload();
    self.load(request).await
  }

  /// Never touches the event source.
  pub fn select_date(
    &self,
    raw: &str
  ) -> Result<CalendarView, CalendarError> {
    self
      .controller
      .borrow_mut()
      .select_date(raw)?;
    Ok(self.render())
  }

  pub fn render(&self) -> CalendarView {
    self.controller.borrow().render()
  }

  pub fn displayed(&self) -> YearMonth {
    self.controller.borrow().state().displayed
  }

  async fn load(
    &self,
    request: FetchRequest
  ) -> CalendarView {
    let result = self
      .source
      .fetch_events(&request.range)
      .await;

    let outcome = self
      .controller
      .borrow_mut()
      .complete_fetch(&request, result);
    match outcome {
      | FetchOutcome::Applied { events } => {
        info!(
          month = %request.month,
          events,
          "calendar refreshed"
        );
      }
      | FetchOutcome::Degraded => {
        info!(
          month = %request.month,
          "calendar rendered without events"
        );
      }
      | FetchOutcome::Stale => {
        debug!(
          token = request.token.0,
          "superseded calendar fetch finished"
        );
      }
    }

    self.render()
  }
}
