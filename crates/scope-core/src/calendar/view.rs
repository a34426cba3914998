//! Render-ready description of the calendar.
//!
//! Renderers (the terminal writer in
//! [`crate::render`] and the yew frontend)
//! only read these structures; none of them
//! touch [`super::ViewState`] directly.

use chrono::{
  Datelike,
  NaiveDate
};

use super::event::CalendarEvent;
use super::grid::{
  MonthGrid,
  build_month_grid
};
use super::labels::CalendarLabels;
use super::state::ViewState;
use crate::datetime::{
  YearMonth,
  date_key
};

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
  pub month:          YearMonth,
  pub title:          String,
  pub today_label:    String,
  pub weekday_labels: [String; 7],
  pub grid:           MonthGrid,
  pub agenda:         Agenda
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agenda {
  pub date:    NaiveDate,
  pub heading: String,
  pub body:    AgendaBody
}

impl Agenda {
  #[must_use]
  pub fn date_key(&self) -> String {
    date_key(self.date)
  }

  #[must_use]
  pub fn entries(&self) -> &[AgendaEntry] {
    match &self.body {
      | AgendaBody::Entries(entries) => {
        entries
      }
      | AgendaBody::Empty(_) => &[]
    }
  }
}

/// The event list is never omitted: with no
/// matching events it carries the empty-state
/// message instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AgendaBody {
  Entries(Vec<AgendaEntry>),
  Empty(String)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgendaEntry {
  pub id:          Option<u64>,
  pub title:       String,
  pub url:         String,
  pub color:       String,
  pub completed:   bool,
  pub time:        Option<String>,
  pub project:     Option<String>,
  pub description: Option<String>
}

impl From<&CalendarEvent> for AgendaEntry {
  fn from(event: &CalendarEvent) -> Self {
    Self {
      id:          event.id,
      title:       event.title.clone(),
      url:         event.url.clone(),
      color:       event.color.clone(),
      completed:   event.completed,
      time:        event.time.clone(),
      project:     event.project.clone(),
      description: event.description.clone()
    }
  }
}

/// Events dated exactly `date`, in source
/// order.
#[must_use]
pub fn build_agenda(
  date: NaiveDate,
  events: &[CalendarEvent],
  labels: &CalendarLabels
) -> Agenda {
  let entries = events
    .iter()
    .filter(|event| event.start == date)
    .map(AgendaEntry::from)
    .collect::<Vec<_>>();

  let body = if entries.is_empty() {
    AgendaBody::Empty(
      labels.agenda_empty.to_string()
    )
  } else {
    AgendaBody::Entries(entries)
  };

  Agenda {
    date,
    heading: labels
      .agenda_heading(date.month(), date.day()),
    body
  }
}

#[must_use]
pub fn build_view(
  state: &ViewState,
  today: NaiveDate,
  labels: &CalendarLabels,
  marker_limit: usize
) -> CalendarView {
  let month = state.displayed;
  let grid = build_month_grid(
    month,
    today,
    state.selected,
    &state.events,
    marker_limit
  );
  let agenda = build_agenda(
    state.selected.unwrap_or(today),
    &state.events,
    labels
  );

  CalendarView {
    month,
    title: labels
      .month_title(month.year(), month.month()),
    today_label: labels.today_button.to_string(),
    weekday_labels: labels
      .weekday_short
      .map(str::to_string),
    grid,
    agenda
  }
}
