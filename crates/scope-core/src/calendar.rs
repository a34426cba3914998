pub mod controller;
pub mod event;
pub mod grid;
pub mod labels;
pub mod session;
pub mod source;
pub mod state;
pub mod view;

pub use controller::{
  CalendarController,
  ControllerOptions
};
pub use event::CalendarEvent;
pub use grid::{
  CellKind,
  DayCell,
  EventMarker,
  MonthGrid
};
pub use labels::Locale;
pub use session::CalendarSession;
pub use source::EventSource;
pub use state::{
  FetchOutcome,
  FetchRequest,
  RequestToken,
  ViewState
};
pub use view::{
  Agenda,
  AgendaBody,
  AgendaEntry,
  CalendarView
};
