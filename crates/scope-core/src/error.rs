use thiserror::Error;

/// Errors surfaced by the calendar engine.
///
/// Neither variant is fatal: a failed fetch
/// degrades to an empty event set and an
/// invalid date key leaves the view untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
  #[error(
    "failed fetching calendar events: \
     {reason}"
  )]
  FetchFailure { reason: String },

  #[error(
    "invalid date key `{0}`; expected \
     YYYY-MM-DD"
  )]
  InvalidDateKey(String)
}

impl CalendarError {
  pub fn fetch(
    reason: impl Into<String>
  ) -> Self {
    Self::FetchFailure {
      reason: reason.into()
    }
  }
}
