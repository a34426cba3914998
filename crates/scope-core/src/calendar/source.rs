use std::future::Future;

use url::Url;

use super::event::CalendarEvent;
use crate::datetime::DateRange;
use crate::error::CalendarError;

/// Backend query returning the events whose
/// date falls inside an inclusive range, in
/// the order they should be listed.
pub trait EventSource {
  fn fetch_events(
    &self,
    range: &DateRange
  ) -> impl Future<
    Output = Result<
      Vec<CalendarEvent>,
      CalendarError
    >
  >;
}

/// `endpoint?start=YYYY-MM-DD&end=YYYY-MM-DD`.
#[must_use]
pub fn range_query_url(
  endpoint: &Url,
  range: &DateRange
) -> Url {
  let query = range.query();
  let mut url = endpoint.clone();
  url
    .query_pairs_mut()
    .append_pair("start", &query.start)
    .append_pair("end", &query.end);
  url
}
