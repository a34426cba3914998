use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use scope_shared::CalendarEventDto;

use crate::datetime::parse_date_key;
use crate::error::CalendarError;

pub const DEFAULT_EVENT_COLOR: &str =
  "#7C3AED";

/// A task with a due date, as shown on the
/// calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
  pub id:          Option<u64>,
  pub start:       NaiveDate,
  pub title:       String,
  pub url:         String,
  pub color:       String,
  pub completed:   bool,
  pub time:        Option<String>,
  pub project:     Option<String>,
  pub description: Option<String>
}

impl CalendarEvent {
  #[must_use]
  pub fn new(
    start: NaiveDate,
    title: impl Into<String>,
    url: impl Into<String>,
    color: &str,
    completed: bool
  ) -> Self {
    Self {
      id: None,
      start,
      title: title.into(),
      url: url.into(),
      color: sanitize_color(color),
      completed,
      time: None,
      project: None,
      description: None
    }
  }

  pub fn from_dto(
    dto: CalendarEventDto
  ) -> Result<Self, CalendarError> {
    let start = parse_date_key(&dto.start)?;
    Ok(Self {
      id: dto.id,
      start,
      color: sanitize_color(&dto.color),
      title: dto.title,
      url: dto.url,
      completed: dto.completed,
      time: dto.time,
      project: dto.project,
      description: dto
        .description
        .filter(|text| !text.is_empty())
    })
  }
}

fn hex_color_regex() -> Option<&'static Regex>
{
  static HEX_RE: OnceLock<Option<Regex>> =
    OnceLock::new();
  HEX_RE
    .get_or_init(|| {
      Regex::new(r"^#[0-9A-Fa-f]{6}$").ok()
    })
    .as_ref()
}

/// Accepts `#RRGGBB` (any case, `#`
/// optional) and normalizes it to upper
/// case. Anything else becomes
/// [`DEFAULT_EVENT_COLOR`].
#[must_use]
pub fn sanitize_color(raw: &str) -> String {
  let trimmed = raw.trim();
  let candidate =
    if trimmed.starts_with('#') {
      trimmed.to_string()
    } else {
      format!("#{trimmed}")
    };

  match hex_color_regex() {
    | Some(re) if re.is_match(&candidate) => {
      candidate.to_ascii_uppercase()
    }
    | _ => DEFAULT_EVENT_COLOR.to_string()
  }
}

/// Decodes the event source's JSON array.
///
/// A body that is not a JSON array of events
/// is a fetch failure. Single entries with
/// a malformed `start` are dropped with a
/// warning so one bad row does not blank
/// the month.
pub fn decode_events_json(
  body: &str
) -> Result<Vec<CalendarEvent>, CalendarError>
{
  let dtos = serde_json::from_str::<
    Vec<CalendarEventDto>,
  >(body)
  .map_err(|error| {
    CalendarError::fetch(format!(
      "invalid event payload: {error}"
    ))
  })?;

  Ok(decode_events(dtos))
}

#[must_use]
pub fn decode_events(
  dtos: Vec<CalendarEventDto>
) -> Vec<CalendarEvent> {
  let total = dtos.len();
  let events = dtos
    .into_iter()
    .filter_map(|dto| {
      let title = dto.title.clone();
      match CalendarEvent::from_dto(dto) {
        | Ok(event) => Some(event),
        | Err(error) => {
          tracing::warn!(
            %title,
            %error,
            "dropping calendar event with bad start date"
          );
          None
        }
      }
    })
    .collect::<Vec<_>>();

  tracing::debug!(
    total,
    kept = events.len(),
    "decoded calendar events"
  );
  events
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitizes_colors() {
    assert_eq!(
      sanitize_color("#3b82f6"),
      "#3B82F6"
    );
    assert_eq!(
      sanitize_color("22c55e"),
      "#22C55E"
    );
    assert_eq!(
      sanitize_color("red;background:url(x)"),
      DEFAULT_EVENT_COLOR
    );
    assert_eq!(
      sanitize_color(""),
      DEFAULT_EVENT_COLOR
    );
  }

  #[test]
  fn decodes_payload_and_drops_bad_rows() {
    let body = r##"[
      {"title":"a","start":"2024-03-15","url":"/tasks/1/","color":"#ef4444","completed":true},
      {"title":"b","start":"15.03.2024","url":"/tasks/2/","color":"#ef4444","completed":false},
      {"title":"c","start":"2024-03-16","url":"/tasks/3/","color":"nope","completed":false}
    ]"##;

    let events = decode_events_json(body)
      .expect("decode events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "a");
    assert_eq!(events[0].color, "#EF4444");
    assert!(events[0].completed);
    assert_eq!(events[1].title, "c");
    assert_eq!(
      events[1].color,
      DEFAULT_EVENT_COLOR
    );
  }

  #[test]
  fn non_array_payload_is_fetch_failure() {
    let error = decode_events_json(
      r#"{"detail":"login required"}"#
    )
    .expect_err("object payload");
    assert!(matches!(
      error,
      CalendarError::FetchFailure { .. }
    ));
  }
}
