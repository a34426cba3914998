use serde::{
  Deserialize,
  Serialize
};

/// One entry of the `/api/calendar-events/`
/// response array.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct CalendarEventDto {
  #[serde(default)]
  pub id:            Option<u64>,
  pub title:         String,
  #[serde(default)]
  pub description:   Option<String>,
  pub start:         String,
  #[serde(default)]
  pub time:          Option<String>,
  #[serde(default)]
  pub color:         String,
  #[serde(default)]
  pub priority:      Option<u8>,
  #[serde(default)]
  pub completed:     bool,
  #[serde(default)]
  pub url:           String,
  #[serde(default)]
  pub project:       Option<String>,
  #[serde(
    default,
    rename = "projectColor"
  )]
  pub project_color: Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct EventRangeQuery {
  pub start: String,
  pub end:   String
}

/// Fields every mutation endpoint returns.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct MutationEnvelope {
  pub success: bool,
  #[serde(default)]
  pub error:   Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskToggled {
  pub is_completed: bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskCreated {
  pub id:    u64,
  #[serde(default)]
  pub title: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ProjectCreated {
  pub id:   u64,
  #[serde(default)]
  pub name: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TagCreated {
  pub id:    u64,
  #[serde(default)]
  pub name:  String,
  #[serde(default)]
  pub color: String
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ChecklistProgress {
  pub total:     u32,
  pub completed: u32,
  pub percent:   u32
}

impl ChecklistProgress {
  #[must_use]
  pub fn label(&self) -> String {
    format!(
      "{}/{}",
      self.completed, self.total
    )
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ChecklistItemAdded {
  pub id:   u64,
  pub text: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ChecklistItemToggled {
  pub is_completed: bool,
  #[serde(default)]
  pub progress:     Option<ChecklistProgress>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct ChecklistItemDeleted {
  #[serde(default)]
  pub progress: Option<ChecklistProgress>
}

/// Payload for endpoints that only
/// report `success`.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct Acknowledged {}
