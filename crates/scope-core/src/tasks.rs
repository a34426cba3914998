//! Task, checklist, project and tag
//! mutations.
//!
//! Every endpoint answers with a JSON object
//! carrying a `success` flag. Here that flag
//! is turned into [`MutationResult`] so
//! callers match on an outcome instead of
//! poking at loose JSON.

use scope_shared::MutationEnvelope;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::calendar::event::sanitize_color;

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const REQUESTED_WITH_HEADER: &str =
  "X-Requested-With";
pub const REQUESTED_WITH: &str =
  "XMLHttpRequest";
pub const FORM_CONTENT_TYPE: &str =
  "application/x-www-form-urlencoded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
  ToggleTask {
    task: u64
  },
  DeleteTask {
    task: u64
  },
  CreateTask {
    title:   String,
    project: Option<u64>
  },
  AddChecklistItem {
    task: u64,
    text: String
  },
  ToggleChecklistItem {
    item: u64
  },
  DeleteChecklistItem {
    item: u64
  },
  CreateProject {
    name:  String,
    color: String
  },
  DeleteProject {
    project: u64
  },
  CreateTag {
    name:  String,
    color: String
  },
  DeleteTag {
    tag: u64
  }
}

impl TaskMutation {
  /// `None` when the trimmed title is empty;
  /// nothing is sent in that case.
  #[must_use]
  pub fn create_task(
    title: &str,
    project: Option<u64>
  ) -> Option<Self> {
    let title = title.trim();
    (!title.is_empty()).then(|| {
      Self::CreateTask {
        title: title.to_string(),
        project
      }
    })
  }

  #[must_use]
  pub fn add_checklist_item(
    task: u64,
    text: &str
  ) -> Option<Self> {
    let text = text.trim();
    (!text.is_empty()).then(|| {
      Self::AddChecklistItem {
        task,
        text: text.to_string()
      }
    })
  }

  /// Like [`TaskMutation::create_task`];
  /// the color is normalized to `#RRGGBB`.
  #[must_use]
  pub fn create_project(
    name: &str,
    color: &str
  ) -> Option<Self> {
    let name = name.trim();
    (!name.is_empty()).then(|| {
      Self::CreateProject {
        name:  name.to_string(),
        color: sanitize_color(color)
      }
    })
  }

  #[must_use]
  pub fn create_tag(
    name: &str,
    color: &str
  ) -> Option<Self> {
    let name = name.trim();
    (!name.is_empty()).then(|| {
      Self::CreateTag {
        name:  name.to_string(),
        color: sanitize_color(color)
      }
    })
  }

  #[must_use]
  pub fn name(&self) -> &'static str {
    match self {
      | Self::ToggleTask { .. } => "toggle_task",
      | Self::DeleteTask { .. } => "delete_task",
      | Self::CreateTask { .. } => "create_task",
      | Self::AddChecklistItem { .. } => {
        "add_checklist_item"
      }
      | Self::ToggleChecklistItem { .. } => {
        "toggle_checklist_item"
      }
      | Self::DeleteChecklistItem { .. } => {
        "delete_checklist_item"
      }
      | Self::CreateProject { .. } => {
        "create_project"
      }
      | Self::DeleteProject { .. } => {
        "delete_project"
      }
      | Self::CreateTag { .. } => "create_tag",
      | Self::DeleteTag { .. } => "delete_tag",
    }
  }

  /// Server path, relative to the site root.
  #[must_use]
  pub fn path(&self) -> String {
    match self {
      | Self::ToggleTask { task } => {
        format!("/tasks/{task}/toggle/")
      }
      | Self::DeleteTask { task } => {
        format!("/tasks/{task}/delete/")
      }
      | Self::CreateTask { .. } => {
        "/tasks/create/".to_string()
      }
      | Self::AddChecklistItem {
        task, ..
      } => {
        format!("/tasks/{task}/checklist/add/")
      }
      | Self::ToggleChecklistItem { item } => {
        format!("/checklist/{item}/toggle/")
      }
      | Self::DeleteChecklistItem { item } => {
        format!("/checklist/{item}/delete/")
      }
      | Self::CreateProject { .. } => {
        "/projects/create/".to_string()
      }
      | Self::DeleteProject { project } => {
        format!("/projects/{project}/delete/")
      }
      | Self::CreateTag { .. } => {
        "/tags/create/".to_string()
      }
      | Self::DeleteTag { tag } => {
        format!("/tags/{tag}/delete/")
      }
    }
  }

  /// `application/x-www-form-urlencoded`
  /// body, for the mutations that send one.
  #[must_use]
  pub fn form_body(&self) -> Option<String> {
    match self {
      | Self::CreateTask { title, project } => {
        let project = project
          .map(|id| id.to_string())
          .unwrap_or_default();
        Some(
          form_urlencoded::Serializer::new(
            String::new()
          )
          .append_pair("title", title)
          .append_pair("project", &project)
          .finish()
        )
      }
      | Self::AddChecklistItem {
        text, ..
      } => {
        Some(
          form_urlencoded::Serializer::new(
            String::new()
          )
          .append_pair("text", text)
          .finish()
        )
      }
      | Self::CreateProject { name, color }
      | Self::CreateTag { name, color } => {
        Some(
          form_urlencoded::Serializer::new(
            String::new()
          )
          .append_pair("name", name)
          .append_pair("color", color)
          .finish()
        )
      }
      | _ => None
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationResult<T> {
  Success(T),
  Failure { reason: String }
}

impl<T> MutationResult<T> {
  pub fn failure(
    reason: impl Into<String>
  ) -> Self {
    Self::Failure {
      reason: reason.into()
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Success(_))
  }

  pub fn into_result(
    self
  ) -> Result<T, String> {
    match self {
      | Self::Success(value) => Ok(value),
      | Self::Failure { reason } => {
        Err(reason)
      }
    }
  }
}

/// Decodes a mutation response body.
///
/// `{"success": false, "error": ..}` becomes
/// a failure with the server's reason;
/// malformed bodies become a failure too.
pub fn decode_mutation<T: DeserializeOwned>(
  body: &str
) -> MutationResult<T> {
  let envelope = match serde_json::from_str::<
    MutationEnvelope,
  >(body)
  {
    | Ok(envelope) => envelope,
    | Err(error) => {
      return MutationResult::failure(format!(
        "invalid response: {error}"
      ));
    }
  };

  if !envelope.success {
    return MutationResult::failure(
      envelope.error.unwrap_or_else(|| {
        "request rejected by server"
          .to_string()
      })
    );
  }

  match serde_json::from_str::<T>(body) {
    | Ok(payload) => {
      MutationResult::Success(payload)
    }
    | Err(error) => {
      MutationResult::failure(format!(
        "unexpected response shape: {error}"
      ))
    }
  }
}

/// Reads Django's `csrftoken` cookie from a
/// `Cookie` header or `document.cookie`.
#[must_use]
pub fn csrf_token_from_cookies(
  cookies: &str
) -> Option<String> {
  cookies
    .split(';')
    .map(str::trim)
    .find_map(|pair| {
      pair.strip_prefix("csrftoken=")
    })
    .filter(|token| !token.is_empty())
    .map(str::to_string)
}

/// Picks the token a page should send: the
/// hidden `csrfmiddlewaretoken` form field
/// first, then the `csrftoken` cookie.
#[must_use]
pub fn resolve_csrf_token(
  form_field: Option<&str>,
  cookies: Option<&str>
) -> Option<String> {
  form_field
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .map(str::to_string)
    .or_else(|| {
      cookies.and_then(csrf_token_from_cookies)
    })
}
