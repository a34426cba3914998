use gloo::net::http::Request;
use scope_core::calendar::event::decode_events_json;
use scope_core::calendar::source::range_query_url;
use scope_core::calendar::{
  CalendarEvent,
  EventSource
};
use scope_core::config::ServerConfig;
use scope_core::datetime::DateRange;
use scope_core::error::CalendarError;
use scope_core::tasks::{
  CSRF_HEADER,
  FORM_CONTENT_TYPE,
  MutationResult,
  REQUESTED_WITH,
  REQUESTED_WITH_HEADER,
  TaskMutation,
  decode_mutation,
  resolve_csrf_token
};
use serde::de::DeserializeOwned;
use url::Url;
use wasm_bindgen::JsCast;

/// Same-origin calendar event feed.
pub struct GlooEventSource {
  endpoint: Url
}

impl GlooEventSource {
  pub fn new(
    server: &ServerConfig
  ) -> Result<Self, String> {
    let endpoint = server
      .events_endpoint()
      .map_err(|err| format!("{err:#}"))?;
    Ok(Self { endpoint })
  }
}

impl EventSource for GlooEventSource {
  async fn fetch_events(
    &self,
    range: &DateRange
  ) -> Result<Vec<CalendarEvent>, CalendarError>
  {
    let url =
      range_query_url(&self.endpoint, range);
    tracing::debug!(url = %url, "fetching calendar events");

    let response = Request::get(url.as_str())
      .header("Accept", "application/json")
      .header(
        REQUESTED_WITH_HEADER,
        REQUESTED_WITH
      )
      .send()
      .await
      .map_err(|err| {
        CalendarError::fetch(err.to_string())
      })?;

    if !response.ok() {
      return Err(CalendarError::fetch(
        format!(
          "server answered HTTP {}",
          response.status()
        )
      ));
    }

    let body =
      response.text().await.map_err(|err| {
        CalendarError::fetch(err.to_string())
      })?;
    decode_events_json(&body)
  }
}

/// Posts task mutations with the page's
/// CSRF cookie.
#[derive(Clone, PartialEq)]
pub struct TaskApi {
  server: ServerConfig
}

impl TaskApi {
  pub fn new(server: &ServerConfig) -> Self {
    Self {
      server: server.clone()
    }
  }

  pub async fn send<T: DeserializeOwned>(
    &self,
    mutation: &TaskMutation
  ) -> MutationResult<T> {
    let url =
      match self.server.endpoint(&mutation.path())
      {
        | Ok(url) => url,
        | Err(err) => {
          return MutationResult::failure(
            format!("{err:#}")
          );
        }
      };

    let mut builder = Request::post(url.as_str())
      .header("Accept", "application/json")
      .header(
        REQUESTED_WITH_HEADER,
        REQUESTED_WITH
      );
    let token = self
      .server
      .csrf_token
      .clone()
      .or_else(page_csrf_token);
    match token {
      | Some(token) => {
        builder =
          builder.header(CSRF_HEADER, &token);
      }
      | None => {
        tracing::warn!(
          mutation = mutation.name(),
          "no csrftoken cookie on page"
        );
      }
    }

    let request = match mutation.form_body() {
      | Some(body) => {
        builder
          .header(
            "Content-Type",
            FORM_CONTENT_TYPE
          )
          .body(body)
      }
      | None => builder.build()
    };
    let request = match request {
      | Ok(request) => request,
      | Err(err) => {
        return MutationResult::failure(
          err.to_string()
        );
      }
    };

    let response = match request.send().await {
      | Ok(response) => response,
      | Err(err) => {
        tracing::error!(
          mutation = mutation.name(),
          error = %err,
          "mutation request failed"
        );
        return MutationResult::failure(
          err.to_string()
        );
      }
    };

    if !response.ok() {
      return MutationResult::failure(format!(
        "server answered HTTP {}",
        response.status()
      ));
    }

    match response.text().await {
      | Ok(body) => decode_mutation(&body),
      | Err(err) => {
        MutationResult::failure(err.to_string())
      }
    }
  }
}

fn page_csrf_token() -> Option<String> {
  let document = web_sys::window()?
    .document()?
    .dyn_into::<web_sys::HtmlDocument>()
    .ok()?;
  let form_field = document
    .query_selector("[name=csrfmiddlewaretoken]")
    .ok()
    .flatten()
    .and_then(|element| {
      element
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()
    })
    .map(|input| input.value());
  let cookies = document.cookie().ok();
  resolve_csrf_token(
    form_field.as_deref(),
    cookies.as_deref()
  )
}

/// `window.location.origin`, used as the
/// server base URL.
pub fn page_origin() -> Option<String> {
  web_sys::window()?
    .location()
    .origin()
    .ok()
}
