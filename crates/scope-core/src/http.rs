use std::time::Duration;

use anyhow::Context;
use reqwest::header::{
  ACCEPT,
  CONTENT_TYPE,
  COOKIE
};
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  warn
};
use url::Url;

use crate::calendar::event::decode_events_json;
use crate::calendar::source::range_query_url;
use crate::calendar::{
  CalendarEvent,
  EventSource
};
use crate::config::ServerConfig;
use crate::datetime::DateRange;
use crate::error::CalendarError;
use crate::tasks::{
  CSRF_HEADER,
  FORM_CONTENT_TYPE,
  MutationResult,
  REQUESTED_WITH,
  REQUESTED_WITH_HEADER,
  TaskMutation,
  decode_mutation
};

fn build_client(
  server: &ServerConfig
) -> anyhow::Result<reqwest::Client> {
  reqwest::Client::builder()
    .timeout(Duration::from_secs(
      server.timeout_secs
    ))
    .build()
    .context(
      "failed building HTTP client for \
       scope server"
    )
}

/// Calendar events over
/// `GET {events_path}?start=..&end=..`.
#[derive(Debug, Clone)]
pub struct HttpEventSource {
  client:   reqwest::Client,
  endpoint: Url
}

impl HttpEventSource {
  pub fn new(
    server: &ServerConfig
  ) -> anyhow::Result<Self> {
    Ok(Self {
      client:   build_client(server)?,
      endpoint: server.events_endpoint()?
    })
  }

  #[must_use]
  pub fn events_url(
    &self,
    range: &DateRange
  ) -> Url {
    range_query_url(&self.endpoint, range)
  }
}

impl EventSource for HttpEventSource {
  #[tracing::instrument(
    skip(self),
    fields(
      start = %range.start,
      end = %range.end
    )
  )]
  async fn fetch_events(
    &self,
    range: &DateRange
  ) -> Result<Vec<CalendarEvent>, CalendarError>
  {
    let url = self.events_url(range);
    let response = self
      .client
      .get(url)
      .header(ACCEPT, "application/json")
      .header(REQUESTED_WITH_HEADER, REQUESTED_WITH)
      .send()
      .await
      .map_err(|error| {
        CalendarError::fetch(error.to_string())
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(CalendarError::fetch(
        format!("server answered HTTP {status}")
      ));
    }

    let body =
      response.text().await.map_err(|error| {
        CalendarError::fetch(error.to_string())
      })?;
    debug!(bytes = body.len(), "received calendar events");
    decode_events_json(&body)
  }
}

/// Sends [`TaskMutation`]s as AJAX-style
/// POSTs with the CSRF token attached.
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
  client:     reqwest::Client,
  server:     ServerConfig,
  csrf_token: Option<String>
}

impl HttpTaskClient {
  pub fn new(
    server: &ServerConfig
  ) -> anyhow::Result<Self> {
    if server.csrf_token.is_none() {
      warn!(
        "server.csrf_token is not set; \
         mutations will likely be rejected"
      );
    }
    Ok(Self {
      client:     build_client(server)?,
      csrf_token: server.csrf_token.clone(),
      server:     server.clone()
    })
  }

  #[tracing::instrument(
    skip(self),
    fields(kind = mutation.name())
  )]
  pub async fn send<T: DeserializeOwned>(
    &self,
    mutation: &TaskMutation
  ) -> MutationResult<T> {
    let url =
      match self.server.endpoint(&mutation.path())
      {
        | Ok(url) => url,
        | Err(error) => {
          return MutationResult::failure(
            format!("{error:#}")
          );
        }
      };

    let mut request = self
      .client
      .post(url)
      .header(ACCEPT, "application/json")
      .header(REQUESTED_WITH_HEADER, REQUESTED_WITH);
    if let Some(token) = &self.csrf_token {
      request = request
        .header(CSRF_HEADER, token.as_str())
        .header(COOKIE, format!("csrftoken={token}"));
    }
    if let Some(body) = mutation.form_body() {
      request = request
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(body);
    }

    let response = match request.send().await {
      | Ok(response) => response,
      | Err(error) => {
        warn!(%error, "mutation request failed");
        return MutationResult::failure(
          error.to_string()
        );
      }
    };

    let status = response.status();
    if !status.is_success() {
      warn!(%status, "mutation rejected");
      return MutationResult::failure(format!(
        "server answered HTTP {status}"
      ));
    }

    match response.text().await {
      | Ok(body) => decode_mutation(&body),
      | Err(error) => {
        MutationResult::failure(error.to_string())
      }
    }
  }
}
