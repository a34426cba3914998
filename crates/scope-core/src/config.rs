#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::warn;
#[cfg(feature = "cli")]
use tracing::{
  debug,
  info
};
use url::Url;

use crate::calendar::grid::DEFAULT_MARKER_LIMIT;
use crate::calendar::{
  ControllerOptions,
  Locale
};
use crate::datetime::{
  SystemClock,
  resolve_timezone
};

pub const CONFIG_FILE_NAME: &str =
  "scope.toml";
pub const CONFIG_ENV_VAR: &str =
  "SCOPE_CONFIG";

const DEFAULT_BASE_URL: &str =
  "http://127.0.0.1:8000";
const DEFAULT_EVENTS_PATH: &str =
  "/api/calendar-events/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct Config {
  pub server:   ServerConfig,
  pub calendar: CalendarConfig,
  pub output:   OutputConfig
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct ServerConfig {
  pub base_url:     String,
  pub events_path:  String,
  pub timeout_secs: u64,
  pub csrf_token:   Option<String>
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL
        .to_string(),
      events_path:  DEFAULT_EVENTS_PATH
        .to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      csrf_token:   None
    }
  }
}

impl ServerConfig {
  /// Resolves `path` under `base_url`. A
  /// leading `/` on `path` does not drop the
  /// sub-path of `base_url`.
  pub fn endpoint(
    &self,
    path: &str
  ) -> anyhow::Result<Url> {
    let mut base = Url::parse(&self.base_url)
      .with_context(|| {
        format!(
          "invalid server.base_url: {}",
          self.base_url
        )
      })?;
    if !base.path().ends_with('/') {
      let rooted = format!("{}/", base.path());
      base.set_path(&rooted);
    }
    base
      .join(path.trim_start_matches('/'))
      .with_context(|| {
        format!(
          "invalid endpoint path: {path}"
        )
      })
  }

  pub fn events_endpoint(
    &self
  ) -> anyhow::Result<Url> {
    self.endpoint(&self.events_path)
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct CalendarConfig {
  pub locale:       String,
  pub marker_limit: usize,
  pub timezone:     Option<String>
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      locale:       "en".to_string(),
      marker_limit: DEFAULT_MARKER_LIMIT,
      timezone:     None
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct OutputConfig {
  pub color: bool
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self { color: true }
  }
}

impl Config {
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Config>(raw)
        .map_err(|error| {
          anyhow!(
            "failed parsing config: {error}"
          )
        })?;
    config.sanitize();
    Ok(config)
  }

  /// Replaces unusable values with defaults,
  /// warning about each one.
  pub fn sanitize(&mut self) {
    if self.server.base_url.trim().is_empty()
    {
      warn!(
        "server.base_url was empty; using \
         default"
      );
      self.server.base_url =
        DEFAULT_BASE_URL.to_string();
    }

    if self
      .server
      .events_path
      .trim()
      .is_empty()
    {
      warn!(
        "server.events_path was empty; \
         using default"
      );
      self.server.events_path =
        DEFAULT_EVENTS_PATH.to_string();
    }

    if self.server.timeout_secs == 0 {
      self.server.timeout_secs =
        DEFAULT_TIMEOUT_SECS;
    }

    if self
      .server
      .csrf_token
      .as_deref()
      .is_some_and(|token| {
        token.trim().is_empty()
      })
    {
      self.server.csrf_token = None;
    }

    if self.calendar.marker_limit == 0 {
      warn!(
        "calendar.marker_limit must be \
         positive; using default"
      );
      self.calendar.marker_limit =
        DEFAULT_MARKER_LIMIT;
    }

    if Locale::from_key(&self.calendar.locale)
      .is_none()
    {
      warn!(
        locale = %self.calendar.locale,
        "unknown calendar.locale; using en"
      );
      self.calendar.locale = "en".to_string();
    }
  }

  pub fn locale(&self) -> Locale {
    Locale::from_key(&self.calendar.locale)
      .unwrap_or_default()
  }

  pub fn controller_options(
    &self
  ) -> ControllerOptions {
    ControllerOptions {
      locale:       self.locale(),
      marker_limit: self.calendar.marker_limit
    }
  }

  pub fn clock(&self) -> SystemClock {
    SystemClock::new(resolve_timezone(
      self.calendar.timezone.as_deref()
    ))
  }
}

#[cfg(feature = "cli")]
impl Config {
  /// Loads `--config`, then `$SCOPE_CONFIG`,
  /// then `<config dir>/scope/scope.toml`,
  /// falling back to built-in defaults.
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(config_override)
    else {
      info!(
        "no scope.toml found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading config");
    let raw = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let config = Self::from_toml_str(&raw)
      .with_context(|| {
        format!(
          "failed to load {}",
          path.display()
        )
      })?;
    debug!(?config, "loaded config");
    Ok(config)
  }
}

#[cfg(feature = "cli")]
fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(trimmed));
    }
  }

  let candidate = dirs::config_dir()?
    .join("scope")
    .join(CONFIG_FILE_NAME);
  candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let config = Config::from_toml_str("")
      .expect("parse empty config");
    assert_eq!(config, Config::default());
    assert_eq!(config.calendar.marker_limit, 3);
  }

  #[test]
  fn sanitizes_out_of_range_values() {
    let config = Config::from_toml_str(
      r#"
[server]
base_url = "  "
csrf_token = ""
timeout_secs = 0

[calendar]
locale = "klingon"
marker_limit = 0
"#
    )
    .expect("parse config");

    assert_eq!(
      config.server.base_url,
      DEFAULT_BASE_URL
    );
    assert_eq!(config.server.csrf_token, None);
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.calendar.marker_limit, 3);
    assert_eq!(config.locale(), Locale::En);
  }

  #[test]
  fn endpoints_join_base_url() {
    let config = Config::from_toml_str(
      r#"
[server]
base_url = "https://scope.example.com/app/"
events_path = "api/calendar-events/"
"#
    )
    .expect("parse config");
    assert_eq!(
      config
        .server
        .events_endpoint()
        .expect("endpoint")
        .as_str(),
      "https://scope.example.com/app/api/calendar-events/"
    );
  }

  #[test]
  fn absolute_paths_keep_base_sub_path() {
    let server = ServerConfig {
      base_url: "http://host/scope".to_string(),
      ..ServerConfig::default()
    };
    assert_eq!(
      server
        .events_endpoint()
        .expect("endpoint")
        .as_str(),
      "http://host/scope/api/calendar-events/"
    );
    assert_eq!(
      server
        .endpoint("/tags/3/delete/")
        .expect("endpoint")
        .as_str(),
      "http://host/scope/tags/3/delete/"
    );
  }

  #[test]
  fn rejects_malformed_toml() {
    assert!(
      Config::from_toml_str("[calendar")
        .is_err()
    );
  }
}
