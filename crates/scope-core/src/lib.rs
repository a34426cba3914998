pub mod calendar;
pub mod config;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod render;
pub mod shortcuts;
pub mod tasks;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;
#[cfg(feature = "cli")]
pub mod http;

#[cfg(feature = "cli")]
use std::ffi::OsString;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use tracing::{
  debug,
  info
};

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting scope CLI"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  if let Some(base_url) = cli.base_url {
    debug!(%base_url, "base url overridden on command line");
    cfg.server.base_url = base_url;
    cfg.sanitize();
  }

  let mut renderer =
    render::Renderer::new(&cfg);

  commands::dispatch(
    &cfg,
    &mut renderer,
    cli.command
  )?;

  info!("done");
  Ok(())
}
