use crate::{
  config::{LoggerToml, Opts},
  constants::QUERY_LOG_EVENT_NAME,
  error::*,
};
use std::sync::Arc;
pub use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

type BoxedLayer =
  Box<dyn Layer<tracing_subscriber::layer::Layered<EnvFilter, tracing_subscriber::Registry>> + Send + Sync>;

pub fn init_logger(parsed_opts: &Opts, logger_config: &LoggerToml) -> anyhow::Result<()> {
  let global_level_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&logger_config.level))
    .with_context(|| format!("Invalid log level: {}", logger_config.level))?;

  let mut layers: Vec<BoxedLayer> = vec![];

  // This limits the logger to emits only this crate with any level, for included crates it will emit only INFO or above level.
  if logger_config.stdout {
    let stdio_layer = fmt::layer()
      .with_line_number(true)
      .with_thread_ids(false)
      .with_thread_names(true)
      .with_target(true)
      .with_level(true)
      .compact()
      .with_filter(tracing_subscriber::filter::filter_fn(move |metadata| {
        metadata
          .target()
          .starts_with(env!("CARGO_PKG_NAME").replace('-', "_").as_str())
          || metadata.level() <= &tracing::Level::INFO
      }));
    layers.push(stdio_layer.boxed());
  }

  if !logger_config.logfile.is_empty() {
    let log_file = open_log_file(&logger_config.logfile)?;
    let file_layer = fmt::layer()
      .with_line_number(true)
      .with_thread_names(true)
      .with_target(true)
      .json()
      .with_span_list(false)
      .with_current_span(false)
      .with_writer(log_file);
    layers.push(file_layer.boxed());
  }

  if let Some(query_log_path) = &parsed_opts.query_log_path {
    let query_log_file = open_log_file(query_log_path)?;
    let query_log_layer_base = fmt::layer()
      .with_line_number(false)
      .with_thread_ids(false)
      .with_thread_names(false)
      .with_target(false)
      .with_level(false);

    if parsed_opts.json_query_log {
      let query_log_layer = query_log_layer_base
        .with_timer(fmt::time::ChronoLocal::new("%s".to_string()))
        .json()
        .with_span_list(false)
        .with_current_span(false)
        .with_writer(query_log_file)
        .with_filter(QueryLogFilter);
      layers.push(query_log_layer.boxed());
    } else {
      let query_log_layer = query_log_layer_base
        .compact()
        .with_ansi(false)
        .with_writer(query_log_file)
        .with_filter(QueryLogFilter);
      layers.push(query_log_layer.boxed());
    }
    println!("Query logging is enabled");
  }

  tracing_subscriber::registry()
    .with(global_level_filter)
    .with(layers)
    .try_init()
    .map_err(|e| anyhow!("Failed to initialize logger: {e}"))
}

/// Query log filter
struct QueryLogFilter;
impl<S> tracing_subscriber::layer::Filter<S> for QueryLogFilter {
  fn enabled(&self, metadata: &tracing::Metadata<'_>, _: &tracing_subscriber::layer::Context<'_, S>) -> bool {
    metadata
      .target()
      .starts_with(env!("CARGO_PKG_NAME").replace('-', "_").as_str())
      && metadata.name().contains(QUERY_LOG_EVENT_NAME)
  }
}

#[inline]
/// Create a file for logging
fn open_log_file(path: &str) -> anyhow::Result<Arc<std::fs::File>> {
  // crate a file if it does not exist
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("Failed to open log file: {path}"))?;
  Ok(Arc::new(file))
}
