#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod config;
mod constants;
mod error;
mod log;

use crate::{
  config::{parse_opts, ConfigToml},
  log::*,
};
use doh_translator_lib::{entrypoint, ProxyConfig};
use tokio_util::sync::CancellationToken;

fn main() {
  let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
  runtime_builder.enable_all();
  runtime_builder.thread_name("doh-translator");
  let runtime = match runtime_builder.build() {
    Ok(runtime) => runtime,
    Err(e) => {
      eprintln!("Failed to build tokio runtime: {e}");
      std::process::exit(1);
    }
  };

  runtime.block_on(async {
    let parsed_opts = match parse_opts() {
      Ok(v) => v,
      Err(e) => {
        eprintln!("Invalid arguments: {e}");
        std::process::exit(1);
      }
    };

    let config_toml = match ConfigToml::new(&parsed_opts.config_file_path) {
      Ok(v) => v,
      Err(e) => {
        eprintln!("Invalid toml file: {e:#}");
        std::process::exit(1);
      }
    };

    if let Err(e) = init_logger(&parsed_opts, &config_toml.logger()) {
      eprintln!("{e:#}");
      std::process::exit(1);
    }

    if let Err(e) = translator_service(&config_toml, runtime.handle().clone()).await {
      error!("translator service exited: {e}");
      std::process::exit(1);
    }
  });
}

async fn translator_service(config_toml: &ConfigToml, runtime_handle: tokio::runtime::Handle) -> Result<(), anyhow::Error> {
  info!("Starting DOH translator HTTP proxy server");
  let proxy_conf = match config_toml.try_into() as Result<ProxyConfig, anyhow::Error> {
    Ok(v) => v,
    Err(e) => {
      error!("Invalid configuration: {e}");
      return Err(anyhow::anyhow!(e));
    }
  };

  let cancel = CancellationToken::new();
  runtime_handle.spawn(wait_for_signal(cancel.clone()));

  let res = entrypoint(&proxy_conf, &runtime_handle, cancel)
    .await
    .map_err(|e| anyhow::anyhow!(e));
  if res.is_ok() {
    info!("translator: Goodbye!");
  }
  res
}

/// Cancel the token on SIGINT or SIGTERM
async fn wait_for_signal(cancel: CancellationToken) {
  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        warn!("Failed to install SIGTERM handler: {e}");
        std::future::pending::<()>().await;
      }
    }
  };
  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();
  tokio::pin!(terminate);

  tokio::select! {
    res = tokio::signal::ctrl_c() => {
      if let Err(e) = res {
        warn!("Failed to listen for ctrl-c: {e}");
        // keep serving until another signal arrives
        (&mut terminate).await;
      }
    }
    _ = &mut terminate => {}
  }
  info!("Received signal to stop translator, initiating graceful shutdown.");
  cancel.cancel();
}
