use crate::constants::DEFAULT_CONFIG_PATH;
use clap::{Arg, ArgAction, Command};

/// Parsed options
pub struct Opts {
  /// Configuration file path
  pub config_file_path: String,
  /// Query log path
  pub query_log_path: Option<String>,
  /// Query log in json format
  pub json_query_log: bool,
}

/// Parse arg values passed from cli
pub fn parse_opts() -> Result<Opts, anyhow::Error> {
  let _ = include_str!("../../Cargo.toml");
  let options = clap::command!()
    .subcommand_required(true)
    .arg_required_else_help(true)
    .arg(
      Arg::new("config_file")
        .long("config")
        .short('c')
        .value_name("FILE")
        .global(true)
        .default_value(DEFAULT_CONFIG_PATH)
        .help("Configuration file path like ./config-doh-translator.toml"),
    )
    .arg(
      Arg::new("query_log")
        .long("query-log")
        .short('q')
        .value_name("PATH")
        .global(true)
        .help("Enable query logging. Unless specified, it is disabled."),
    )
    .arg(
      Arg::new("json_query_log")
        .long("json-query-log")
        .short('j')
        .action(ArgAction::SetTrue)
        .global(true)
        .requires("query_log")
        .help("Enable query logging in json format. Unless specified, it is recorded in human-readable compact format. Must be used with --query-log option."),
    )
    .subcommand(Command::new("start").about("start the DoH translator"));
  let matches = options.get_matches();

  ///////////////////////////////////
  let Some(("start", sub_matches)) = matches.subcommand() else {
    anyhow::bail!("Unknown subcommand");
  };
  let config_file_path = sub_matches
    .get_one::<String>("config_file")
    .map(|s| s.to_owned())
    .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
  let query_log_path = sub_matches.get_one::<String>("query_log").map(|s| s.to_owned());
  let json_query_log = *sub_matches.get_one::<bool>("json_query_log").unwrap_or(&false);

  Ok(Opts {
    config_file_path,
    query_log_path,
    json_query_log,
  })
}
