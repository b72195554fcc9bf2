use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::error::{Result, ShowcaseError};
use crate::core::pages::Page;

pub const HELP: &str = "\
helmet-showcase

USAGE:
  helmet-showcase [OPTIONS]

OPTIONS:
  -c, --config <PATH>   Load settings from a TOML file (default: ./showcase.toml if present)
  -p, --page <PAGE>     Start on 'frames' (scroll sequence) or 'viewer' (3D model)
  -h, --help            Print this help

KEYS:
  1 / 2 / Tab           Show frames / show viewer / toggle
";

#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub page: Option<Page>,
    pub help: bool,
}

pub fn parse_env() -> Result<CliArgs> {
    parse_from(std::env::args_os().skip(1).collect())
}

pub fn parse_from(args: Vec<OsString>) -> Result<CliArgs> {
    let mut args = pico_args::Arguments::from_vec(args);
    let help = args.contains(["-h", "--help"]);
    let config = args.opt_value_from_os_str(["-c", "--config"], |s| {
        Ok::<PathBuf, String>(PathBuf::from(s))
    })?;
    let page = args.opt_value_from_fn(["-p", "--page"], |s| s.parse::<Page>())?;

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(ShowcaseError::Cli(format!(
            "unexpected arguments: {}",
            rest.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        )));
    }

    Ok(CliArgs { config, page, help })
}
