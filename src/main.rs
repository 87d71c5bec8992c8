// SPDX-License-Identifier: MPL-2.0
use orthoview::app::{self, paths, Flags, Startup};
use std::process::ExitCode;

const HELP: &str = "\
OrthoView - operation plan and bone positioning viewer

USAGE:
  orthoview [OPTIONS]

OPTIONS:
  --plan <ID>            Operation plan to open
  --server <URL>         Planning server base URL
  --token <TOKEN>        Bearer token (default: $ORTHOVIEW_TOKEN)
  --lang <LOCALE>        UI language, e.g. en-US or fr
  --config-dir <DIR>     Directory holding settings.toml
  --screen <NAME>        Initial screen: model or positioning
  -h, --help             Print this help
";

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let flags = Flags {
        plan: args.opt_value_from_str("--plan")?,
        server: args.opt_value_from_str("--server")?,
        token: args.opt_value_from_str("--token")?,
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        screen: args.opt_value_from_str("--screen")?,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        log::warn!("ignoring unexpected arguments: {rest:?}");
    }
    Ok(Some(flags))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("orthoview=info"))
        .init();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());

    let startup = match Startup::resolve(flags) {
        Ok(startup) => startup,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match app::run(startup) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("application error: {err}");
            ExitCode::FAILURE
        }
    }
}
