//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;
use routerisk_cli::CliError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match routerisk_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("routerisk: {err}");
            std::process::exit(1);
        }
    }
}
