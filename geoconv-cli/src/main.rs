use std::process;

use env_logger::Env;
use log::error;

mod cli;
mod commands;
mod config;
mod error;

fn main() {
    let matches = cli::build().get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match commands::run(&matches) {
        Ok(line) => println!("{}", line),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
