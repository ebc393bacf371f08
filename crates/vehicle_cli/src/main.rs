//! Command-line entry point for the vehicle query surface.
//!
//! - No argument: print version and the resolved database path.
//! - One argument: run it as a JSON field request and print the response.

use log::info;
use std::process::ExitCode;
use vehicle_api::{execute_json, open_configured_db, ApiConfig};

fn main() -> ExitCode {
    let config = ApiConfig::from_env();
    let mut args = std::env::args().skip(1);

    let Some(request) = args.next() else {
        println!("vehicle_core version={}", vehicle_core::core_version());
        println!("db_path={}", config.db_path.display());
        return ExitCode::SUCCESS;
    };
    if args.next().is_some() {
        eprintln!("usage: vehicle_cli ['<json field request>']");
        return ExitCode::from(2);
    }

    let conn = match open_configured_db(&config) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    info!("event=cli_request module=cli status=start");
    println!("{}", execute_json(&conn, &config, &request));
    ExitCode::SUCCESS
}
