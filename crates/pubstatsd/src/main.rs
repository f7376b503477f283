//! Binary entrypoint for the statistics daemon.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match pubstatsd::run_server() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(io::stderr().lock(), "pubstatsd: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
