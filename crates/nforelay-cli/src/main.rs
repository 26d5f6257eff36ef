//! Binary entrypoint for the nforelay post-processor.

use std::process;

fn main() {
    let exit_code = nforelay_cli::run();
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
