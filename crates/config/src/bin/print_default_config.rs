//! Print the default config (environment applied) as stored JSON.

use ragpolicy_config::{ConfigEnv, DefaultConfigBuilder};
use std::io;
use std::io::Write;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::ExitCode::from(1)
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env = ConfigEnv::from_std_env()?;
    let document = DefaultConfigBuilder::from_env(&env).build()?;

    let mut output = serde_json::to_string_pretty(&document)?;
    output.push('\n');

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
