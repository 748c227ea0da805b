//! configure command - Store credentials
//!
//! Prompts for any credential not given on the command line and writes the
//! credential file.

use clap::Args;
use console::Term;
use s3sync_core::{ConfigManager, Credentials};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Store access credentials
#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Access key ID
    #[arg(long)]
    pub access_key: Option<String>,

    /// Secret access key
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Region, for example us-east-1
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConfigureOutput {
    status: &'static str,
    config_path: String,
    region: String,
}

/// Execute the configure command
pub async fn execute(args: ConfigureArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let term = Term::stderr();
    let credentials = match read_credentials(args, &term) {
        Ok(credentials) => credentials,
        Err(e) => {
            formatter.error(&format!("Failed to read credentials: {e}"));
            return ExitCode::UsageError;
        }
    };

    if let Err(e) = manager.save(&credentials) {
        formatter.error(&format!("Failed to save credentials: {e}"));
        return ExitCode::from_error(&e);
    }

    if formatter.is_json() {
        formatter.json(&ConfigureOutput {
            status: "success",
            config_path: manager.config_path().display().to_string(),
            region: credentials.region,
        });
    } else {
        formatter.success(&format!(
            "Credentials saved to {}",
            manager.config_path().display()
        ));
    }
    ExitCode::Success
}

fn read_credentials(args: ConfigureArgs, term: &Term) -> std::io::Result<Credentials> {
    let access_key = match args.access_key {
        Some(value) => value,
        None => prompt(term, "Access key: ", false)?,
    };
    let secret_key = match args.secret_key {
        Some(value) => value,
        None => prompt(term, "Secret key: ", true)?,
    };
    let region = match args.region {
        Some(value) => value,
        None => prompt(term, "Region: ", false)?,
    };
    Ok(Credentials::new(access_key, secret_key, region))
}

fn prompt(term: &Term, label: &str, secret: bool) -> std::io::Result<String> {
    term.write_str(label)?;
    let line = if secret {
        term.read_secure_line()?
    } else {
        term.read_line()?
    };
    Ok(line.trim().to_string())
}
