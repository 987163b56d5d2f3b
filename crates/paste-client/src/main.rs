//! `paste` — encrypted paste client entry point.
//!
//! `paste submit` sequence:
//! 1. Load and validate [`Config`] from the environment and flags.
//! 2. Initialise structured JSON logging (stderr).
//! 3. Read the text from a file or stdin.
//! 4. Build the HTTP transport and resolve the CSRF token.
//! 5. Encrypt, upload, and print the paste URL on stdout.
//!
//! Failures exit with the code from [`SubmitError::exit_code`], or 1.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use common::SubmitError;
use tracing::info;

use cli::{Cli, Command, OpenArgs, SubmitArgs};
use paste_client::{
    config::{Config, Overrides},
    crypto::{decrypt_text, PasteKey},
    telemetry,
    transport::{resolve_csrf_token, HttpTransport},
    Submitter,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Submit(args) => submit(args).await,
        Command::Open(args) => open(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            let code = e
                .downcast_ref::<SubmitError>()
                .map_or(1, SubmitError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn submit(args: SubmitArgs) -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::load(&Overrides {
        server_url: args.server,
        csrf_token: args.csrf_token,
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        server = %cfg.server_url,
        "paste starting"
    );

    // -----------------------------------------------------------------------
    // 3. Input
    // -----------------------------------------------------------------------
    let text = cli::read_input(args.file.as_deref()).await?;

    // -----------------------------------------------------------------------
    // 4. Transport + CSRF token
    // -----------------------------------------------------------------------
    let transport = HttpTransport::new(&cfg.server_url, cfg.request_timeout())?
        .with_upload_path(cfg.upload_path.clone())
        .with_csrf_cookie_name(cfg.csrf_cookie_name.clone());
    let csrf_token = resolve_csrf_token(&transport, cfg.csrf_token.as_deref()).await?;

    // -----------------------------------------------------------------------
    // 5. Encrypt + upload
    // -----------------------------------------------------------------------
    let submitter = Submitter::new(transport)
        .with_key_length(cfg.key_length)
        .with_iterations(cfg.kdf_iterations);
    let location = submitter.submit(&text, args.code, &csrf_token).await?;

    println!("{}", location.url(submitter.transport().base_url()));
    Ok(())
}

async fn open(args: OpenArgs) -> Result<()> {
    telemetry::init("warn")?;

    let key = PasteKey::from_fragment(&args.key).context("invalid --key")?;
    let envelope = cli::read_input(args.file.as_deref()).await?;
    let text = decrypt_text(&envelope, &key).context("failed to decrypt paste")?;

    print!("{text}");
    Ok(())
}
