//! Command-line interface of the `paste` binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncReadExt;

/// Encrypt text locally and share it through a paste server.
#[derive(Debug, Parser)]
#[command(name = "paste", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt text and upload it; prints the paste URL.
    Submit(SubmitArgs),
    /// Decrypt an envelope with the key from a paste URL.
    Open(OpenArgs),
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// File to upload; reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Mark the paste as code.
    #[arg(long)]
    pub code: bool,

    /// Paste server origin (overrides PASTE_SERVER_URL).
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Anti-forgery token (overrides PASTE_CSRF_TOKEN).
    #[arg(long, value_name = "TOKEN")]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Key, `#key` fragment, or the whole paste URL.
    #[arg(long, short)]
    pub key: String,

    /// File holding the envelope; reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

/// Read the whole input from `file`, or stdin when it is absent or `-`.
pub async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_submit_flags() {
        let cli = Cli::try_parse_from([
            "paste",
            "submit",
            "--code",
            "--server",
            "http://localhost:8000",
            "notes.txt",
        ])
        .unwrap();
        match cli.command {
            Command::Submit(args) => {
                assert!(args.code);
                assert_eq!(args.server.as_deref(), Some("http://localhost:8000"));
                assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
                assert!(args.csrf_token.is_none());
            }
            Command::Open(_) => panic!("expected submit"),
        }
    }

    #[test]
    fn submit_defaults_to_stdin_and_plain_text() {
        let cli = Cli::try_parse_from(["paste", "submit"]).unwrap();
        match cli.command {
            Command::Submit(args) => {
                assert!(!args.code);
                assert!(args.file.is_none());
            }
            Command::Open(_) => panic!("expected submit"),
        }
    }

    #[test]
    fn open_requires_key() {
        assert!(Cli::try_parse_from(["paste", "open"]).is_err());
        let cli = Cli::try_parse_from(["paste", "open", "-k", "#abc"]).unwrap();
        assert!(matches!(cli.command, Command::Open(ref a) if a.key == "#abc"));
    }

    #[tokio::test]
    async fn reads_file_input() {
        let file = tempfile::NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), "from file").await.unwrap();
        let text = read_input(Some(file.path())).await.unwrap();
        assert_eq!(text, "from file");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let path = Path::new("/nonexistent/paste-input.txt");
        assert!(read_input(Some(path)).await.is_err());
    }
}
