//! `vault`: interactive password-envelope shell.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Create the passphrase session and credential service.
//! 4. Run the shell on stdin/stdout until EOF or `quit`.

use anyhow::Result;
use tracing::info;

use vault::config::Config;
use vault::credentials::CredentialService;
use vault::session::PassphraseSession;
use vault::shell::{Shell, TerminalPrompt};
use vault::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        passphrase_ttl_ms = cfg.passphrase_ttl_ms,
        max_prompt_attempts = cfg.max_prompt_attempts,
        "vault starting"
    );

    // -----------------------------------------------------------------------
    // 3. Session + credential service
    // -----------------------------------------------------------------------
    let session = PassphraseSession::new(cfg.passphrase_ttl());
    let service = CredentialService::new(session.clone(), TerminalPrompt, cfg.max_prompt_attempts);

    // -----------------------------------------------------------------------
    // 4. Shell
    // -----------------------------------------------------------------------
    eprintln!("vault {} - type `help` for commands", env!("CARGO_PKG_VERSION"));
    let shell = Shell::new(service, cfg.generated_password_len);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell.run(stdin, tokio::io::stdout()).await?;

    session.clear_passphrase().await;
    info!("vault exiting");
    Ok(())
}
