//! Interactive mode for the server.
//!
//! Prompts the user for bind address, port, and AI provider before
//! starting the server.

use dialoguer::{Confirm, Input, Select};

/// Provider menu entries. The first entry leaves `AI_PROVIDER` unset so
/// the server auto-detects from the configured API keys.
const PROVIDER_CHOICES: &[&str] = &["Auto-detect", "anthropic", "openai"];

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a bind address, port, and AI provider, sets the
/// corresponding environment variables (`BIND_ADDR`, `PORT`,
/// `AI_PROVIDER`), and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("City Watch Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let provider_idx = Select::new()
        .with_prompt("AI provider")
        .items(PROVIDER_CHOICES)
        .default(0)
        .interact()
        .unwrap_or(0);

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        if provider_idx > 0 {
            std::env::set_var("AI_PROVIDER", PROVIDER_CHOICES[provider_idx]);
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
