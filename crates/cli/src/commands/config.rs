//! Configuration check command.
//!
//! Loads the server configuration exactly as `bizdesk-server` would at
//! startup and reports the result. Secrets are never printed.

use bizdesk_server::config::{AdminPassword, ConfigError, ServerConfig};

/// Load the configuration and print a summary.
///
/// # Errors
///
/// Returns the `ConfigError` the server would fail to start with.
pub fn check() -> Result<(), ConfigError> {
    let config = ServerConfig::from_env()?;

    let admin_password = match config.admin.password {
        AdminPassword::Hash(_) => "argon2 hash",
        AdminPassword::Plain(_) => "plain (hashed at startup)",
        AdminPassword::Generated(_) => "not set (generated at startup)",
    };
    let mail = config.mail.as_ref().map_or_else(
        || "disabled (MAIL_USERNAME/MAIL_PASSWORD not set)".to_string(),
        |mail| {
            format!(
                "{}:{} -> {}",
                mail.smtp_host, mail.smtp_port, mail.feedback_recipient
            )
        },
    );

    #[allow(clippy::print_stdout)]
    {
        println!("Configuration OK");
        println!("  listen:         {}", config.socket_addr());
        println!("  base url:       {}", config.base_url);
        println!("  secure cookies: {}", config.is_secure());
        println!("  admin user:     {}", config.admin.username);
        println!("  admin password: {admin_password}");
        println!("  low stock:      below {}", config.low_stock_threshold);
        println!("  feedback mail:  {mail}");
        println!(
            "  sentry:         {}",
            if config.sentry_dsn.is_some() { "enabled" } else { "disabled" }
        );
    }

    tracing::info!("Configuration check passed");
    Ok(())
}
