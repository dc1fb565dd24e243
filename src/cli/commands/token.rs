use anyhow::{bail, Context};
use chrono::Duration;
use serde_json::json;

use crate::auth::{issue_token, permission, TokenRequest};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(
    config: &AppConfig,
    permissions: Vec<String>,
    subject: String,
    ttl_minutes: i64,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .context("AUTH_JWT_SECRET must be set to mint tokens")?;

    if ttl_minutes <= 0 {
        bail!("--ttl-minutes must be positive");
    }
    let ttl = Duration::try_minutes(ttl_minutes).context("--ttl-minutes is too large")?;

    for p in &permissions {
        if !permission::ALL.contains(&p.as_str()) {
            tracing::warn!("'{}' is not a permission any catalogue route checks", p);
        }
    }

    let mut request = TokenRequest::new(subject, permissions);
    request.issuer = config.auth.issuer();
    request.audience = config.auth.audience.clone();
    request.ttl = ttl;

    let token = issue_token(secret, &request)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "token": token,
                "subject": request.subject,
                "permissions": request.permissions,
                "expires_in": ttl.num_seconds(),
            })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
