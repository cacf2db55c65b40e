use anyhow::Context;

use super::Command;
use crate::core::drive_integration::{
    DriveIntegrationService, HttpTransport, IntegrationStatus, TokenProvider,
};

/// Run one command and return the text to print.
pub async fn run<T, P>(
    command: &Command,
    service: &DriveIntegrationService<T, P>,
) -> anyhow::Result<String>
where
    T: HttpTransport,
    P: TokenProvider,
{
    match command {
        Command::Status { json } => {
            let status = service.get_status().await?;
            if *json {
                Ok(serde_json::to_string_pretty(&status)?)
            } else {
                Ok(describe_status(&status))
            }
        }
        Command::AuthUrl { open: launch } => {
            let auth = service.get_auth_url().await?;
            if *launch {
                tracing::info!("Opening OAuth consent page in browser");
                open::that(&auth.url).context("Failed to open browser")?;
            }
            Ok(auth.url)
        }
        Command::Disconnect => {
            service.disconnect().await?;
            Ok("disconnected".to_string())
        }
        Command::Config => Ok(service.config().base_url().to_string()),
    }
}

pub fn describe_status(status: &IntegrationStatus) -> String {
    match (status.connected, status.email.as_deref()) {
        (true, Some(email)) => format!("connected as {}", email),
        (true, None) => "connected".to_string(),
        (false, _) => "not connected".to_string(),
    }
}
