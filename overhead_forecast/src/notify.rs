use tracing::{info, warn};

use crate::{
    config::{NotifySettings, USER_AGENT},
    error::ApplicationResult,
};

pub(crate) trait Notify {
    /// Never fails: anything that cannot be delivered ends up on stdout.
    async fn deliver(&self, message: &str);
}

/// Posts the message as the raw body to an ntfy topic, or prints it when no
/// topic is configured.
pub(crate) struct NtfyNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl NtfyNotifier {
    pub fn new(settings: &NotifySettings) -> ApplicationResult<Self> {
        let endpoint = settings.endpoint();
        if settings.enabled && endpoint.is_none() {
            warn!("Notifications are enabled but server or topic is missing, printing instead");
        }
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn dry_run(self) -> Self {
        Self {
            endpoint: None,
            ..self
        }
    }

    async fn post(&self, endpoint: &str, message: &str) -> reqwest::Result<()> {
        self.client
            .post(endpoint)
            .body(message.to_owned())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl Notify for NtfyNotifier {
    async fn deliver(&self, message: &str) {
        let Some(endpoint) = &self.endpoint else {
            println!("{message}");
            return;
        };
        match self.post(endpoint, message).await {
            Ok(()) => info!(%endpoint, "Notification delivered"),
            Err(e) => {
                warn!(%endpoint, "Failed to deliver notification: {e}");
                println!("{message}");
            }
        }
    }
}
