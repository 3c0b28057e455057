//! Notifier - pushes presence to the home-automation hub
//!
//! Calls are made only when the snapshot changed or the caller forces them,
//! one per person in config order. The first failure stops the run.

use crate::error::NotifyError;
use crate::models::{PersonRecord, Presence, SystemSnapshot};
use async_trait::async_trait;

/// Default hub endpoint
pub const DEFAULT_BASE_URL: &str = "https://graph-eu01-euwest1.api.smartthings.com";

/// Delivers one person's presence to the hub
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the response body
    async fn notify(
        &self,
        base_url: &str,
        person: &PersonRecord,
        presence: Presence,
    ) -> Result<String, NotifyError>;
}

/// Hub URL for one presence update
pub fn notification_url(base_url: &str, person: &PersonRecord, presence: Presence) -> String {
    format!(
        "{}/api/smartapps/installations/{}/Phone/{}?access_token={}",
        base_url.trim_end_matches('/'),
        person.app_id,
        presence,
        person.token
    )
}

/// HTTP notifier for the SmartThings smartapp endpoint
#[derive(Debug, Clone, Default)]
pub struct SmartThingsNotifier {
    client: reqwest::Client,
}

impl SmartThingsNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SmartThingsNotifier {
    async fn notify(
        &self,
        base_url: &str,
        person: &PersonRecord,
        presence: Presence,
    ) -> Result<String, NotifyError> {
        let url = notification_url(base_url, person, presence);
        let request_error = |source: reqwest::Error| NotifyError::Request {
            person: person.name.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                person: person.name.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

/// One completed hub call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub person: String,
    pub presence: Presence,
    pub body: String,
}

/// Notify every person if the snapshot changed or `force` is set
///
/// Returns the deliveries made, empty when nothing was sent.
pub async fn notify_all<N>(
    notifier: &N,
    snapshot: &SystemSnapshot,
    force: bool,
) -> Result<Vec<Delivery>, NotifyError>
where
    N: Notifier + ?Sized,
{
    if !snapshot.changed && !force {
        return Ok(Vec::new());
    }

    let mut deliveries = Vec::with_capacity(snapshot.people.len());
    for person in &snapshot.people {
        let presence = person.presence();
        let body = notifier
            .notify(&snapshot.base_url, person, presence)
            .await?;
        deliveries.push(Delivery {
            person: person.name.clone(),
            presence,
            body,
        });
    }

    Ok(deliveries)
}
