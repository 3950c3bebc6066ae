//! delivery of the payload to the configured webhook
use std::fmt;

use url::Url;

use crate::payload::SlackPayload;

/// outcome of the (single) delivery attempt of an invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// no webhook configured, nothing was sent
    NotSent,
    /// the webhook answered, with this http status
    Delivered(u16),
    /// the request never got an answer (connection refused, dns, timeout)
    Failed(String),
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSent => write!(f, "No event sent - Failed"),
            Self::Delivered(status) => write!(f, "{status}"),
            Self::Failed(reason) => write!(f, "Delivery failed: {reason}"),
        }
    }
}

/// Posts the payload as json to the webhook. Network errors are returned as
/// [DeliveryStatus::Failed] instead of being propagated, the relay reports
/// them in its summary body.
pub async fn deliver(url: &Url, payload: &SlackPayload) -> DeliveryStatus {
    let client = reqwest::Client::new();

    match client.post(url.clone()).json(payload).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            tracing::info!(%url, status, "posted payload to webhook");
            DeliveryStatus::Delivered(status)
        }
        Err(err) => {
            tracing::error!(%url, error = %err, "failed to post payload to webhook");
            DeliveryStatus::Failed(err.to_string())
        }
    }
}
