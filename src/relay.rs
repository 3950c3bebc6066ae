//! The notification transformer.
//!
//! One invocation takes one sns record, builds exactly one payload and
//! attempts exactly one delivery. Every recoverable condition (non-alarm
//! body, unusable trigger, network error) degrades the payload or the
//! summary instead of aborting; only an unsupported event source is
//! terminal, and even that is returned as a value.

use serde::Serialize;
use thiserror::Error;

use crate::{
    event::{SnsRecord, SNS_EVENT_SOURCE},
    payload::{self, SlackPayload},
    settings::Settings,
    webhook::{self, DeliveryStatus},
};

/// error body of a rejected invocation
pub const UNSUPPORTED_SOURCE_BODY: &str = "Unable to process incompatible EventSource!";

/// terminal errors of an invocation
#[derive(Error, Debug)]
pub enum RelayError {
    /// the record did not come from sns
    #[error("unable to process incompatible event source {0:?}")]
    UnsupportedSource(String),
}

/// what the caller gets back, mirrors a lambda proxy response
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub status_code: u16,
    /// json encoded human readable summary or error message
    pub body: String,
}

impl RelayResponse {
    /// response for a rejected event source
    fn unsupported_source() -> Self {
        Self { status_code: 500, body: json_string(UNSUPPORTED_SOURCE_BODY) }
    }

    /// success response summarizing payload, target and delivery outcome
    fn sent(payload: &SlackPayload, webhook_url: Option<&url::Url>, status: &DeliveryStatus) -> Self {
        // SlackPayload only contains strings, serialization can't fail
        let payload_json = serde_json::to_string(payload).unwrap_or_default();
        let hook = webhook_url.map(url::Url::as_str).unwrap_or_default();

        let summary =
            format!("Sent the following to slack: {payload_json}\nHook: {hook}\nResponse: {status}");

        Self { status_code: 200, body: json_string(&summary) }
    }
}

/// json encode a bare string, like the summary body of the response
fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

fn check_source(record: &SnsRecord) -> Result<(), RelayError> {
    if record.event_source != SNS_EVENT_SOURCE {
        return Err(RelayError::UnsupportedSource(record.event_source.clone()));
    }

    Ok(())
}

/// Relays one record: build the payload, deliver it if a webhook is
/// configured, report the outcome. Never returns an error; rejection and
/// delivery failures are part of the [RelayResponse].
pub async fn relay_record(record: &SnsRecord, settings: &Settings) -> RelayResponse {
    if let Err(err) = check_source(record) {
        tracing::warn!(error = %err, "rejecting record");
        return RelayResponse::unsupported_source();
    }

    let payload = payload::build_payload(&record.sns);

    let status = match settings.webhook_url.as_ref() {
        Some(url) => webhook::deliver(url, &payload).await,
        None => {
            tracing::info!("no webhook url configured, skipping delivery");
            DeliveryStatus::NotSent
        }
    };

    RelayResponse::sent(&payload, settings.webhook_url.as_ref(), &status)
}
