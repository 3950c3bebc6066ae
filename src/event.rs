//! data structures for deserializing incoming sns event records
use serde::Deserialize;

/// the only event source the relay accepts
pub const SNS_EVENT_SOURCE: &str = "aws:sns";

/// envelope posted by sns, carries one or more records
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsEvent {
    pub records: Vec<SnsRecord>,
}

/// a single record of the envelope
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsRecord {
    pub event_source: String,
    pub sns: SnsNotification,
}

/// the notification inside a record. `message` is expected to hold alarm
/// json but may be anything (sns test messages for example)
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsNotification {
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_envelope_and_ignores_unknown_fields() {
        let raw = r#"{
            "Records": [{
                "EventSource": "aws:sns",
                "EventVersion": "1.0",
                "Sns": {
                    "Type": "Notification",
                    "Subject": "hello",
                    "Message": "{}",
                    "Timestamp": "2019-09-24T21:33:49.403Z"
                }
            }]
        }"#;

        let event: SnsEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.records.len(), 1);

        let record = &event.records[0];
        assert_eq!(record.event_source, SNS_EVENT_SOURCE);
        assert_eq!(record.sns.subject.as_deref(), Some("hello"));
        assert_eq!(record.sns.message.as_deref(), Some("{}"));
    }

    #[test]
    fn subject_and_message_are_optional() {
        let raw = r#"{ "EventSource": "aws:sns", "Sns": {} }"#;

        let record: SnsRecord = serde_json::from_str(raw).unwrap();
        assert!(record.sns.subject.is_none());
        assert!(record.sns.message.is_none());
    }
}
