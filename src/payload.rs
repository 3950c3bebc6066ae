//! Builds the outgoing slack payload from a notification.
//!
//! Payload construction is partial-information tolerant: a message body that
//! isn't alarm json becomes a plain text message, an unusable trigger drops
//! the author line, a missing subject drops the pretext. No combination of
//! missing fields aborts the build.

use serde::Serialize;

use crate::{
    alarm::{AlarmMessage, Trigger},
    event::SnsNotification,
};

/// attachment color for alarms entering the ALARM state
pub const COLOR_ALARM: &str = "#e60000";
/// attachment color for every other state transition
pub const COLOR_OK: &str = "#36a64f";

/// message body posted to the webhook
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SlackPayload {
    /// structured message, the normal case
    Attachments { attachments: Vec<Attachment> },
    /// plain text fallback for bodies that aren't alarm json
    Text { text: String },
    /// nothing to say, the record carried no message body. serializes as
    /// a bare `{}`
    Empty {},
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
}

impl SlackPayload {
    /// payload for a record without a message body
    pub fn empty() -> Self {
        Self::Empty {}
    }

    /// Builds the attachment for a parsed alarm.
    ///
    /// # Arguments
    ///
    /// * `alarm` - the parsed alarm state change
    ///
    /// * `subject` - subject of the sns notification, attached as pretext if
    ///   present
    pub fn from_alarm(alarm: &AlarmMessage, subject: Option<&str>) -> Self {
        let author = author_line(alarm.trigger.as_ref());
        if author.is_none() {
            tracing::debug!(alarm = %alarm.alarm_name, "no usable trigger data, omitting author line");
        }

        let color = match alarm.new_state_value.as_deref() {
            Some(state) => Some(state_color(state).to_owned()),
            None => {
                tracing::debug!(alarm = %alarm.alarm_name, "no state value, omitting color");
                None
            }
        };

        let attachment = Attachment {
            fallback: alarm.alarm_name.clone(),
            title: alarm.alarm_description.clone(),
            text: alarm.new_state_reason.clone(),
            color,
            author,
            pretext: subject.map(str::to_owned),
        };

        Self::Attachments { attachments: vec![attachment] }
    }

    /// Plain text payload built from the raw message body, used when the
    /// body isn't alarm json (sns test messages for example).
    pub fn plain_fallback(subject: Option<&str>, raw_message: &str) -> Self {
        let text = match subject {
            Some(subject) => format!("{subject}: {raw_message}"),
            None => raw_message.to_owned(),
        };

        Self::Text { text }
    }
}

/// Formats the author line from trigger data. Returns [None] if the trigger
/// is absent, a key is missing or the dimension list is empty; only the
/// first dimension is used.
pub fn author_line(trigger: Option<&Trigger>) -> Option<String> {
    let trigger = trigger?;

    let namespace = trigger.namespace.as_deref()?;
    let metric = trigger.metric_name.as_deref()?;
    let dimension = trigger.dimensions.first()?;
    let dim_name = dimension.name.as_deref()?;
    let dim_value = dimension.value.as_deref()?;

    Some(format!("Namespace: {namespace} || Metric: {metric} on {dim_name} {dim_value}"))
}

/// red for ALARM, green for everything else (OK, INSUFFICIENT_DATA, ...)
pub fn state_color(new_state_value: &str) -> &'static str {
    if new_state_value == "ALARM" {
        COLOR_ALARM
    } else {
        COLOR_OK
    }
}

/// Builds the payload for one sns notification. This is the transformation
/// step of the relay; it never fails.
pub fn build_payload(sns: &SnsNotification) -> SlackPayload {
    let raw = match sns.message.as_deref() {
        Some(raw) => raw,
        None => return SlackPayload::empty(),
    };

    match serde_json::from_str::<AlarmMessage>(raw) {
        Ok(alarm) => SlackPayload::from_alarm(&alarm, sns.subject.as_deref()),
        Err(err) => {
            tracing::warn!(error = %err, "message body is not alarm json, falling back to plain text");
            SlackPayload::plain_fallback(sns.subject.as_deref(), raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::Dimension;

    fn rds_alarm() -> AlarmMessage {
        AlarmMessage {
            alarm_name: String::from("RDS: svc-ca-backend-prod High Connections"),
            alarm_description: String::from(
                "svc-ca-backend-prod is considered to have a high number of connections",
            ),
            new_state_reason: String::from("Threshold Crossed: 1 out of the last 1 datapoints [75.0 (24/09/19 21:32:00)] was greater than the threshold (25.0) (minimum 1 datapoint for OK -> ALARM transition)."),
            new_state_value: Some(String::from("ALARM")),
            trigger: Some(Trigger {
                namespace: Some(String::from("AWS/RDS")),
                metric_name: Some(String::from("DatabaseConnections")),
                dimensions: vec![Dimension {
                    name: Some(String::from("DBClusterIdentifier")),
                    value: Some(String::from("svc-ca-backend-prod-cluster")),
                }],
            }),
        }
    }

    #[test]
    fn author_line_for_rds_trigger() {
        let alarm = rds_alarm();

        assert_eq!(
            author_line(alarm.trigger.as_ref()).unwrap(),
            "Namespace: AWS/RDS || Metric: DatabaseConnections on DBClusterIdentifier svc-ca-backend-prod-cluster"
        );
    }

    #[test]
    fn author_line_degrades_to_none() {
        assert!(author_line(None).is_none());

        let mut trigger = rds_alarm().trigger.unwrap();
        trigger.dimensions.clear();
        assert!(author_line(Some(&trigger)).is_none());

        let mut trigger = rds_alarm().trigger.unwrap();
        trigger.namespace = None;
        assert!(author_line(Some(&trigger)).is_none());

        let mut trigger = rds_alarm().trigger.unwrap();
        trigger.metric_name = None;
        assert!(author_line(Some(&trigger)).is_none());

        let mut trigger = rds_alarm().trigger.unwrap();
        trigger.dimensions[0].name = None;
        assert!(author_line(Some(&trigger)).is_none());

        let mut trigger = rds_alarm().trigger.unwrap();
        trigger.dimensions[0].value = None;
        assert!(author_line(Some(&trigger)).is_none());
    }

    #[test]
    fn color_is_red_for_alarm_green_otherwise() {
        assert_eq!(state_color("ALARM"), COLOR_ALARM);
        assert_eq!(state_color("OK"), COLOR_OK);
        assert_eq!(state_color("INSUFFICIENT_DATA"), COLOR_OK);
    }

    #[test]
    fn attachment_for_rds_alarm() {
        let alarm = rds_alarm();
        let subject = "ALARM: \"RDS: svc-ca-backend-prod High Connections\" in US East (N. Virginia)";

        let payload = SlackPayload::from_alarm(&alarm, Some(subject));
        let attachments = match payload {
            SlackPayload::Attachments { attachments } => attachments,
            SlackPayload::Text { .. } | SlackPayload::Empty {} => {
                panic!("expected attachment payload")
            }
        };

        assert_eq!(attachments.len(), 1);
        let attachment = &attachments[0];
        assert_eq!(attachment.fallback, "RDS: svc-ca-backend-prod High Connections");
        assert_eq!(attachment.color.as_deref(), Some(COLOR_ALARM));
        assert_eq!(
            attachment.author.as_deref(),
            Some("Namespace: AWS/RDS || Metric: DatabaseConnections on DBClusterIdentifier svc-ca-backend-prod-cluster")
        );
        assert_eq!(attachment.pretext.as_deref(), Some(subject));
    }

    #[test]
    fn missing_state_value_keeps_attachment_without_color() {
        let mut alarm = rds_alarm();
        alarm.new_state_value = None;

        let payload = SlackPayload::from_alarm(&alarm, None);
        let json = serde_json::to_value(&payload).unwrap();

        let attachment = &json["attachments"][0];
        assert_eq!(attachment["fallback"], "RDS: svc-ca-backend-prod High Connections");
        assert!(attachment.get("color").is_none());
        assert!(attachment.get("author").is_some());
    }

    #[test]
    fn dimension_without_name_keeps_attachment_without_author() {
        let mut alarm = rds_alarm();
        alarm.trigger.as_mut().unwrap().dimensions[0].name = None;

        let payload = SlackPayload::from_alarm(&alarm, None);
        let json = serde_json::to_value(&payload).unwrap();

        let attachment = &json["attachments"][0];
        assert_eq!(attachment["color"], COLOR_ALARM);
        assert!(attachment.get("author").is_none());
    }

    #[test]
    fn attachment_without_trigger_still_builds() {
        let mut alarm = rds_alarm();
        alarm.trigger = None;

        let payload = SlackPayload::from_alarm(&alarm, None);
        let json = serde_json::to_value(&payload).unwrap();

        let attachment = &json["attachments"][0];
        assert_eq!(attachment["fallback"], "RDS: svc-ca-backend-prod High Connections");
        assert!(attachment.get("author").is_none());
        assert!(attachment.get("pretext").is_none());
    }

    #[test]
    fn plain_fallback_concatenates_subject_and_body() {
        let payload = SlackPayload::plain_fallback(Some("subject"), "raw body");
        assert_eq!(payload, SlackPayload::Text { text: String::from("subject: raw body") });

        let payload = SlackPayload::plain_fallback(None, "raw body");
        assert_eq!(payload, SlackPayload::Text { text: String::from("raw body") });
    }

    #[test]
    fn build_payload_falls_back_for_non_alarm_body() {
        let sns = crate::event::SnsNotification {
            subject: Some(String::from("test")),
            message: Some(String::from("not json at all")),
        };

        assert_eq!(
            build_payload(&sns),
            SlackPayload::Text { text: String::from("test: not json at all") }
        );
    }

    #[test]
    fn build_payload_is_empty_without_message() {
        let sns = crate::event::SnsNotification { subject: None, message: None };

        let json = serde_json::to_value(build_payload(&sns)).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
