//! data structures for deserializing the cloudwatch alarm json embedded in
//! an sns message body
use serde::Deserialize;

/// alarm state change as published by cloudwatch. `new_state_value` is
/// optional so its absence only costs the attachment color, not the whole
/// attachment
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmMessage {
    pub alarm_name: String,
    pub alarm_description: String,
    pub new_state_reason: String,
    pub new_state_value: Option<String>,
    pub trigger: Option<Trigger>,
}

/// the metric definition that fired the alarm. all fields are optional so a
/// partially filled trigger degrades the author line instead of failing the
/// whole alarm parse
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trigger {
    pub namespace: Option<String>,
    pub metric_name: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
}

/// optional fields for the same reason as the trigger: a dimension without
/// a name or value only drops the author line
#[derive(Clone, Debug, Deserialize)]
pub struct Dimension {
    pub name: Option<String>,
    pub value: Option<String>,
}
