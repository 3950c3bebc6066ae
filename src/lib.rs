//! relays cloudwatch alarm notifications delivered via sns into a slack webhook
//!
//! Features:
//! - turns the alarm json embedded in an sns record into a slack attachment
//! - degrades to a plain text message if the record carries something that
//!   isn't alarm json
//! - tolerates missing trigger data and missing subjects without dropping
//!   the notification

pub mod alarm;
pub mod event;
pub mod log;
pub mod payload;
pub mod relay;
pub mod settings;
pub mod webhook;
