//! Delay classification and user-facing notices.
//!
//! The tier boundaries are the contract here: a zero-minute delay is on time,
//! anything under five minutes is minor, five minutes or more is major.

use serde::Serialize;
use utoipa::ToSchema;

use crate::simulation::DelayEvent;

/// Delays of this many minutes or more are classified as major.
pub const MAJOR_DELAY_THRESHOLD_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DelaySeverity {
    OnTime,
    Minor,
    Major,
}

/// Severity of a user-facing notice. Maps onto the three levels the notice
/// surface exposes: an info/success message, a warning banner, and a
/// transient toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Toast,
}

/// One message for the notice surface to display.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub message: String,
}

impl Notice {
    fn toast(icon: &str, message: String) -> Self {
        Self {
            level: NoticeLevel::Toast,
            icon: Some(icon.to_string()),
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            level: NoticeLevel::Warning,
            icon: None,
            message,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            icon: None,
            message: message.into(),
        }
    }
}

pub fn classify(delay_minutes: i64) -> DelaySeverity {
    if delay_minutes == 0 {
        DelaySeverity::OnTime
    } else if delay_minutes < MAJOR_DELAY_THRESHOLD_MINUTES {
        DelaySeverity::Minor
    } else {
        DelaySeverity::Major
    }
}

/// Build the notices for one simulated delay.
///
/// Every tier yields exactly one toast; a major delay additionally gets a
/// warning banner ahead of it.
pub fn notify(event: &DelayEvent) -> Vec<Notice> {
    let DelayEvent {
        stop_name,
        delay_minutes,
    } = event;

    match classify(*delay_minutes) {
        DelaySeverity::OnTime => vec![Notice::toast(
            "✅",
            format!("🟢 The bus at {stop_name} is arriving on time."),
        )],
        DelaySeverity::Minor => vec![Notice::toast(
            "🟡",
            format!(
                "🕒 The bus at {stop_name} is arriving on time (Minor delay of {delay_minutes} minutes)."
            ),
        )],
        DelaySeverity::Major => vec![
            Notice::warning(format!(
                "⚠️ Delay Alert: Bus at {stop_name} delayed by {delay_minutes} minutes."
            )),
            Notice::toast(
                "🚍",
                format!(
                    "⏳ Heads up! The bus at {stop_name} is delayed by {delay_minutes} minutes."
                ),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(delay_minutes: i64) -> DelayEvent {
        DelayEvent {
            stop_name: "Park Street".to_string(),
            delay_minutes,
        }
    }

    #[test]
    fn zero_is_on_time() {
        assert_eq!(classify(0), DelaySeverity::OnTime);
    }

    #[test]
    fn under_five_is_minor() {
        assert_eq!(classify(1), DelaySeverity::Minor);
        assert_eq!(classify(4), DelaySeverity::Minor);
    }

    #[test]
    fn five_and_over_is_major() {
        assert_eq!(classify(5), DelaySeverity::Major);
        assert_eq!(classify(20), DelaySeverity::Major);
    }

    #[test]
    fn on_time_yields_single_toast() {
        let notices = notify(&event(0));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Toast);
        assert_eq!(
            notices[0].message,
            "🟢 The bus at Park Street is arriving on time."
        );
        assert_eq!(notices[0].icon.as_deref(), Some("✅"));
    }

    #[test]
    fn minor_delay_yields_single_toast_with_minutes() {
        let notices = notify(&event(3));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Toast);
        assert_eq!(
            notices[0].message,
            "🕒 The bus at Park Street is arriving on time (Minor delay of 3 minutes)."
        );
    }

    #[test]
    fn major_delay_adds_warning_banner() {
        let notices = notify(&event(12));
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(
            notices[0].message,
            "⚠️ Delay Alert: Bus at Park Street delayed by 12 minutes."
        );
        assert_eq!(notices[1].level, NoticeLevel::Toast);
        assert_eq!(
            notices[1].message,
            "⏳ Heads up! The bus at Park Street is delayed by 12 minutes."
        );
    }
}
