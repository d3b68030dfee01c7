//! Delivery-status classification.
//!
//! A pure function of an order's delivery date, expected date and "today". It is
//! evaluated on every query and never stored.

use crate::entities::order;
use chrono::{Local, NaiveDate};
use std::fmt;

/// Days before the expected date at which an open order is flagged as approaching.
pub const DEFAULT_WARNING_DAYS: i64 = 2;

/// Where an order stands relative to its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    /// Delivered, no deadline had been set
    Delivered,
    /// Delivered on or before the expected date
    DeliveredOnTime,
    /// Delivered after the expected date
    DeliveredLate,
    /// Not delivered and no deadline set
    NoDeadline,
    /// Not delivered and the expected date is in the past
    DeadlinePassed,
    /// Not delivered and the expected date is within the warning window
    DeadlineApproaching,
    /// Not delivered and the expected date is comfortably ahead
    OnTrack,
}

impl DeliveryStatus {
    /// Label shown to operators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::DeliveredOnTime => "Delivered on time",
            Self::DeliveredLate => "Delivered late",
            Self::NoDeadline => "No deadline set",
            Self::DeadlinePassed => "Deadline passed",
            Self::DeadlineApproaching => "Deadline approaching",
            Self::OnTrack => "On track",
        }
    }

    /// True for the states that need attention.
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::DeliveredLate | Self::DeadlinePassed)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies an order from its dates.
///
/// `warning_days` is the width of the "approaching" window: an open order whose
/// expected date is between today and `today + warning_days` (inclusive) is
/// approaching, later is on track, earlier has passed.
#[must_use]
pub fn classify(
    delivery_date: Option<NaiveDate>,
    expected_date: Option<NaiveDate>,
    today: NaiveDate,
    warning_days: i64,
) -> DeliveryStatus {
    match (delivery_date, expected_date) {
        (Some(_), None) => DeliveryStatus::Delivered,
        (Some(delivered), Some(expected)) if delivered <= expected => {
            DeliveryStatus::DeliveredOnTime
        }
        (Some(_), Some(_)) => DeliveryStatus::DeliveredLate,
        (None, None) => DeliveryStatus::NoDeadline,
        (None, Some(expected)) => {
            let days_left = expected.signed_duration_since(today).num_days();
            if days_left < 0 {
                DeliveryStatus::DeadlinePassed
            } else if days_left <= warning_days {
                DeliveryStatus::DeadlineApproaching
            } else {
                DeliveryStatus::OnTrack
            }
        }
    }
}

/// Classifies an order header.
#[must_use]
pub fn classify_order(order: &order::Model, today: NaiveDate, warning_days: i64) -> DeliveryStatus {
    classify(order.delivery_date, order.expected_date, today, warning_days)
}

/// Today's calendar date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn test_delivered_without_deadline() {
        let status = classify(Some(day(2026, 3, 5)), None, day(2026, 3, 10), 2);
        assert_eq!(status, DeliveryStatus::Delivered);
    }

    #[test]
    fn test_delivered_on_time_includes_same_day() {
        let today = day(2026, 3, 10);
        assert_eq!(
            classify(Some(day(2026, 3, 5)), Some(day(2026, 3, 5)), today, 2),
            DeliveryStatus::DeliveredOnTime
        );
        assert_eq!(
            classify(Some(day(2026, 3, 4)), Some(day(2026, 3, 5)), today, 2),
            DeliveryStatus::DeliveredOnTime
        );
    }

    #[test]
    fn test_delivered_late() {
        let status = classify(Some(day(2026, 3, 6)), Some(day(2026, 3, 5)), day(2026, 3, 10), 2);
        assert_eq!(status, DeliveryStatus::DeliveredLate);
        assert!(status.is_alert());
    }

    #[test]
    fn test_open_without_deadline() {
        assert_eq!(
            classify(None, None, day(2026, 3, 10), 2),
            DeliveryStatus::NoDeadline
        );
    }

    #[test]
    fn test_open_deadline_windows() {
        let today = day(2026, 3, 10);
        let cases = [
            (-1, DeliveryStatus::DeadlinePassed),
            (0, DeliveryStatus::DeadlineApproaching),
            (1, DeliveryStatus::DeadlineApproaching),
            (2, DeliveryStatus::DeadlineApproaching),
            (3, DeliveryStatus::OnTrack),
            (5, DeliveryStatus::OnTrack),
        ];
        for (offset, expected) in cases {
            let expected_date = today + Duration::days(offset);
            assert_eq!(
                classify(None, Some(expected_date), today, DEFAULT_WARNING_DAYS),
                expected,
                "expected date today{offset:+}"
            );
        }
    }

    #[test]
    fn test_warning_window_is_configurable() {
        let today = day(2026, 3, 10);
        let in_five_days = Some(today + Duration::days(5));
        assert_eq!(classify(None, in_five_days, today, 2), DeliveryStatus::OnTrack);
        assert_eq!(
            classify(None, in_five_days, today, 7),
            DeliveryStatus::DeadlineApproaching
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(DeliveryStatus::DeadlineApproaching.label(), "Deadline approaching");
        assert_eq!(DeliveryStatus::NoDeadline.to_string(), "No deadline set");
        assert!(!DeliveryStatus::OnTrack.is_alert());
    }
}
