use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Activation flag, date window and usage ceiling shared by promo codes,
/// gift cards and the challenge setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ValidityWindow {
    pub is_active: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: i32,
    pub max_usage: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    Inactive,
    NotYetValid,
    Expired,
    Exhausted,
}

impl InvalidReason {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::Inactive => "Code is not active",
            InvalidReason::NotYetValid => "Code is not valid yet",
            InvalidReason::Expired => "Code has expired",
            InvalidReason::Exhausted => "Code has reached its usage limit",
        }
    }
}

impl ValidityWindow {
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), InvalidReason> {
        if !self.is_active {
            return Err(InvalidReason::Inactive);
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return Err(InvalidReason::NotYetValid);
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return Err(InvalidReason::Expired);
        }
        if self.max_usage.is_some_and(|max| self.usage_count >= max) {
            return Err(InvalidReason::Exhausted);
        }
        Ok(())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.check(now).is_ok()
    }

    /// Rejects windows that can never be satisfied.
    pub fn validate_shape(&self) -> Result<(), String> {
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until)
            && until < from
        {
            return Err("valid_until must not be before valid_from".into());
        }
        if self.max_usage.is_some_and(|max| max < 0) || self.usage_count < 0 {
            return Err("usage counters must not be negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn window() -> ValidityWindow {
        ValidityWindow {
            is_active: true,
            valid_from: Some(now() - Duration::days(1)),
            valid_until: Some(now() + Duration::days(1)),
            usage_count: 0,
            max_usage: Some(3),
        }
    }

    #[test]
    fn test_valid_window() {
        assert!(window().is_valid_at(now()));
    }

    #[test]
    fn test_each_failure_reason() {
        let mut w = window();
        w.is_active = false;
        assert_eq!(w.check(now()), Err(InvalidReason::Inactive));

        let w = window();
        assert_eq!(w.check(now() - Duration::days(2)), Err(InvalidReason::NotYetValid));
        assert_eq!(w.check(now() + Duration::days(2)), Err(InvalidReason::Expired));

        let mut w = window();
        w.usage_count = 3;
        assert_eq!(w.check(now()), Err(InvalidReason::Exhausted));
    }

    #[test]
    fn test_open_bounds_and_unlimited_usage() {
        let w = ValidityWindow {
            is_active: true,
            valid_from: None,
            valid_until: None,
            usage_count: 10_000,
            max_usage: None,
        };
        assert!(w.is_valid_at(now()));
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let w = window();
        assert!(w.is_valid_at(now() - Duration::days(1)));
        assert!(w.is_valid_at(now() + Duration::days(1)));
    }

    #[test]
    fn test_shape_validation() {
        let mut w = window();
        assert!(w.validate_shape().is_ok());
        w.valid_until = Some(now() - Duration::days(5));
        assert!(w.validate_shape().is_err());
    }
}
