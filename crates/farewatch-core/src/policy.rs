//! Watermark and notification policy
//!
//! Given a route and a freshly observed price, decide whether the stored
//! lowest price moves and whether the user hears about it. Pure logic: the
//! caller owns the store and the notification channel.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::TrackedRoute;

/// When a price at or below target produces a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Once per new record low that also clears the target
    #[default]
    NewLow,
    /// Every cycle while the price clears the target
    EveryCycle,
}

impl NotifyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyPolicy::NewLow => "new_low",
            NotifyPolicy::EveryCycle => "every_cycle",
        }
    }
}

impl FromStr for NotifyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "new_low" => Ok(NotifyPolicy::NewLow),
            "every_cycle" => Ok(NotifyPolicy::EveryCycle),
            _ => Err(Error::InvalidPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for NotifyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a notification goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyReason {
    /// Price cleared the target and beat every previous observation
    NewLow,
    /// Price cleared the target but did not beat the watermark
    AtOrBelowTarget,
}

/// Outcome of applying the policy to one observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// New watermark to persist, if the observation lowered it
    pub new_watermark: Option<f64>,
    pub notify: Option<NotifyReason>,
}

/// Apply the watermark rule and the notification policy to `current`.
///
/// The watermark moves whenever the price beats it (or there is none yet),
/// regardless of the target.
pub fn evaluate(route: &TrackedRoute, current: f64, policy: NotifyPolicy) -> Evaluation {
    let is_new_low = match route.lowest_price_seen {
        None => true,
        Some(previous) => current < previous,
    };
    let clears_target = current <= route.target_price;

    let notify = match policy {
        NotifyPolicy::NewLow if clears_target && is_new_low => Some(NotifyReason::NewLow),
        NotifyPolicy::NewLow => None,
        NotifyPolicy::EveryCycle if clears_target => Some(if is_new_low {
            NotifyReason::NewLow
        } else {
            NotifyReason::AtOrBelowTarget
        }),
        NotifyPolicy::EveryCycle => None,
    };

    Evaluation {
        new_watermark: is_new_low.then_some(current),
        notify,
    }
}
