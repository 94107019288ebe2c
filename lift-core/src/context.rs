//! Cross-channel context.
//!
//! Informational only: describes how large the channel is relative to the
//! whole marketing program. Nothing here feeds back into a calculation.

use lift_common::validation::require_positive;
use lift_common::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};

/// Share below which the channel likely depends on other channels.
pub const LOW_SHARE_PCT: f64 = 10.0;
/// Share above which single-channel results are more reliable.
pub const HIGH_SHARE_PCT: f64 = 50.0;

/// Reading of the channel's share of total spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareSignal {
    LowShare,
    Typical,
    HighShare,
}

impl ShareSignal {
    pub fn from_share(spend_share_pct: f64) -> Self {
        if spend_share_pct < LOW_SHARE_PCT {
            Self::LowShare
        } else if spend_share_pct > HIGH_SHARE_PCT {
            Self::HighShare
        } else {
            Self::Typical
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::LowShare => "Low channel share may indicate strong cross-channel dependencies",
            Self::Typical => "Channel share is typical; interactions with other channels still apply",
            Self::HighShare => "High channel share; single-channel results may be more reliable",
        }
    }
}

/// The channel's footprint within the whole program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelContext {
    /// Channel spend as a percentage of total marketing spend
    pub spend_share_pct: f64,
    /// Estimated channel conversions as a percentage of all conversions
    pub conversion_share_pct: f64,
    pub signal: ShareSignal,
}

impl ChannelContext {
    pub fn evaluate(
        monthly_spend: f64,
        cost_per_conversion: f64,
        total_marketing_spend: f64,
        total_monthly_conversions: f64,
    ) -> ValidationResult<Self> {
        require_positive("monthly_spend", monthly_spend)?;
        require_positive("cost_per_conversion", cost_per_conversion)?;
        require_positive("total_marketing_spend", total_marketing_spend)?;
        require_positive("total_monthly_conversions", total_monthly_conversions)?;

        if total_marketing_spend < monthly_spend {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "total marketing spend {total_marketing_spend} is below channel spend {monthly_spend}"
                ),
            });
        }

        let spend_share_pct = monthly_spend / total_marketing_spend * 100.0;
        let conversion_share_pct =
            (monthly_spend / cost_per_conversion) / total_monthly_conversions * 100.0;

        Ok(Self {
            spend_share_pct,
            conversion_share_pct,
            signal: ShareSignal::from_share(spend_share_pct),
        })
    }
}
