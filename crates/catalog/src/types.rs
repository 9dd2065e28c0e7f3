//! Enumerated values used by catalog documents and policy queries.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A textual value did not name any variant of a catalog enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! impl_catalog_enum {
    ($t:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $t {
            /// All variants, in declaration order.
            pub const ALL: &'static [$t] = &[$($t::$variant),+];

            /// Canonical text form (as written in catalog documents).
            pub fn as_str(self) -> &'static str {
                match self {
                    $($t::$variant => $text),+
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $t {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $t::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Annual,
    NoBillingPeriod,
}

impl_catalog_enum!(BillingPeriod, "billing period", {
    Monthly => "MONTHLY",
    Quarterly => "QUARTERLY",
    Annual => "ANNUAL",
    NoBillingPeriod => "NO_BILLING_PERIOD",
});

impl BillingPeriod {
    /// Length of one billing cycle, `None` for one-off charges.
    pub fn number_of_months(self) -> Option<u32> {
        match self {
            BillingPeriod::Monthly => Some(1),
            BillingPeriod::Quarterly => Some(3),
            BillingPeriod::Annual => Some(12),
            BillingPeriod::NoBillingPeriod => None,
        }
    }
}

/// Stage of a plan; the lowercase form is the suffix of a phase name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseType {
    Trial,
    Discount,
    Fixedterm,
    Evergreen,
}

impl_catalog_enum!(PhaseType, "phase type", {
    Trial => "trial",
    Discount => "discount",
    Fixedterm => "fixedterm",
    Evergreen => "evergreen",
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Base,
    AddOn,
    Standalone,
}

impl_catalog_enum!(ProductCategory, "product category", {
    Base => "BASE",
    AddOn => "ADD_ON",
    Standalone => "STANDALONE",
});

/// ISO 4217 currency code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Aud,
    Brl,
    Cad,
    Chf,
    Cny,
    Eur,
    Gbp,
    Jpy,
    Mxn,
    Nzd,
    Usd,
}

impl_catalog_enum!(Currency, "currency", {
    Aud => "AUD",
    Brl => "BRL",
    Cad => "CAD",
    Chf => "CHF",
    Cny => "CNY",
    Eur => "EUR",
    Gbp => "GBP",
    Jpy => "JPY",
    Mxn => "MXN",
    Nzd => "NZD",
    Usd => "USD",
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Days,
    Months,
    Years,
    Unlimited,
}

impl_catalog_enum!(TimeUnit, "time unit", {
    Days => "DAYS",
    Months => "MONTHS",
    Years => "YEARS",
    Unlimited => "UNLIMITED",
});

/// When a change or cancellation takes effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPolicy {
    Immediate,
    EndOfTerm,
    Illegal,
}

impl_catalog_enum!(ActionPolicy, "action policy", {
    Immediate => "IMMEDIATE",
    EndOfTerm => "END_OF_TERM",
    Illegal => "ILLEGAL",
});

/// Anchor for the phases of a newly created subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanAlignmentCreate {
    StartOfBundle,
    StartOfSubscription,
}

impl_catalog_enum!(PlanAlignmentCreate, "create alignment", {
    StartOfBundle => "START_OF_BUNDLE",
    StartOfSubscription => "START_OF_SUBSCRIPTION",
});

/// Anchor for the phases of the target plan after a change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanAlignmentChange {
    StartOfBundle,
    StartOfSubscription,
    ChangeOfPlan,
    ChangeOfPricelist,
}

impl_catalog_enum!(PlanAlignmentChange, "change alignment", {
    StartOfBundle => "START_OF_BUNDLE",
    StartOfSubscription => "START_OF_SUBSCRIPTION",
    ChangeOfPlan => "CHANGE_OF_PLAN",
    ChangeOfPricelist => "CHANGE_OF_PRICELIST",
});

/// Which billing-cycle day a subscription is invoiced on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingAlignment {
    Account,
    Bundle,
    Subscription,
}

impl_catalog_enum!(BillingAlignment, "billing alignment", {
    Account => "ACCOUNT",
    Bundle => "BUNDLE",
    Subscription => "SUBSCRIPTION",
});
