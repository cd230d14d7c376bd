use serde::{Deserialize, Serialize};

use super::catalog::Provider;
use super::profit::ProfitBreakdown;
use super::size::SizeCode;

/// A materialized candidate for one diagnosis. Rebuilt on every call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    /// Display name, prefixed with the rank badge once ranked.
    pub name: String,
    pub price: u32,
    pub delivery_days: String,
    pub features: Vec<String>,
    pub description: String,
    pub is_recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    /// True when the drop-off discount was subtracted from `price`.
    #[serde(default)]
    pub discounted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<ProfitBreakdown>,
}

impl ShippingOption {
    pub fn is_next_day(&self) -> bool {
        self.delivery_days.contains("翌日")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingSummary {
    pub from: String,
    pub to: String,
    pub size: String,
    pub weight: String,
}

/// What the result screen renders. `options` is never empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingResult {
    pub summary: ShippingSummary,
    pub size_category: SizeCode,
    pub options: Vec<ShippingOption>,
    /// Set when the table lookup produced nothing and estimates were substituted.
    #[serde(default)]
    pub is_estimate: bool,
}

impl ShippingResult {
    pub fn cheapest(&self) -> Option<&ShippingOption> {
        self.options.first()
    }
}
