//! Sale proceeds after platform fee, shipping and cost price.

use serde::{Deserialize, Serialize};

/// Marketplace the item is listed on. Determines the platform fee rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    #[default]
    Mercari,
    YahooAuction,
    /// Fee as a fraction of the sale price, e.g. `0.066`.
    Custom(f64),
}

impl Platform {
    pub fn fee_rate(&self) -> f64 {
        match self {
            Platform::Mercari => 0.10,
            Platform::YahooAuction => 0.088,
            Platform::Custom(rate) if rate.is_finite() && *rate >= 0.0 => *rate,
            Platform::Custom(_) => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Mercari => "メルカリ",
            Platform::YahooAuction => "ヤフオク",
            Platform::Custom(_) => "その他",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitBreakdown {
    pub sale_price: u32,
    pub platform_fee: u32,
    pub shipping_cost: u32,
    /// Proceeds before the cost price. Only present when a cost price was given.
    pub gross_profit: Option<i64>,
    pub net_profit: i64,
    /// Net profit as a percentage of the sale price.
    pub profit_rate: f64,
}

/// Returns `None` for a zero sale price instead of dividing by zero.
pub fn compute_profit(
    sale_price: u32,
    fee_rate: f64,
    shipping_cost: u32,
    cost_price: Option<u32>,
) -> Option<ProfitBreakdown> {
    if sale_price == 0 {
        return None;
    }

    let fee_rate = if fee_rate.is_finite() && fee_rate > 0.0 {
        fee_rate
    } else {
        0.0
    };
    let platform_fee = (sale_price as f64 * fee_rate).round() as u32;
    let gross = sale_price as i64 - platform_fee as i64 - shipping_cost as i64;
    let net_profit = gross - cost_price.unwrap_or(0) as i64;
    let profit_rate = net_profit as f64 / sale_price as f64 * 100.0;

    Some(ProfitBreakdown {
        sale_price,
        platform_fee,
        shipping_cost,
        gross_profit: cost_price.map(|_| gross),
        net_profit,
        profit_rate,
    })
}
