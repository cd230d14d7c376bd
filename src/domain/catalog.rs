//! Built-in shipping service catalog.

use serde::{Deserialize, Serialize};

use super::eligibility::{Eligibility, SizeLimit};
use super::rates::{
    Pricing, NEKOPOS_RATE, TAKKYUBIN_60_RATES, TAKKYUBIN_COMPACT_RATES, YUPACKET_POST_RATE,
    YUPACKET_RATES, YUPACK_60_RATES,
};
use super::size::SizeCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Provider {
    JapanPost,
    Yamato,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::JapanPost => "日本郵便",
            Provider::Yamato => "ヤマト運輸",
        }
    }
}

/// One immutable catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShippingService {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub provider: Provider,
    pub eligibility: Eligibility,
    pub pricing: Pricing,
    pub delivery_days: &'static str,
    pub features: &'static [&'static str],
    /// Flat yen reduction when the parcel is handed in at a counter.
    pub drop_off_discount: Option<u32>,
}

const BOX_TIERS: &[SizeCode] = &[
    SizeCode::S60,
    SizeCode::S80,
    SizeCode::S100,
    SizeCode::S120,
    SizeCode::S140,
    SizeCode::S160,
    SizeCode::S180,
    SizeCode::S200,
];

pub const YAMATO_DROP_OFF_DISCOUNT: u32 = 110;
pub const JAPAN_POST_DROP_OFF_DISCOUNT: u32 = 120;

pub static SERVICES: &[ShippingService] = &[
    ShippingService {
        id: "yupacket-post",
        name: "ゆうパケットポスト",
        emoji: "📮",
        provider: Provider::JapanPost,
        eligibility: Eligibility::Dimensions(SizeLimit {
            max_length: 32.7,
            max_width: 22.8,
            max_thickness: 3.0,
            max_weight: 2000,
        }),
        pricing: Pricing::Flat(YUPACKET_POST_RATE),
        delivery_days: "1〜3日",
        features: &["コンビニ持込可", "追跡あり", "全国一律料金"],
        drop_off_discount: None,
    },
    ShippingService {
        id: "nekopos",
        name: "ネコポス",
        emoji: "🐱",
        provider: Provider::Yamato,
        eligibility: Eligibility::Dimensions(SizeLimit {
            max_length: 31.2,
            max_width: 22.8,
            max_thickness: 2.5,
            max_weight: 1000,
        }),
        pricing: Pricing::Flat(NEKOPOS_RATE),
        delivery_days: "1〜2日",
        features: &["自宅集荷", "追跡あり", "全国一律料金"],
        drop_off_discount: None,
    },
    ShippingService {
        id: "yupacket",
        name: "ゆうパケット",
        emoji: "📦",
        provider: Provider::JapanPost,
        eligibility: Eligibility::Dimensions(SizeLimit {
            max_length: 34.0,
            max_width: 25.0,
            max_thickness: 3.0,
            max_weight: 1000,
        }),
        pricing: Pricing::ByDistance(YUPACKET_RATES),
        delivery_days: "1〜3日",
        features: &["ポスト投函", "追跡あり", "郵便局持込"],
        drop_off_discount: None,
    },
    ShippingService {
        id: "takkyubin-compact",
        name: "宅急便コンパクト",
        emoji: "📦",
        provider: Provider::Yamato,
        eligibility: Eligibility::Tiers {
            tiers: &[SizeCode::Compact],
            max_weight: 30_000,
        },
        pricing: Pricing::Matrix(&TAKKYUBIN_COMPACT_RATES),
        delivery_days: "翌日〜2日",
        features: &["専用BOX", "追跡あり", "手渡し"],
        drop_off_discount: Some(YAMATO_DROP_OFF_DISCOUNT),
    },
    ShippingService {
        id: "takkyubin",
        name: "宅急便",
        emoji: "🚚",
        provider: Provider::Yamato,
        eligibility: Eligibility::Tiers {
            tiers: BOX_TIERS,
            max_weight: 25_000,
        },
        pricing: Pricing::Matrix(&TAKKYUBIN_60_RATES),
        delivery_days: "翌日〜2日",
        features: &["手渡し", "追跡あり", "損害賠償"],
        drop_off_discount: Some(YAMATO_DROP_OFF_DISCOUNT),
    },
    ShippingService {
        id: "yupack",
        name: "ゆうパック",
        emoji: "📮",
        provider: Provider::JapanPost,
        eligibility: Eligibility::Tiers {
            tiers: BOX_TIERS,
            max_weight: 25_000,
        },
        pricing: Pricing::ByDistance(YUPACK_60_RATES),
        delivery_days: "1〜2日",
        features: &["大型対応", "追跡あり", "損害賠償"],
        drop_off_discount: Some(JAPAN_POST_DROP_OFF_DISCOUNT),
    },
];

pub fn service_by_id(id: &str) -> Option<&'static ShippingService> {
    SERVICES.iter().find(|service| service.id == id)
}
