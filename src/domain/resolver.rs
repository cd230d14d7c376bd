//! Turns a parcel and a route into a ranked list of shipping options.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{ShippingService, SERVICES};
use super::eligibility::{eligible_services, Eligibility, Shipment};
use super::entities::{ShippingOption, ShippingResult, ShippingSummary};
use super::input::{ProductForm, ProductInfo, DEFAULT_ORIGIN};
use super::profit::{compute_profit, Platform};
use super::rates::tier_price;
use super::region::region_of;
use super::size::{size_category, Parcel};

/// Number of options shown on the result screen.
pub const TOP_OPTIONS: usize = 3;

const RANK_BADGES: [&str; 3] = ["🥇", "🥈", "🥉"];
const CHEAPEST_FEATURE: &str = "最安";
const FASTEST_FEATURE: &str = "最速";
const DROP_OFF_FEATURE: &str = "持込割引";

#[derive(Clone, Debug, PartialEq)]
pub struct ShippingRequest<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub parcel: Parcel,
    pub is_drop_off: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisSettings {
    pub platform: Platform,
    /// Origin used when the form leaves it blank.
    pub origin: String,
}

impl Default for DiagnosisSettings {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ShippingResolver {
    services: &'static [ShippingService],
}

impl Default for ShippingResolver {
    fn default() -> Self {
        Self::new(SERVICES)
    }
}

impl ShippingResolver {
    pub fn new(services: &'static [ShippingService]) -> Self {
        Self { services }
    }

    /// Every eligible option, cheapest first, with rank annotations.
    /// May be empty; [`ShippingResolver::diagnose`] never is.
    pub fn resolve(&self, request: &ShippingRequest<'_>) -> Vec<ShippingOption> {
        let shipment = Shipment {
            parcel: request.parcel,
            size: size_category(&request.parcel),
            from: region_of(request.origin),
            to: region_of(request.destination),
        };

        debug!(
            size = %shipment.size,
            from = shipment.from.label(),
            to = shipment.to.label(),
            weight = shipment.parcel.weight,
            "resolving shipping options"
        );

        let mut options: Vec<ShippingOption> = eligible_services(self.services, &shipment)
            .filter_map(|service| candidate(service, &shipment, request.is_drop_off))
            .collect();

        options.sort_by_key(|option| option.price);
        rank(options)
    }

    /// Parses the raw form and produces the result screen payload.
    pub fn diagnose(&self, form: &ProductForm, settings: &DiagnosisSettings) -> ShippingResult {
        self.diagnose_info(
            &ProductInfo::from_form_with_origin(form, &settings.origin),
            settings,
        )
    }

    pub fn diagnose_info(&self, info: &ProductInfo, settings: &DiagnosisSettings) -> ShippingResult {
        let parcel = info.parcel();
        let request = ShippingRequest {
            origin: &info.origin,
            destination: &info.destination,
            parcel,
            is_drop_off: info.is_drop_off,
        };

        let mut options = self.resolve(&request);
        let is_estimate = options.is_empty();
        if is_estimate {
            warn!(
                origin = %info.origin,
                destination = %info.destination,
                weight = parcel.weight,
                "no shipping service matched; substituting estimates"
            );
            options = rank(fallback_options(&parcel));
        }
        options.truncate(TOP_OPTIONS);

        if let Some(sale_price) = info.sale_price {
            let fee_rate = settings.platform.fee_rate();
            for option in &mut options {
                option.profit = compute_profit(sale_price, fee_rate, option.price, info.cost_price);
            }
        }

        info!(
            options = options.len(),
            cheapest = options.first().map(|option| option.price).unwrap_or_default(),
            is_estimate,
            "diagnosis complete"
        );

        ShippingResult {
            summary: ShippingSummary {
                from: info.origin.clone(),
                to: info.destination.clone(),
                size: format!("{}×{}×{}cm", info.length, info.width, info.thickness),
                weight: format!("{}g", info.weight),
            },
            size_category: size_category(&parcel),
            options,
            is_estimate,
        }
    }
}

fn candidate(
    service: &ShippingService,
    shipment: &Shipment,
    is_drop_off: bool,
) -> Option<ShippingOption> {
    let base = service.pricing.base_price(shipment.from, shipment.to)?;
    let is_box = matches!(service.eligibility, Eligibility::Tiers { .. });

    let (id, description, mut price) = if is_box && shipment.size.is_box_tier() {
        (
            format!("{}-{}", service.id, shipment.size),
            format!("{} {}サイズ", service.provider.label(), shipment.size),
            tier_price(base, shipment.size),
        )
    } else {
        (
            service.id.to_string(),
            service.provider.label().to_string(),
            base,
        )
    };

    let mut features: Vec<String> = service.features.iter().map(|f| f.to_string()).collect();
    let discount = service.drop_off_discount.filter(|_| is_drop_off);
    if let Some(discount) = discount {
        price = price.saturating_sub(discount);
        features.push(DROP_OFF_FEATURE.to_string());
    }

    Some(ShippingOption {
        id,
        name: service.name.to_string(),
        price,
        delivery_days: service.delivery_days.to_string(),
        features,
        description,
        is_recommended: false,
        provider: Some(service.provider),
        discounted: discount.is_some(),
        profit: None,
    })
}

/// Applies rank badges to the first three entries, flags the cheapest and
/// tags next-day services. Expects `options` already sorted by price.
fn rank(options: Vec<ShippingOption>) -> Vec<ShippingOption> {
    options
        .into_iter()
        .enumerate()
        .map(|(index, mut option)| {
            if let Some(badge) = RANK_BADGES.get(index) {
                option.name = format!("{badge} {}", option.name);
            }
            if index == 0 {
                option.is_recommended = true;
                push_feature(&mut option.features, CHEAPEST_FEATURE);
            }
            if option.is_next_day() {
                push_feature(&mut option.features, FASTEST_FEATURE);
            }
            option
        })
        .collect()
}

fn push_feature(features: &mut Vec<String>, feature: &str) {
    if !features.iter().any(|existing| existing == feature) {
        features.push(feature.to_string());
    }
}

/// Heuristic base price used when nothing in the catalog matched.
pub fn estimate_base_price(parcel: &Parcel) -> u32 {
    let total = parcel.total_size();
    if parcel.thickness <= 3.0 && parcel.weight <= 1000 {
        210
    } else if total <= 60.0 && parcel.weight <= 2000 {
        760
    } else if total <= 100.0 && parcel.weight <= 5000 {
        1300
    } else {
        2000
    }
}

/// Fixed triplet of estimated options, cheapest first.
pub fn fallback_options(parcel: &Parcel) -> Vec<ShippingOption> {
    let base = estimate_base_price(parcel);
    let scaled = |factor: f64| (base as f64 * factor).round() as u32;

    [
        ("estimate-post", "郵便系サービス（目安）", base, "2〜3日", "ポスト投函・窓口持込"),
        ("estimate-takkyubin", "宅配便（目安）", scaled(1.15), "翌日〜2日", "手渡し・追跡あり"),
        ("estimate-pickup", "集荷サービス（目安）", scaled(1.40), "1〜2日", "自宅集荷"),
    ]
    .into_iter()
    .map(|(id, name, price, delivery_days, description)| ShippingOption {
        id: id.to_string(),
        name: name.to_string(),
        price,
        delivery_days: delivery_days.to_string(),
        features: vec!["料金は目安".to_string(), "追跡あり".to_string()],
        description: description.to_string(),
        is_recommended: false,
        provider: None,
        discounted: false,
        profit: None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::YAMATO_DROP_OFF_DISCOUNT;
    use crate::domain::catalog::Provider;
    use crate::domain::rates::{Pricing, TAKKYUBIN_60_RATES, TAKKYUBIN_COMPACT_RATES};
    use crate::domain::size::SizeCode;
    use crate::domain::region::Region;

    fn request(parcel: Parcel, is_drop_off: bool) -> ShippingRequest<'static> {
        ShippingRequest {
            origin: "東京都",
            destination: "大阪府",
            parcel,
            is_drop_off,
        }
    }

    fn assert_ascending(options: &[ShippingOption]) {
        for pair in options.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn letter_item_prefers_the_flat_national_rate() {
        let options = ShippingResolver::default()
            .resolve(&request(Parcel::new(25.0, 18.0, 2.8, 450), false));

        assert_ascending(&options);
        let cheapest = &options[0];
        assert_eq!(cheapest.id, "yupacket-post");
        assert_eq!(cheapest.price, 200);
        assert!(cheapest.is_recommended);
        assert!(cheapest.name.starts_with("🥇"));
        assert!(cheapest.features.contains(&"最安".to_string()));
        assert!(options.iter().skip(1).all(|option| !option.is_recommended));
    }

    #[test]
    fn resolve_keeps_every_candidate() {
        let options = ShippingResolver::default()
            .resolve(&request(Parcel::new(25.0, 18.0, 2.4, 450), false));
        // ゆうパケットポスト, ネコポス, ゆうパケット, 宅急便コンパクト
        assert_eq!(options.len(), 4);
        assert!(!options[3].name.starts_with("🥇"));
        assert!(!options[3].name.starts_with("🥈"));
        assert!(!options[3].name.starts_with("🥉"));
    }

    #[test]
    fn next_day_services_are_tagged_fastest() {
        let options = ShippingResolver::default()
            .resolve(&request(Parcel::new(25.0, 18.0, 4.0, 900), false));
        let compact = options
            .iter()
            .find(|option| option.id == "takkyubin-compact")
            .unwrap();
        assert!(compact.features.contains(&"最速".to_string()));
    }

    #[test]
    fn larger_tiers_scale_the_60_rate() {
        let options = ShippingResolver::default()
            .resolve(&request(Parcel::new(40.0, 30.0, 20.0, 3000), false));
        let takkyubin = options
            .iter()
            .find(|option| option.id == "takkyubin-100")
            .unwrap();
        let base = TAKKYUBIN_60_RATES
            .price(Region::Kanto, Region::Kansai)
            .unwrap();
        assert_eq!(takkyubin.price, tier_price(base, crate::domain::size::SizeCode::S100));
        assert!(options.iter().any(|option| option.id == "yupack-100"));
    }

    #[test]
    fn drop_off_subtracts_the_flat_discount() {
        let resolver = ShippingResolver::default();
        let parcel = Parcel::new(30.0, 20.0, 8.0, 1200);
        let pickup = resolver.resolve(&request(parcel, false));
        let drop_off = resolver.resolve(&request(parcel, true));

        let find = |options: &[ShippingOption]| {
            options
                .iter()
                .find(|option| option.id == "takkyubin-60")
                .cloned()
                .unwrap()
        };
        let before = find(&pickup);
        let after = find(&drop_off);
        assert_eq!(after.price, before.price - YAMATO_DROP_OFF_DISCOUNT);
        assert!(after.discounted);
        assert!(!before.discounted);
        assert!(after.features.contains(&"持込割引".to_string()));
    }

    #[test]
    fn drop_off_leaves_letter_services_alone() {
        let resolver = ShippingResolver::default();
        let parcel = Parcel::new(25.0, 18.0, 2.0, 300);
        let pickup = resolver.resolve(&request(parcel, false));
        let drop_off = resolver.resolve(&request(parcel, true));
        let price_of = |options: &[ShippingOption], id: &str| {
            options.iter().find(|o| o.id == id).map(|o| o.price)
        };
        assert_eq!(price_of(&pickup, "nekopos"), price_of(&drop_off, "nekopos"));
    }

    static BARGAIN_BOX: [ShippingService; 1] = [ShippingService {
        id: "bargain-box",
        name: "格安便",
        emoji: "📦",
        provider: Provider::Yamato,
        eligibility: Eligibility::Tiers {
            tiers: &[SizeCode::S60],
            max_weight: 25_000,
        },
        pricing: Pricing::Flat(50),
        delivery_days: "2〜3日",
        features: &[],
        drop_off_discount: Some(YAMATO_DROP_OFF_DISCOUNT),
    }];

    #[test]
    fn discount_larger_than_the_price_bottoms_out_at_zero() {
        let options = ShippingResolver::new(&BARGAIN_BOX)
            .resolve(&request(Parcel::new(30.0, 20.0, 8.0, 1200), true));

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, "bargain-box-60");
        assert_eq!(options[0].price, 0);
        assert!(options[0].discounted);
    }

    #[test]
    fn blank_form_origin_uses_the_configured_one() {
        let form = ProductForm {
            category: "書籍".into(),
            length: "25".into(),
            width: "18".into(),
            thickness: "2.8".into(),
            weight: "450".into(),
            destination: "沖縄県".into(),
            ..ProductForm::default()
        };
        let settings = DiagnosisSettings {
            origin: "北海道".into(),
            ..DiagnosisSettings::default()
        };
        let result = ShippingResolver::default().diagnose(&form, &settings);

        assert_eq!(result.summary.from, "北海道");
        // 宅急便コンパクト 北海道→沖縄 differs from 東京→沖縄.
        let from_hokkaido = result
            .options
            .iter()
            .find(|option| option.id == "takkyubin-compact")
            .map(|option| option.price);
        let expected = TAKKYUBIN_COMPACT_RATES.price(Region::Hokkaido, Region::Okinawa);
        assert_eq!(from_hokkaido, expected);
    }

    #[test]
    fn overweight_parcel_yields_no_candidates() {
        let options = ShippingResolver::default()
            .resolve(&request(Parcel::new(50.0, 40.0, 30.0, 28_000), false));
        assert!(options.is_empty());
    }

    #[test]
    fn estimate_bands() {
        assert_eq!(estimate_base_price(&Parcel::new(30.0, 20.0, 3.0, 1000)), 210);
        assert_eq!(estimate_base_price(&Parcel::new(30.0, 20.0, 10.0, 2000)), 760);
        assert_eq!(estimate_base_price(&Parcel::new(40.0, 30.0, 30.0, 5000)), 1300);
        assert_eq!(estimate_base_price(&Parcel::new(40.0, 30.0, 30.0, 5001)), 2000);
    }

    #[test]
    fn fallback_triplet_is_ascending() {
        let options = fallback_options(&Parcel::new(80.0, 60.0, 60.0, 40_000));
        assert_eq!(options.len(), 3);
        assert_ascending(&options);
        assert_eq!(options[0].price, 2000);
        assert_eq!(options[1].price, 2300);
        assert_eq!(options[2].price, 2800);
    }
}
