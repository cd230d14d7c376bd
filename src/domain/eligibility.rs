//! Service eligibility for a parcel.

use serde::{Deserialize, Serialize};

use super::catalog::ShippingService;
use super::region::Region;
use super::size::{Parcel, SizeCode};

/// Per-service ceilings. Every service carries its own thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeLimit {
    pub max_length: f64,
    pub max_width: f64,
    pub max_thickness: f64,
    pub max_weight: u32,
}

impl SizeLimit {
    pub fn fits(&self, parcel: &Parcel) -> bool {
        parcel.length <= self.max_length
            && parcel.width <= self.max_width
            && parcel.thickness <= self.max_thickness
            && parcel.weight <= self.max_weight
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eligibility {
    /// Letter-box style services: the parcel must fit every ceiling.
    Dimensions(SizeLimit),
    /// Box services: the size tier must be carried and the weight within the cap.
    Tiers {
        tiers: &'static [SizeCode],
        max_weight: u32,
    },
}

/// Everything the filter needs about one shipment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shipment {
    pub parcel: Parcel,
    pub size: SizeCode,
    pub from: Region,
    pub to: Region,
}

pub fn is_eligible(service: &ShippingService, shipment: &Shipment) -> bool {
    match service.eligibility {
        Eligibility::Dimensions(limit) => limit.fits(&shipment.parcel),
        Eligibility::Tiers { tiers, max_weight } => {
            tiers.contains(&shipment.size)
                && shipment.parcel.weight <= max_weight
                && service
                    .pricing
                    .base_price(shipment.from, shipment.to)
                    .is_some()
        }
    }
}

pub fn eligible_services<'a>(
    services: &'a [ShippingService],
    shipment: &'a Shipment,
) -> impl Iterator<Item = &'a ShippingService> + 'a {
    services
        .iter()
        .filter(move |service| is_eligible(service, shipment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{service_by_id, SERVICES};
    use crate::domain::size::size_category;

    fn shipment(length: f64, width: f64, thickness: f64, weight: u32) -> Shipment {
        let parcel = Parcel::new(length, width, thickness, weight);
        Shipment {
            parcel,
            size: size_category(&parcel),
            from: Region::Kanto,
            to: Region::Kansai,
        }
    }

    fn eligible_ids(shipment: &Shipment) -> Vec<&'static str> {
        eligible_services(SERVICES, shipment)
            .map(|service| service.id)
            .collect()
    }

    #[test]
    fn thin_light_item_fits_every_letter_service() {
        let ids = eligible_ids(&shipment(25.0, 18.0, 2.4, 450));
        assert!(ids.contains(&"yupacket-post"));
        assert!(ids.contains(&"nekopos"));
        assert!(ids.contains(&"yupacket"));
        assert!(ids.contains(&"takkyubin-compact"));
        assert!(!ids.contains(&"takkyubin"));
    }

    #[test]
    fn thresholds_are_independent_per_service() {
        // 2.8cm is too thick for ネコポス but fine for the 3cm services.
        let ids = eligible_ids(&shipment(25.0, 18.0, 2.8, 450));
        assert!(!ids.contains(&"nekopos"));
        assert!(ids.contains(&"yupacket-post"));
        assert!(ids.contains(&"yupacket"));

        // 1.5kg only fits ゆうパケットポスト among the letter services.
        let ids = eligible_ids(&shipment(25.0, 18.0, 2.0, 1500));
        assert!(ids.contains(&"yupacket-post"));
        assert!(!ids.contains(&"yupacket"));
        assert!(!ids.contains(&"nekopos"));
    }

    #[test]
    fn box_services_follow_the_size_tier() {
        let ids = eligible_ids(&shipment(30.0, 20.0, 8.0, 1200));
        assert_eq!(ids, vec!["takkyubin", "yupack"]);
    }

    #[test]
    fn box_services_respect_weight_caps() {
        let ids = eligible_ids(&shipment(30.0, 20.0, 8.0, 26_000));
        assert!(ids.is_empty());
    }

    #[test]
    fn limit_edges_are_inclusive() {
        let nekopos = service_by_id("nekopos").unwrap();
        let at_limit = shipment(31.2, 22.8, 2.5, 1000);
        assert!(is_eligible(nekopos, &at_limit));
        let over = shipment(31.2, 22.8, 2.5, 1001);
        assert!(!is_eligible(nekopos, &over));
    }
}
