//! Static rate tables.
//!
//! Region-pair matrices follow the order of [`Region::ALL`] on both axes.
//! A zero cell marks a pair the service does not carry.

use super::region::{distance_bucket, DistanceBucket, Region, REGION_COUNT};
use super::size::SizeCode;

#[derive(Debug, PartialEq, Eq)]
pub struct RateMatrix {
    rows: [[u32; REGION_COUNT]; REGION_COUNT],
}

impl RateMatrix {
    pub const fn new(rows: [[u32; REGION_COUNT]; REGION_COUNT]) -> Self {
        Self { rows }
    }

    pub fn price(&self, from: Region, to: Region) -> Option<u32> {
        self.rows
            .get(from.index())
            .and_then(|row| row.get(to.index()))
            .copied()
            .filter(|price| *price > 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DistanceRates {
    pub same: u32,
    pub neighbor: u32,
    pub distant: u32,
}

impl DistanceRates {
    pub fn get(&self, bucket: DistanceBucket) -> u32 {
        match bucket {
            DistanceBucket::Same => self.same,
            DistanceBucket::Neighbor => self.neighbor,
            DistanceBucket::Distant => self.distant,
        }
    }
}

/// How a catalog entry is priced before any tier multiplier or discount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pricing {
    /// Nationwide flat rate.
    Flat(u32),
    ByDistance(DistanceRates),
    Matrix(&'static RateMatrix),
}

impl Pricing {
    pub fn base_price(&self, from: Region, to: Region) -> Option<u32> {
        match self {
            Pricing::Flat(price) => Some(*price),
            Pricing::ByDistance(rates) => Some(rates.get(distance_bucket(from, to))),
            Pricing::Matrix(matrix) => matrix.price(from, to),
        }
    }
}

/// Scales a 60-size price to the given tier, rounded to the nearest yen.
/// The compact tier has its own table and is returned unchanged.
pub fn tier_price(base_60: u32, size: SizeCode) -> u32 {
    match size.multiplier() {
        Some(multiplier) => (base_60 as f64 * multiplier).round() as u32,
        None => base_60,
    }
}

pub const YUPACKET_POST_RATE: u32 = 200;
pub const NEKOPOS_RATE: u32 = 210;

pub const YUPACKET_RATES: DistanceRates = DistanceRates {
    same: 250,
    neighbor: 300,
    distant: 350,
};

pub const YUPACK_60_RATES: DistanceRates = DistanceRates {
    same: 810,
    neighbor: 870,
    distant: 970,
};

pub static TAKKYUBIN_COMPACT_RATES: RateMatrix = RateMatrix::new([
    [720, 830, 890, 940, 940, 1000, 1000, 1110, 1160, 1160, 1270, 1270],
    [830, 720, 720, 780, 780, 830, 830, 890, 940, 940, 1050, 1110],
    [890, 720, 720, 720, 720, 780, 780, 830, 940, 940, 1050, 1050],
    [940, 780, 720, 720, 720, 720, 720, 780, 830, 830, 940, 940],
    [940, 780, 720, 720, 720, 720, 720, 780, 830, 830, 940, 1000],
    [1000, 830, 780, 720, 720, 720, 720, 720, 780, 780, 830, 1000],
    [1000, 830, 780, 720, 720, 720, 720, 720, 780, 780, 830, 940],
    [1110, 890, 830, 780, 780, 720, 720, 720, 720, 720, 780, 940],
    [1160, 940, 940, 830, 830, 780, 780, 720, 720, 720, 720, 940],
    [1160, 940, 940, 830, 830, 780, 780, 720, 720, 720, 780, 940],
    [1270, 1050, 1050, 940, 940, 830, 830, 780, 720, 780, 720, 890],
    [1270, 1110, 1050, 940, 1000, 1000, 940, 940, 940, 940, 890, 720],
]);

pub static TAKKYUBIN_60_RATES: RateMatrix = RateMatrix::new([
    [940, 1190, 1320, 1460, 1460, 1610, 1610, 1920, 2070, 2070, 2340, 2340],
    [1190, 940, 940, 1060, 1060, 1190, 1190, 1320, 1460, 1460, 1760, 1920],
    [1320, 940, 940, 940, 940, 1060, 1060, 1190, 1460, 1460, 1760, 1760],
    [1460, 1060, 940, 940, 940, 940, 940, 1060, 1190, 1190, 1460, 1460],
    [1460, 1060, 940, 940, 940, 940, 940, 1060, 1190, 1190, 1460, 1610],
    [1610, 1190, 1060, 940, 940, 940, 940, 940, 1060, 1060, 1190, 1610],
    [1610, 1190, 1060, 940, 940, 940, 940, 940, 1060, 1060, 1190, 1460],
    [1920, 1320, 1190, 1060, 1060, 940, 940, 940, 940, 940, 1060, 1460],
    [2070, 1460, 1460, 1190, 1190, 1060, 1060, 940, 940, 940, 940, 1460],
    [2070, 1460, 1460, 1190, 1190, 1060, 1060, 940, 940, 940, 1060, 1460],
    [2340, 1760, 1760, 1460, 1460, 1190, 1190, 1060, 940, 1060, 940, 1320],
    [2340, 1920, 1760, 1460, 1610, 1610, 1460, 1460, 1460, 1460, 1320, 940],
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_lookup_is_row_from_column_to() {
        assert_eq!(
            TAKKYUBIN_COMPACT_RATES.price(Region::Kanto, Region::Kansai),
            Some(780)
        );
        assert_eq!(
            TAKKYUBIN_60_RATES.price(Region::Hokkaido, Region::Okinawa),
            Some(2340)
        );
        assert_eq!(
            TAKKYUBIN_COMPACT_RATES.price(Region::Shinetsu, Region::Okinawa),
            Some(1000)
        );
        assert_eq!(
            TAKKYUBIN_COMPACT_RATES.price(Region::Kyushu, Region::Shikoku),
            Some(780)
        );
        assert_eq!(
            TAKKYUBIN_COMPACT_RATES.price(Region::Kyushu, Region::Chugoku),
            Some(720)
        );
    }

    #[test]
    fn zero_cell_means_no_service() {
        static SPARSE: RateMatrix = RateMatrix::new([[0; REGION_COUNT]; REGION_COUNT]);
        assert_eq!(SPARSE.price(Region::Kanto, Region::Kanto), None);
    }

    #[test]
    fn same_region_is_the_cheapest_cell_of_each_row() {
        for matrix in [&TAKKYUBIN_COMPACT_RATES, &TAKKYUBIN_60_RATES] {
            for from in Region::ALL {
                let own = matrix.price(from, from).unwrap();
                for to in Region::ALL {
                    assert!(own <= matrix.price(from, to).unwrap());
                }
            }
        }
    }

    #[test]
    fn distance_pricing_uses_the_bucket() {
        let pricing = Pricing::ByDistance(YUPACKET_RATES);
        assert_eq!(pricing.base_price(Region::Kanto, Region::Kanto), Some(250));
        assert_eq!(pricing.base_price(Region::Kanto, Region::Chubu), Some(300));
        assert_eq!(pricing.base_price(Region::Kanto, Region::Kyushu), Some(350));
        assert_eq!(
            Pricing::Flat(YUPACKET_POST_RATE).base_price(Region::Okinawa, Region::Hokkaido),
            Some(200)
        );
    }

    #[test]
    fn tier_prices_round_to_the_nearest_yen() {
        assert_eq!(tier_price(940, SizeCode::S60), 940);
        // 940 * 1.28 = 1203.2
        assert_eq!(tier_price(940, SizeCode::S80), 1203);
        // 810 * 1.55 = 1255.5
        assert_eq!(tier_price(810, SizeCode::S100), 1256);
        assert_eq!(tier_price(720, SizeCode::Compact), 720);
    }
}
