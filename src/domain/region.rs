//! Prefecture → region lookup and region-pair distance buckets.

use serde::{Deserialize, Serialize};

/// Coarse rate-table region. Rate matrices are indexed by these codes, never by prefecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    Hokkaido,
    KitaTohoku,
    MinamiTohoku,
    Kanto,
    Shinetsu,
    Hokuriku,
    Chubu,
    Kansai,
    Chugoku,
    Shikoku,
    Kyushu,
    Okinawa,
}

pub const REGION_COUNT: usize = 12;

impl Region {
    /// Region used whenever a prefecture cannot be resolved.
    pub const DEFAULT: Region = Region::Kanto;

    pub const ALL: [Region; REGION_COUNT] = [
        Region::Hokkaido,
        Region::KitaTohoku,
        Region::MinamiTohoku,
        Region::Kanto,
        Region::Shinetsu,
        Region::Hokuriku,
        Region::Chubu,
        Region::Kansai,
        Region::Chugoku,
        Region::Shikoku,
        Region::Kyushu,
        Region::Okinawa,
    ];

    /// Row/column position inside a rate matrix.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Hokkaido => "北海道",
            Region::KitaTohoku => "北東北",
            Region::MinamiTohoku => "南東北",
            Region::Kanto => "関東",
            Region::Shinetsu => "信越",
            Region::Hokuriku => "北陸",
            Region::Chubu => "中部",
            Region::Kansai => "関西",
            Region::Chugoku => "中国",
            Region::Shikoku => "四国",
            Region::Kyushu => "九州",
            Region::Okinawa => "沖縄",
        }
    }

    /// Hand-curated neighbour list. Not transitive.
    pub fn neighbors(&self) -> &'static [Region] {
        use Region::*;
        match self {
            Hokkaido => &[KitaTohoku, MinamiTohoku],
            KitaTohoku => &[MinamiTohoku, Kanto, Hokkaido],
            MinamiTohoku => &[KitaTohoku, Kanto, Hokkaido],
            Kanto => &[Shinetsu, Hokuriku, Chubu, KitaTohoku, MinamiTohoku],
            Shinetsu => &[Hokuriku, Chubu, Kanto, Kansai, Chugoku],
            Hokuriku => &[Shinetsu, Chubu, Kanto, Kansai, Chugoku],
            Chubu => &[Shinetsu, Hokuriku, Kanto, Kansai, Chugoku],
            Kansai => &[Shinetsu, Hokuriku, Chubu, Chugoku],
            Chugoku => &[Kansai, Shinetsu, Hokuriku, Chubu, Shikoku, Kyushu],
            Shikoku => &[Chugoku, Kyushu],
            Kyushu => &[Chugoku, Shikoku],
            Okinawa => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceBucket {
    Same,
    Neighbor,
    Distant,
}

const PREFECTURES: [(&str, Region); 47] = [
    ("北海道", Region::Hokkaido),
    ("青森県", Region::KitaTohoku),
    ("岩手県", Region::KitaTohoku),
    ("秋田県", Region::KitaTohoku),
    ("宮城県", Region::MinamiTohoku),
    ("山形県", Region::MinamiTohoku),
    ("福島県", Region::MinamiTohoku),
    ("茨城県", Region::Kanto),
    ("栃木県", Region::Kanto),
    ("群馬県", Region::Kanto),
    ("埼玉県", Region::Kanto),
    ("千葉県", Region::Kanto),
    ("東京都", Region::Kanto),
    ("神奈川県", Region::Kanto),
    ("山梨県", Region::Kanto),
    ("新潟県", Region::Shinetsu),
    ("長野県", Region::Shinetsu),
    ("富山県", Region::Hokuriku),
    ("石川県", Region::Hokuriku),
    ("福井県", Region::Hokuriku),
    ("岐阜県", Region::Chubu),
    ("静岡県", Region::Chubu),
    ("愛知県", Region::Chubu),
    ("三重県", Region::Chubu),
    ("滋賀県", Region::Kansai),
    ("京都府", Region::Kansai),
    ("大阪府", Region::Kansai),
    ("兵庫県", Region::Kansai),
    ("奈良県", Region::Kansai),
    ("和歌山県", Region::Kansai),
    ("鳥取県", Region::Chugoku),
    ("島根県", Region::Chugoku),
    ("岡山県", Region::Chugoku),
    ("広島県", Region::Chugoku),
    ("山口県", Region::Chugoku),
    ("徳島県", Region::Shikoku),
    ("香川県", Region::Shikoku),
    ("愛媛県", Region::Shikoku),
    ("高知県", Region::Shikoku),
    ("福岡県", Region::Kyushu),
    ("佐賀県", Region::Kyushu),
    ("長崎県", Region::Kyushu),
    ("熊本県", Region::Kyushu),
    ("大分県", Region::Kyushu),
    ("宮崎県", Region::Kyushu),
    ("鹿児島県", Region::Kyushu),
    ("沖縄県", Region::Okinawa),
];

/// All 47 official prefecture names, north to south.
pub fn prefectures() -> impl Iterator<Item = &'static str> {
    PREFECTURES.iter().map(|(name, _)| *name)
}

/// Turns a short or decorated prefecture name into the official one.
///
/// "東京" → "東京都", "神奈川" → "神奈川県", "大阪市北区" → "大阪府".
/// Returns `None` when nothing matches.
pub fn correct_prefecture(input: &str) -> Option<&'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((name, _)) = PREFECTURES.iter().find(|(name, _)| *name == trimmed) {
        return Some(name);
    }

    PREFECTURES
        .iter()
        .map(|(name, _)| *name)
        .find(|name| {
            let stem = prefecture_stem(name);
            trimmed.starts_with(stem)
        })
}

fn prefecture_stem(name: &'static str) -> &'static str {
    name.strip_suffix(['都', '道', '府', '県']).unwrap_or(name)
}

/// Region for a prefecture name. Unknown input resolves to [`Region::DEFAULT`].
pub fn region_of(prefecture: &str) -> Region {
    correct_prefecture(prefecture)
        .and_then(|name| {
            PREFECTURES
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, region)| *region)
        })
        .unwrap_or(Region::DEFAULT)
}

pub fn distance_bucket(from: Region, to: Region) -> DistanceBucket {
    if from == to {
        DistanceBucket::Same
    } else if from.neighbors().contains(&to) {
        DistanceBucket::Neighbor
    } else {
        DistanceBucket::Distant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_official_names() {
        assert_eq!(region_of("東京都"), Region::Kanto);
        assert_eq!(region_of("大阪府"), Region::Kansai);
        assert_eq!(region_of("北海道"), Region::Hokkaido);
        assert_eq!(region_of("沖縄県"), Region::Okinawa);
        assert_eq!(region_of("山梨県"), Region::Kanto);
        assert_eq!(region_of("三重県"), Region::Chubu);
    }

    #[test]
    fn unknown_prefecture_falls_back_to_default_region() {
        assert_eq!(region_of("ロンドン"), Region::DEFAULT);
        assert_eq!(region_of(""), Region::DEFAULT);
        assert_eq!(region_of("   "), Region::DEFAULT);
    }

    #[test]
    fn corrects_short_forms() {
        assert_eq!(correct_prefecture("東京"), Some("東京都"));
        assert_eq!(correct_prefecture(" 神奈川 "), Some("神奈川県"));
        assert_eq!(correct_prefecture("京都"), Some("京都府"));
        assert_eq!(correct_prefecture("大阪市北区"), Some("大阪府"));
        assert_eq!(correct_prefecture("北海道札幌市"), Some("北海道"));
        assert_eq!(correct_prefecture("未知"), None);
        assert_eq!(region_of("福岡"), Region::Kyushu);
    }

    #[test]
    fn tokyo_is_not_mistaken_for_kyoto() {
        assert_eq!(correct_prefecture("東京都"), Some("東京都"));
        assert_eq!(region_of("東京"), Region::Kanto);
    }

    #[test]
    fn same_region_is_always_same_bucket() {
        for region in Region::ALL {
            assert_eq!(distance_bucket(region, region), DistanceBucket::Same);
        }
    }

    #[test]
    fn neighbours_and_distant_pairs() {
        assert_eq!(
            distance_bucket(Region::Kanto, Region::Chubu),
            DistanceBucket::Neighbor
        );
        assert_eq!(
            distance_bucket(Region::Kanto, Region::Kansai),
            DistanceBucket::Distant
        );
        assert_eq!(
            distance_bucket(Region::Okinawa, Region::Kyushu),
            DistanceBucket::Distant
        );
        assert_eq!(
            distance_bucket(Region::Hokkaido, Region::KitaTohoku),
            DistanceBucket::Neighbor
        );
    }

    #[test]
    fn prefecture_list_is_complete_and_indexes_line_up() {
        assert_eq!(prefectures().count(), 47);
        for (position, region) in Region::ALL.iter().enumerate() {
            assert_eq!(region.index(), position);
        }
    }
}
