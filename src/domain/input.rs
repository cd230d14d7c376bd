//! Form input: lenient parsing plus advisory validation.

use serde::{Deserialize, Serialize};

use super::region::correct_prefecture;
use super::size::Parcel;

/// Origin used when the seller leaves it blank.
pub const DEFAULT_ORIGIN: &str = "東京都";

/// Raw values exactly as typed into the form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    pub category: String,
    pub length: String,
    pub width: String,
    pub thickness: String,
    pub weight: String,
    pub destination: String,
    pub origin: Option<String>,
    pub sale_price: Option<String>,
    pub cost_price: Option<String>,
    pub is_drop_off: Option<bool>,
}

/// Parsed product details. Read-only once handed to the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub category: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub weight: u32,
    pub destination: String,
    pub origin: String,
    pub sale_price: Option<u32>,
    pub cost_price: Option<u32>,
    pub is_drop_off: bool,
}

impl ProductInfo {
    pub fn from_form(form: &ProductForm) -> Self {
        Self::from_form_with_origin(form, DEFAULT_ORIGIN)
    }

    /// Like [`ProductInfo::from_form`], with `default_origin` standing in for a blank origin.
    pub fn from_form_with_origin(form: &ProductForm, default_origin: &str) -> Self {
        Self {
            category: form.category.trim().to_string(),
            length: parse_measure(&form.length),
            width: parse_measure(&form.width),
            thickness: parse_measure(&form.thickness),
            weight: parse_measure(&form.weight).round() as u32,
            destination: normalize_prefecture(&form.destination),
            origin: form
                .origin
                .as_deref()
                .map(normalize_prefecture)
                .filter(|origin| !origin.is_empty())
                .unwrap_or_else(|| fallback_origin(default_origin)),
            sale_price: parse_price(form.sale_price.as_deref()),
            cost_price: parse_price(form.cost_price.as_deref()),
            is_drop_off: form.is_drop_off.unwrap_or(false),
        }
    }

    pub fn parcel(&self) -> Parcel {
        Parcel::new(self.length, self.width, self.thickness, self.weight)
    }
}

fn fallback_origin(default_origin: &str) -> String {
    let origin = normalize_prefecture(default_origin);
    if origin.is_empty() {
        DEFAULT_ORIGIN.to_string()
    } else {
        origin
    }
}

fn normalize_prefecture(raw: &str) -> String {
    correct_prefecture(raw)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

fn parse_price(raw: Option<&str>) -> Option<u32> {
    raw.map(parse_measure)
        .map(|value| value.round() as u32)
        .filter(|value| *value > 0)
}

/// Reads the leading number of a form field, `parseFloat` style.
///
/// Full-width digits are accepted. Anything unparsable, non-finite or not
/// strictly positive becomes `0.0`.
pub fn parse_measure(raw: &str) -> f64 {
    leading_number(raw)
        .filter(|value| *value > 0.0)
        .unwrap_or(0.0)
}

/// The longest numeric prefix of `raw`, sign and exponent included.
pub(crate) fn leading_number(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .trim()
        .chars()
        .map(|ch| match ch {
            '０'..='９' => char::from_u32(ch as u32 - '０' as u32 + '0' as u32).unwrap_or(ch),
            '．' => '.',
            '＋' => '+',
            '－' => '-',
            'ｅ' => 'e',
            'Ｅ' => 'E',
            other => other,
        })
        .collect();
    let bytes = normalized.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    end += count_digits(&bytes[end..]);
    let mut mantissa_digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction = count_digits(&bytes[end + 1..]);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent..]);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    normalized[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Form limits shown to the seller.
pub struct ValidationRules {
    pub min_length: f64,
    pub max_length: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

pub const VALIDATION_RULES: ValidationRules = ValidationRules {
    min_length: 1.0,
    max_length: 100.0,
    min_width: 1.0,
    max_width: 100.0,
    min_thickness: 0.1,
    max_thickness: 60.0,
    min_weight: 1.0,
    max_weight: 30_000.0,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks the form the way the input screen does. Advisory only: the
/// resolver still accepts anything.
pub fn validate_form(form: &ProductForm) -> ValidationReport {
    let rules = &VALIDATION_RULES;
    let mut report = ValidationReport::default();

    if form.category.trim().is_empty() {
        report.errors.push("カテゴリを選択してください".to_string());
    }
    if form.destination.trim().is_empty() {
        report.errors.push("配送先を選択してください".to_string());
    }

    let length = check_range(
        &mut report,
        &form.length,
        "長さ",
        "cm",
        rules.min_length,
        rules.max_length,
    );
    let width = check_range(
        &mut report,
        &form.width,
        "幅",
        "cm",
        rules.min_width,
        rules.max_width,
    );
    let thickness = check_range(
        &mut report,
        &form.thickness,
        "厚み",
        "cm",
        rules.min_thickness,
        rules.max_thickness,
    );
    let weight = check_range(
        &mut report,
        &form.weight,
        "重量",
        "g",
        rules.min_weight,
        rules.max_weight,
    );

    if report.is_valid() {
        if thickness > 3.0 {
            report
                .warnings
                .push("厚み3cm超過：配送方法が限定される可能性があります".to_string());
        }
        if weight > 1000.0 {
            report
                .warnings
                .push("重量1kg超過：一部サービスが利用できません".to_string());
        }
        if length > 50.0 || width > 50.0 {
            report
                .warnings
                .push("大型サイズ：宅配便が必要な可能性があります".to_string());
        }
    }

    report
}

fn check_range(
    report: &mut ValidationReport,
    raw: &str,
    label: &str,
    unit: &str,
    min: f64,
    max: f64,
) -> f64 {
    let value = parse_measure(raw);
    if value <= 0.0 {
        report
            .errors
            .push(format!("{label}は正の数値で入力してください"));
    } else if value < min || value > max {
        report
            .errors
            .push(format!("{label}は{min}〜{max}{unit}の範囲で入力してください"));
    }
    value
}
