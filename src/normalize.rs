// Catalog normalization: converts raw heterogeneous inventory records into
// the canonical Vehicle shape. Total function — malformed input never fails,
// it degrades to defined defaults (0 for numbers, fallback strings for specs).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{RawInventoryRecord, Vehicle, VehicleSpecs};

// Matches the first "<digits>[.<digits>]万円" run in a localized price string.
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)万円").expect("price regex is valid"));

// Equipment-name substrings that count as notable safety features:
// airbags, ABS, stability control, collision mitigation.
const SAFETY_KEYWORDS: [&str; 4] = ["エアバッグ", "ABS", "横滑り", "衝突"];
const SAFETY_FALLBACK: &str = "基本安全装備";
const MAX_SAFETY_FEATURES: usize = 3;

// Parses a price string like "70.7万円" into manyen (70.7). Unparseable or
// empty input yields 0.
pub fn parse_price_show(price_show: &str) -> f64 {
    PRICE_RE
        .captures(price_show)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn derive_engine_spec(raw: &RawInventoryRecord) -> String {
    let displacement = raw.displacement.unwrap_or(0);
    match raw.engine_type.as_deref() {
        Some("ハイブリッド") => format!("{}cc ハイブリッド", displacement),
        Some(engine_type) if !engine_type.is_empty() => {
            format!("{}cc {}", displacement, engine_type)
        }
        _ => format!("{}cc ガソリン", displacement),
    }
}

fn derive_size_spec(raw: &RawInventoryRecord) -> String {
    format!(
        "{}ドア・{}人乗り",
        raw.door.unwrap_or(4),
        raw.person.unwrap_or(4)
    )
}

fn derive_safety_spec(raw: &RawInventoryRecord) -> String {
    let Some(equip_names) = raw.equip_names.as_ref() else {
        return SAFETY_FALLBACK.to_string();
    };

    let matches: Vec<&str> = equip_names
        .iter()
        .filter(|eq| SAFETY_KEYWORDS.iter().any(|kw| eq.contains(kw)))
        .take(MAX_SAFETY_FEATURES)
        .map(String::as_str)
        .collect();

    if matches.is_empty() {
        SAFETY_FALLBACK.to_string()
    } else {
        matches.join(", ")
    }
}

// Converts one raw inventory record into the canonical Vehicle shape.
// Pure and idempotent; never panics on malformed input.
pub fn normalize(raw: &RawInventoryRecord) -> Vehicle {
    let mut name = format!("{} {}", raw.maker_name, raw.car_model_name);
    if let Some(grade) = raw.grade1.as_deref() {
        if !grade.is_empty() {
            name.push(' ');
            name.push_str(grade);
        }
    }

    // Year string must be a plain integer (e.g. "2021"); anything else
    // falls back to the 0 sentinel rather than failing the record.
    let year = raw.model_year.trim().parse::<u32>().unwrap_or(0);

    let image_url = raw
        .photo_files
        .as_ref()
        .and_then(|photos| photos.first())
        .filter(|url| !url.is_empty())
        .cloned()
        .unwrap_or_else(|| format!("https://picsum.photos/seed/{}/800/600", raw.code));

    Vehicle {
        name,
        year,
        mileage: raw.mileage,
        price: parse_price_show(&raw.total_price_show),
        image_url,
        specs: VehicleSpecs {
            engine: derive_engine_spec(raw),
            size: derive_size_spec(raw),
            safety: derive_safety_spec(raw),
        },
        is_favorite: false,
        price_drop_notification: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> RawInventoryRecord {
        RawInventoryRecord {
            maker_name: "トヨタ".to_string(),
            car_model_name: "プリウス".to_string(),
            grade1: Some("S".to_string()),
            model_year: "2021".to_string(),
            mileage: 32000,
            total_price_show: "180万円".to_string(),
            photo_files: Some(vec!["https://example.com/prius.jpg".to_string()]),
            engine_type: Some("ハイブリッド".to_string()),
            displacement: Some(1800),
            door: Some(5),
            person: Some(5),
            equip_names: Some(vec![
                "サイドエアバッグ".to_string(),
                "ABS".to_string(),
                "横滑り防止装置".to_string(),
                "衝突被害軽減ブレーキ".to_string(),
            ]),
            body_type_name: Some("ハッチバック".to_string()),
            code: "TP001".to_string(),
        }
    }

    #[test]
    fn parses_fractional_price() {
        assert_eq!(parse_price_show("70.7万円"), 70.7);
    }

    #[test]
    fn parses_integer_price() {
        assert_eq!(parse_price_show("40万円"), 40.0);
    }

    #[test]
    fn malformed_price_yields_zero() {
        assert_eq!(parse_price_show(""), 0.0);
        assert_eq!(parse_price_show("応談"), 0.0);
        assert_eq!(parse_price_show("万円"), 0.0);
    }

    #[test]
    fn normalizes_complete_record() {
        let vehicle = normalize(&sample_record());
        assert_eq!(vehicle.name, "トヨタ プリウス S");
        assert_eq!(vehicle.year, 2021);
        assert_eq!(vehicle.mileage, 32000);
        assert_eq!(vehicle.price, 180.0);
        assert_eq!(vehicle.image_url, "https://example.com/prius.jpg");
        assert_eq!(vehicle.specs.engine, "1800cc ハイブリッド");
        assert_eq!(vehicle.specs.size, "5ドア・5人乗り");
        assert!(!vehicle.is_favorite);
    }

    #[test]
    fn safety_spec_takes_first_three_matches() {
        let vehicle = normalize(&sample_record());
        assert_eq!(
            vehicle.specs.safety,
            "サイドエアバッグ, ABS, 横滑り防止装置"
        );
    }

    #[test]
    fn normalization_is_total_on_empty_record() {
        // A record missing every field must still normalize without panicking.
        let vehicle = normalize(&RawInventoryRecord::default());
        assert_eq!(vehicle.name, " ");
        assert_eq!(vehicle.year, 0);
        assert_eq!(vehicle.mileage, 0);
        assert_eq!(vehicle.price, 0.0);
        assert_eq!(vehicle.image_url, "https://picsum.photos/seed//800/600");
        assert_eq!(vehicle.specs.engine, "0cc ガソリン");
        assert_eq!(vehicle.specs.size, "4ドア・4人乗り");
        assert_eq!(vehicle.specs.safety, "基本安全装備");
    }

    #[test]
    fn missing_photo_derives_placeholder_from_code() {
        let mut raw = sample_record();
        raw.photo_files = None;
        let vehicle = normalize(&raw);
        assert_eq!(vehicle.image_url, "https://picsum.photos/seed/TP001/800/600");
    }

    #[test]
    fn gasoline_engine_without_type_string() {
        let mut raw = sample_record();
        raw.engine_type = None;
        raw.displacement = Some(1500);
        let vehicle = normalize(&raw);
        assert_eq!(vehicle.specs.engine, "1500cc ガソリン");
    }

    #[test]
    fn no_safety_matches_falls_back() {
        let mut raw = sample_record();
        raw.equip_names = Some(vec!["ナビ".to_string(), "ETC".to_string()]);
        let vehicle = normalize(&raw);
        assert_eq!(vehicle.specs.safety, "基本安全装備");
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = sample_record();
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
