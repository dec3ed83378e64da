// Structured query engine: conjunctive filtering over the raw catalog.
// A stable filter — matching records come back in catalog order, normalized.
// Range bounds are inclusive. Empty criteria apply no constraint and return
// the full catalog unchanged; rejecting that case is the caller's job.

use crate::models::{QueryCriteria, RawInventoryRecord, Vehicle};
use crate::normalize::{normalize, parse_price_show};

fn matches(record: &RawInventoryRecord, criteria: &QueryCriteria) -> bool {
    if let Some(maker) = criteria.maker.as_deref() {
        if record.maker_name != maker {
            return false;
        }
    }
    if let Some(model) = criteria.model.as_deref() {
        if record.car_model_name != model {
            return false;
        }
    }

    // Year comparisons use the same lenient parse as normalization; an
    // unparseable year (sentinel 0) fails any min-year constraint.
    let year = record.model_year.trim().parse::<u32>().unwrap_or(0);
    if let Some(min_year) = criteria.min_year {
        if year < min_year {
            return false;
        }
    }
    if let Some(max_year) = criteria.max_year {
        if year > max_year {
            return false;
        }
    }

    let price = parse_price_show(&record.total_price_show);
    if let Some(min_price) = criteria.min_price {
        if price < min_price {
            return false;
        }
    }
    if let Some(max_price) = criteria.max_price {
        if price > max_price {
            return false;
        }
    }

    if let Some(max_mileage) = criteria.max_mileage {
        if record.mileage > max_mileage {
            return false;
        }
    }
    if let Some(body_type) = criteria.body_type.as_deref() {
        if record.body_type_name.as_deref() != Some(body_type) {
            return false;
        }
    }

    true
}

// Filters the catalog by the given criteria (AND across all present fields)
// and normalizes the matches. Zero matches is a valid empty result, not an
// error. The result is not capped here; callers bound it as needed.
pub fn search(catalog: &[RawInventoryRecord], criteria: &QueryCriteria) -> Vec<Vehicle> {
    catalog
        .iter()
        .filter(|record| matches(record, criteria))
        .map(normalize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(maker: &str, model: &str, year: &str, price: &str, mileage: u32) -> RawInventoryRecord {
        RawInventoryRecord {
            maker_name: maker.to_string(),
            car_model_name: model.to_string(),
            model_year: year.to_string(),
            total_price_show: price.to_string(),
            mileage,
            code: format!("{}-{}", maker, model),
            ..Default::default()
        }
    }

    fn catalog() -> Vec<RawInventoryRecord> {
        vec![
            record("トヨタ", "プリウス", "2021", "180万円", 32000),
            record("ホンダ", "フィット", "2019", "90万円", 45000),
            record("トヨタ", "アクア", "2018", "85.5万円", 61000),
            record("日産", "ノート", "2020", "110万円", 28000),
        ]
    }

    #[test]
    fn filters_by_maker() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                maker: Some("トヨタ".to_string()),
                ..Default::default()
            },
        );
        let names: Vec<&str> = results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["トヨタ プリウス", "トヨタ アクア"]);
    }

    #[test]
    fn filters_by_price_ceiling_inclusive() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                max_price: Some(90.0),
                ..Default::default()
            },
        );
        let names: Vec<&str> = results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["ホンダ フィット", "トヨタ アクア"]);
    }

    #[test]
    fn conjunction_of_maker_and_price() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                maker: Some("トヨタ".to_string()),
                max_price: Some(150.0),
                ..Default::default()
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "トヨタ アクア");
    }

    #[test]
    fn year_floor_is_inclusive() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                min_year: Some(2020),
                ..Default::default()
            },
        );
        let names: Vec<&str> = results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["トヨタ プリウス", "日産 ノート"]);
    }

    #[test]
    fn mileage_ceiling() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                max_mileage: Some(32000),
                ..Default::default()
            },
        );
        let names: Vec<&str> = results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["トヨタ プリウス", "日産 ノート"]);
    }

    #[test]
    fn empty_criteria_returns_full_catalog_in_order() {
        let results = search(&catalog(), &QueryCriteria::default());
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].name, "トヨタ プリウス");
        assert_eq!(results[3].name, "日産 ノート");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                maker: Some("スバル".to_string()),
                ..Default::default()
            },
        );
        assert!(results.is_empty());
    }

    #[test]
    fn preserves_catalog_order() {
        let results = search(
            &catalog(),
            &QueryCriteria {
                max_price: Some(200.0),
                ..Default::default()
            },
        );
        let names: Vec<&str> = results.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["トヨタ プリウス", "ホンダ フィット", "トヨタ アクア", "日産 ノート"]
        );
    }
}
