// Heuristic intent extraction from free-text chat input. A fixed-rule
// cascade, not language understanding: each rule is a pure function that
// may contribute fields to one criteria accumulator. The recommendation
// check short-circuits before any criteria are built. No negation handling,
// no unit disambiguation; this is a fast path in front of the generative
// backend, nothing more.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::QueryCriteria;

// Outcome of a free-text scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    // At least one structured constraint was found.
    Criteria(QueryCriteria),
    // The user asked for general recommendations; skip criteria entirely.
    Recommend,
    // Nothing extractable; the orchestrator should delegate to the backend.
    Unresolved,
}

// Known maker aliases, native script first. First match wins; the criteria
// value is always the native-script name used by the catalog.
const MAKER_ALIASES: [(&str, &[&str]); 6] = [
    ("トヨタ", &["トヨタ", "toyota"]),
    ("ホンダ", &["ホンダ", "honda"]),
    ("日産", &["日産", "nissan"]),
    ("スズキ", &["スズキ", "suzuki"]),
    ("マツダ", &["マツダ", "mazda"]),
    ("ダイハツ", &["ダイハツ", "daihatsu"]),
];

const RECOMMEND_TOKENS: [&str; 2] = ["おすすめ", "人気"];

// "<digits>万円以内" / "<digits>万円以下" — price ceiling in manyen.
static PRICE_CEILING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)万円以[下内]").expect("price ceiling regex is valid"));

// "<4 digits>年以降" — model-year floor.
static YEAR_FLOOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})年以降").expect("year floor regex is valid"));

fn extract_maker(lower: &str, criteria: &mut QueryCriteria) {
    for (maker, aliases) in MAKER_ALIASES {
        if aliases.iter().any(|alias| lower.contains(alias)) {
            criteria.maker = Some(maker.to_string());
            return;
        }
    }
}

fn extract_price_ceiling(lower: &str, criteria: &mut QueryCriteria) {
    if let Some(caps) = PRICE_CEILING_RE.captures(lower) {
        if let Ok(max_price) = caps[1].parse::<f64>() {
            criteria.max_price = Some(max_price);
        }
    }
}

fn extract_year_floor(lower: &str, criteria: &mut QueryCriteria) {
    if let Some(caps) = YEAR_FLOOR_RE.captures(lower) {
        if let Ok(min_year) = caps[1].parse::<u32>() {
            criteria.min_year = Some(min_year);
        }
    }
}

// Scans free text for extractable search intent. Best effort, ordered:
// recommendation phrases short-circuit, then maker / price ceiling / year
// floor each contribute at most one field.
pub fn extract(free_text: &str) -> Intent {
    let lower = free_text.to_lowercase();

    if RECOMMEND_TOKENS.iter().any(|token| lower.contains(token)) {
        return Intent::Recommend;
    }

    let mut criteria = QueryCriteria::default();
    let rules: [fn(&str, &mut QueryCriteria); 3] =
        [extract_maker, extract_price_ceiling, extract_year_floor];
    for rule in rules {
        rule(&lower, &mut criteria);
    }

    if criteria.is_empty() {
        Intent::Unresolved
    } else {
        Intent::Criteria(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_native_script_maker() {
        let Intent::Criteria(criteria) = extract("トヨタの車が見たい") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.maker.as_deref(), Some("トヨタ"));
    }

    #[test]
    fn detects_latin_script_maker_case_insensitively() {
        let Intent::Criteria(criteria) = extract("Do you have any Honda?") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.maker.as_deref(), Some("ホンダ"));
    }

    #[test]
    fn first_maker_match_wins() {
        // Both トヨタ and ホンダ appear; the alias table order decides.
        let Intent::Criteria(criteria) = extract("ホンダかトヨタで迷っています") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.maker.as_deref(), Some("トヨタ"));
    }

    #[test]
    fn extracts_price_ceiling_inai() {
        let Intent::Criteria(criteria) = extract("100万円以内で探してます") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.max_price, Some(100.0));
    }

    #[test]
    fn extracts_price_ceiling_ika() {
        let Intent::Criteria(criteria) = extract("予算は150万円以下") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.max_price, Some(150.0));
    }

    #[test]
    fn extracts_year_floor() {
        let Intent::Criteria(criteria) = extract("2019年以降のモデルがいい") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.min_year, Some(2019));
    }

    #[test]
    fn combines_maker_and_price() {
        let Intent::Criteria(criteria) = extract("ホンダで100万円以内") else {
            panic!("expected criteria");
        };
        assert_eq!(criteria.maker.as_deref(), Some("ホンダ"));
        assert_eq!(criteria.max_price, Some(100.0));
        assert_eq!(criteria.min_year, None);
    }

    #[test]
    fn recommend_phrase_short_circuits() {
        assert_eq!(extract("おすすめを教えて"), Intent::Recommend);
        assert_eq!(extract("人気の車は？"), Intent::Recommend);
    }

    #[test]
    fn recommend_wins_over_criteria() {
        // Even with a maker present, the recommendation check runs first.
        assert_eq!(extract("トヨタでおすすめは？"), Intent::Recommend);
    }

    #[test]
    fn unresolved_when_nothing_matches() {
        assert_eq!(extract("こんにちは"), Intent::Unresolved);
        assert_eq!(extract("燃費のいい赤い車"), Intent::Unresolved);
    }
}
