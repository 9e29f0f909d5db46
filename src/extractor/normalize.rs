//! Total conversions from scraped text to typed values.
//!
//! None of these functions fail: absent, blank or malformed input yields
//! `None` so one bad cell never aborts a record.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DATE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[A-Za-z]{3,9}\.? \d{1,2}, \d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4}|\d{1,2}\.\d{1,2}\.\d{4}",
    )
    .unwrap()
});

static MONEY_IN_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"€([\d,.]+(?:bn|[kmb])?)").unwrap());

static NUMBER_WITH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:(bn|b|m|k)\b)?").unwrap());

static DOB_AGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<dob>.*)\s\((?P<age>\d*)\)").unwrap());

static ENTITY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:verein|spieler|trainer|wettbewerb|pokalwettbewerb)/([A-Za-z0-9]+)").unwrap()
});

static FLAG_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/(\d+)\.\w+").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
];

/// Calendar date from "Jun 30, 2026", "2026-06-30", "30.06.2026" or
/// "06/30/2026", also when embedded in surrounding text.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    try_formats(text).or_else(|| {
        DATE_FRAGMENT
            .find_iter(text)
            .find_map(|m| try_formats(m.as_str()))
    })
}

fn try_formats(text: &str) -> Option<NaiveDate> {
    let parse = |candidate: &str| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
    };
    let text = text.trim();
    // abbreviations such as "Jun." carry a period
    parse(text).or_else(|| text.contains(". ").then(|| parse(&text.replace(". ", " "))).flatten())
}

/// Money or count in base units: "€1.05m" → 1050000, "€500k" → 500000,
/// "€2bn" → 2000000000, "1,234" → 1234.
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    let text = raw?.trim().to_lowercase();
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = if text.contains('<') {
        MONEY_IN_MARKUP.captures(&text)?.get(1)?.as_str().to_string()
    } else {
        text.replace(['€', '+', '\'', '"'], "")
    };
    let value = value.replace(',', "");

    let captures = NUMBER_WITH_SUFFIX.captures(&value)?;
    let digits = captures.get(1)?.as_str();
    let multiplier = match captures.get(2).map(|m| m.as_str()) {
        Some("k") => 1_000.0,
        Some("m") => 1_000_000.0,
        Some("bn") | Some("b") => 1_000_000_000.0,
        // plain counts stay integral so large values keep every digit
        _ => {
            let whole = digits.split('.').next()?;
            return whole.parse().ok();
        }
    };
    let number: f64 = digits.parse().ok()?;
    Some((number * multiplier).round() as i64)
}

/// Decimal such as points per game. Requires at least one digit.
pub fn parse_float(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    text.replace(',', ".").parse().ok()
}

/// Height in centimetres from "1,85 m", "1.85m", "1،85 m", "185 cm" or "185".
pub fn parse_height(raw: Option<&str>) -> Option<i64> {
    let text = raw?;
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_alphabetic())
        .map(|c| if c == ',' || c == '،' { '.' } else { c })
        .collect();

    if cleaned.contains('.') {
        let metres: f64 = cleaned.parse().ok()?;
        Some((metres * 100.0).round() as i64)
    } else {
        cleaned.parse().ok()
    }
}

/// All digit characters of the text read as one integer: "1,234 days" → 1234.
pub fn parse_days(raw: Option<&str>) -> Option<i64> {
    let digits: String = raw?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Splits "Nov 6, 2001 (23)" into its date and age parts.
pub fn split_dob_age(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(captures) = raw.and_then(|text| DOB_AGE.captures(text.trim())) else {
        return (None, None);
    };
    let part = |name| {
        captures
            .name(name)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };
    (part("dob"), part("age"))
}

/// Identifier segment of an entity URL such as
/// `/fc-bayern-munchen/startseite/verein/27/saison_id/2024` → `27`.
pub fn entity_id(url: &str) -> Option<String> {
    ENTITY_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Value of a `/key/value` path pair or a `key=value` query parameter.
pub fn path_param(url: &str, key: &str) -> Option<String> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    let mut segments = path.split('/');
    while let Some(segment) = segments.next() {
        if segment == key {
            return segments
                .next()
                .filter(|v| !v.is_empty())
                .map(str::to_string);
        }
    }

    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, value)| *name == key && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Country id from a flag image URL: `.../flagge/tiny/40.png?lm=1` → `40`.
pub fn flag_country_id(src: &str) -> Option<String> {
    FLAG_ID
        .captures(src)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Comma separated list with blank items removed.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|text| {
        text.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
