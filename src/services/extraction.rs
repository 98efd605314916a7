use std::fmt::Write;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Appointment, Field, ServiceCatalog};

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:name is|i['’]m|i am|my name['’]s)\s+([a-z]+(?:\s+[a-z]+)?)")
        .expect("name pattern")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("email pattern"));

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}|\(\d{3}\)\s?\d{3}[-.\s]?\d{4}")
        .expect("phone pattern")
});

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b").expect("numeric date pattern")
});

static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?\b(?:,?\s+\d{4}\b)?",
    )
    .expect("month date pattern")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:a\.m\.|p\.m\.|(?:am|pm)\b)")
        .expect("time pattern")
});

/// Everything a rule may consult besides the utterance itself.
pub struct ExtractionContext<'a> {
    pub catalog: &'a ServiceCatalog,
    pub today: NaiveDate,
    pub date_format: &'a str,
}

type Rule = fn(&str, &ExtractionContext<'_>) -> Option<String>;

/// One rule per required field. Order here does not matter; each rule is independent.
const RULES: [(Field, Rule); 6] = [
    (Field::Service, service_rule),
    (Field::Name, name_rule),
    (Field::Email, email_rule),
    (Field::Phone, phone_rule),
    (Field::Date, date_rule),
    (Field::Time, time_rule),
];

fn service_rule(text: &str, ctx: &ExtractionContext<'_>) -> Option<String> {
    extract_service(text, ctx.catalog)
}

fn name_rule(text: &str, _: &ExtractionContext<'_>) -> Option<String> {
    extract_name(text)
}

fn email_rule(text: &str, _: &ExtractionContext<'_>) -> Option<String> {
    extract_email(text)
}

fn phone_rule(text: &str, _: &ExtractionContext<'_>) -> Option<String> {
    extract_phone(text)
}

fn date_rule(text: &str, ctx: &ExtractionContext<'_>) -> Option<String> {
    extract_date(text, ctx.today, ctx.date_format)
}

fn time_rule(text: &str, _: &ExtractionContext<'_>) -> Option<String> {
    extract_time(text)
}

/// Runs every rule whose field is still empty and stores what matched.
/// Returns the fields that were filled by this utterance.
pub fn apply(appointment: &mut Appointment, text: &str, ctx: &ExtractionContext<'_>) -> Vec<Field> {
    let mut filled = Vec::new();
    for (field, rule) in RULES {
        if appointment.is_filled(field) {
            continue;
        }
        if let Some(value) = rule(text, ctx) {
            tracing::debug!(field = field.as_str(), value = %value, "extracted field");
            if appointment.fill(field, value) {
                filled.push(field);
            }
        }
    }
    filled
}

pub fn extract_service(text: &str, catalog: &ServiceCatalog) -> Option<String> {
    catalog.find_in(text).map(str::to_string)
}

pub fn extract_name(text: &str) -> Option<String> {
    let caps = NAME_RE.captures(text)?;
    let name = caps
        .get(1)?
        .as_str()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    Some(name)
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Numeric dates, then month-name phrases, then "tomorrow", then "today".
/// Relative dates are rendered with `date_format`.
pub fn extract_date(text: &str, today: NaiveDate, date_format: &str) -> Option<String> {
    if let Some(m) = NUMERIC_DATE_RE.find(text) {
        return Some(m.as_str().to_string());
    }
    if let Some(m) = MONTH_DATE_RE.find(text) {
        return Some(m.as_str().to_string());
    }

    let lower = text.to_lowercase();
    if lower.contains("tomorrow") {
        return render_date(today.succ_opt()?, date_format);
    }
    if lower.contains("today") {
        return render_date(today, date_format);
    }
    None
}

/// Formats `date`, or `None` when the pattern asks for fields a date does not
/// have (`%H`, `%z`, ...).
pub fn render_date(date: NaiveDate, date_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(date_format)).ok()?;
    Some(out)
}

pub fn extract_time(text: &str) -> Option<String> {
    TIME_RE.find(text).map(|m| m.as_str().to_string())
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}
