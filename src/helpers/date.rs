//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, TimeZone};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SiteConfig;

lazy_static! {
    static ref DATE_FNS_TOKEN: Regex =
        Regex::new(r"'[^']*'|yyyy|yy|MMMM|MMM|MM|M|LLLL|LLL|LL|L|dd|d|EEEE|EEE|HH|H|mm|ss")
            .unwrap();
}

/// Formats publication dates for display
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: String,
    locale: Locale,
    tz: Tz,
}

impl DateFormatter {
    pub fn new(format: &str, language: &str, timezone: &str) -> Self {
        let tz = timezone.parse::<Tz>().unwrap_or_else(|_| {
            if !timezone.is_empty() {
                tracing::warn!("Unknown timezone {:?}, falling back to UTC", timezone);
            }
            Tz::UTC
        });

        Self {
            format: date_fns_to_chrono(format),
            locale: locale_for(language),
            tz,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.date_format, &config.language, &config.timezone)
    }

    /// Format a raw API timestamp
    ///
    /// Missing dates render as an empty string; unparseable ones are shown as-is.
    pub fn display(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return String::new();
        };

        match parse_api_date(raw) {
            Some(date) => format_date(&date.with_timezone(&self.tz), &self.format, self.locale),
            None => {
                tracing::debug!("Unparseable publication date {:?}", raw);
                raw.to_string()
            }
        }
    }
}

/// Parse a content API timestamp such as `2021-03-25T19:25:28+0000`
pub fn parse_api_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Format a date with a chrono format string in the given locale
pub fn format_date<Tz2: TimeZone>(date: &DateTime<Tz2>, chrono_format: &str, locale: Locale) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    date.format_localized(chrono_format, locale).to_string()
}

/// Map a site language tag to a chrono locale
pub fn locale_for(language: &str) -> Locale {
    match language.to_ascii_lowercase().replace('-', "_").as_str() {
        "pt_br" => Locale::pt_BR,
        "pt" | "pt_pt" => Locale::pt_PT,
        "en" | "en_us" => Locale::en_US,
        "en_gb" => Locale::en_GB,
        "es" | "es_es" => Locale::es_ES,
        "fr" | "fr_fr" => Locale::fr_FR,
        "de" | "de_de" => Locale::de_DE,
        _ => Locale::POSIX,
    }
}

/// Convert a date-fns format string to chrono format
///
/// Text inside single quotes is copied literally.
fn date_fns_to_chrono(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut last = 0;

    for m in DATE_FNS_TOKEN.find_iter(format) {
        result.push_str(&format[last..m.start()].replace('%', "%%"));
        let token = m.as_str();
        let converted = match token {
            "yyyy" => "%Y".to_string(),
            "yy" => "%y".to_string(),
            "MMMM" | "LLLL" => "%B".to_string(),
            "MMM" | "LLL" => "%b".to_string(),
            "MM" | "LL" => "%m".to_string(),
            "M" | "L" => "%-m".to_string(),
            "dd" => "%d".to_string(),
            "d" => "%-d".to_string(),
            "EEEE" => "%A".to_string(),
            "EEE" => "%a".to_string(),
            "HH" => "%H".to_string(),
            "H" => "%-H".to_string(),
            "mm" => "%M".to_string(),
            "ss" => "%S".to_string(),
            quoted => quoted.trim_matches('\'').replace('%', "%%"),
        };
        result.push_str(&converted);
        last = m.end();
    }
    result.push_str(&format[last..].replace('%', "%%"));

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_fns_to_chrono() {
        assert_eq!(date_fns_to_chrono("dd LLL yyyy"), "%d %b %Y");
        assert_eq!(date_fns_to_chrono("yyyy-MM-dd HH:mm"), "%Y-%m-%d %H:%M");
        assert_eq!(date_fns_to_chrono("d 'de' MMMM"), "%-d de %B");
    }

    #[test]
    fn test_parse_api_date() {
        assert!(parse_api_date("2021-03-25T19:25:28+0000").is_some());
        assert!(parse_api_date("2021-03-25T19:25:28+00:00").is_some());
        assert!(parse_api_date("yesterday").is_none());
    }

    #[test]
    fn test_display_in_pt_br() {
        let formatter = DateFormatter::new("dd LLL yyyy", "pt-BR", "America/Sao_Paulo");
        assert_eq!(
            formatter.display(Some("2021-03-25T19:25:28+0000")),
            "25 mar 2021"
        );
    }

    #[test]
    fn test_display_shifts_to_timezone() {
        let formatter = DateFormatter::new("yyyy-MM-dd", "en", "America/Sao_Paulo");
        assert_eq!(formatter.display(Some("2021-03-26T01:00:00+0000")), "2021-03-25");
    }

    #[test]
    fn test_display_missing_and_malformed() {
        let formatter = DateFormatter::new("dd LLL yyyy", "pt-BR", "");
        assert_eq!(formatter.display(None), "");
        assert_eq!(formatter.display(Some("not a date")), "not a date");
    }
}
