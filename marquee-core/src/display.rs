//! Stateless text helpers used by renderers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maximum title length on list cards before truncation.
pub const TITLE_MAX_CHARS: usize = 30;
/// Maximum overview length on list cards before truncation.
pub const OVERVIEW_MAX_CHARS: usize = 140;

const ELLIPSIS: &str = "...";

/// Cut `text` to at most `max_chars` characters, appending `...` when
/// anything was cut. Counts chars, not bytes, so multibyte titles are never
/// split mid-character.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// How release dates are printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `2024. 1. 5.`
    #[default]
    Korean,
    /// `2024-01-05`
    Iso,
    /// `1/5/2024`
    Us,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::Korean => "korean",
            DateFormat::Iso => "iso",
            DateFormat::Us => "us",
        }
    }
}

impl std::str::FromStr for DateFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "korean" | "ko" => Ok(DateFormat::Korean),
            "iso" => Ok(DateFormat::Iso),
            "us" | "en-us" => Ok(DateFormat::Us),
            other => Err(format!("unknown date format '{other}'")),
        }
    }
}

/// Format a `YYYY-MM-DD` release date. Input that does not parse is returned
/// unchanged rather than dropped.
pub fn format_release_date(raw: &str, format: DateFormat) -> String {
    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") else {
        return raw.to_string();
    };

    match format {
        DateFormat::Korean => {
            format!("{}. {}. {}.", date.year(), date.month(), date.day())
        }
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        DateFormat::Us => {
            format!("{}/{}/{}", date.month(), date.day(), date.year())
        }
    }
}

/// `7.5/10`, or `None` for missing or zero ratings (not rated yet).
pub fn format_rating(vote_average: Option<f32>) -> Option<String> {
    vote_average
        .filter(|avg| *avg > 0.0)
        .map(|avg| format!("{avg:.1}/10"))
}
