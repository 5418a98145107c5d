//! Free-form timestamp parsing for `--time`.
//!
//! Input is tried against a fixed, ordered list of common layouts and the
//! first one that parses wins. Runs of whitespace are collapsed first, so a
//! space-padded day (`Nov  2`) parses like `Nov 2`. Layouts carrying a zone
//! abbreviation (`MST`, `UTC`, ...) cannot be resolved without a zone
//! database, so the abbreviation is checked for shape and the wall time is
//! read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

#[derive(Clone, Copy, Debug)]
enum Layout {
    /// strftime pattern without any zone, read as UTC.
    Naive(&'static str),
    /// strftime pattern with a numeric `%z` offset.
    Offset(&'static str),
    /// strftime pattern with a `%Z` abbreviation at whitespace-separated
    /// field `zone_field`, read as UTC.
    Abbreviated {
        pattern: &'static str,
        zone_field: usize,
    },
    /// RFC 3339, with or without fractional seconds.
    Rfc3339,
}

#[derive(Clone, Copy, Debug)]
pub struct TimeFormat {
    pub name: &'static str,
    layout: Layout,
}

impl TimeFormat {
    fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        match self.layout {
            Layout::Naive(pattern) => parse_as_utc(input, pattern),
            Layout::Offset(pattern) => DateTime::parse_from_str(input, pattern).ok(),
            Layout::Abbreviated {
                pattern,
                zone_field,
            } => {
                // chrono's `%Z` skips any token, including numeric offsets.
                let zone = input.split(' ').nth(zone_field)?;
                if !is_zone_abbreviation(zone) {
                    return None;
                }
                parse_as_utc(input, pattern)
            }
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
        }
    }
}

fn parse_as_utc(input: &str, pattern: &str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(input, pattern)
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

fn is_zone_abbreviation(token: &str) -> bool {
    (1..=5).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_uppercase())
}

/// Accepted layouts, in the order they are tried.
pub const TIME_FORMATS: [TimeFormat; 9] = [
    TimeFormat {
        name: "ANSIC",
        layout: Layout::Naive("%a %b %e %H:%M:%S %Y"),
    },
    TimeFormat {
        name: "UnixDate",
        layout: Layout::Abbreviated {
            pattern: "%a %b %e %H:%M:%S %Z %Y",
            zone_field: 4,
        },
    },
    TimeFormat {
        name: "RubyDate",
        layout: Layout::Offset("%a %b %d %H:%M:%S %z %Y"),
    },
    TimeFormat {
        name: "RFC822",
        layout: Layout::Abbreviated {
            pattern: "%d %b %y %H:%M %Z",
            zone_field: 4,
        },
    },
    TimeFormat {
        name: "RFC822Z",
        layout: Layout::Offset("%d %b %y %H:%M %z"),
    },
    TimeFormat {
        name: "RFC850",
        layout: Layout::Abbreviated {
            pattern: "%A, %d-%b-%y %H:%M:%S %Z",
            zone_field: 3,
        },
    },
    TimeFormat {
        name: "RFC1123",
        layout: Layout::Abbreviated {
            pattern: "%a, %d %b %Y %H:%M:%S %Z",
            zone_field: 5,
        },
    },
    TimeFormat {
        name: "RFC1123Z",
        layout: Layout::Offset("%a, %d %b %Y %H:%M:%S %z"),
    },
    TimeFormat {
        name: "RFC3339",
        layout: Layout::Rfc3339,
    },
];

/// Parses `input` with the first matching entry of [`TIME_FORMATS`].
pub fn parse_time(input: &str) -> Option<(DateTime<FixedOffset>, &'static TimeFormat)> {
    let input = input.split_whitespace().collect::<Vec<_>>().join(" ");
    TIME_FORMATS
        .iter()
        .find_map(|format| format.parse(&input).map(|t| (t, format)))
}
