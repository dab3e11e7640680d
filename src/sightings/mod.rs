//! Recent bird sightings: the record type, the observation client, and the
//! spoken summary built from a list of records.

mod client;

pub use client::{ObservationClient, SERVICE};

use chrono::{NaiveDate, NaiveDateTime};

/// One observation as reported by the observation service.
#[derive(Clone, Debug, PartialEq)]
pub struct SightingRecord {
    pub common_name: String,
    pub observed_at: NaiveDateTime,
}

/// Parse an `obsDt` value: `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` when no
/// time was recorded (taken as midnight).
pub fn parse_observation_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").or_else(|err| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| date.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| err)
    })
}

/// Join common names into one spoken list: `"A, B, and C."`, `"A, and B."`,
/// or `"A."`. Order is preserved.
///
/// Callers handle the empty case themselves; an empty slice yields an
/// empty string.
pub fn format_sightings(records: &[SightingRecord]) -> String {
    let names: Vec<&str> = records.iter().map(|r| r.common_name.as_str()).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => format!("{}.", last),
        Some((last, rest)) => format!("{}, and {}.", rest.join(", "), last),
    }
}

/// Calendar date of the last record in the order the service returned them.
///
/// The service lists newest first, so this is the oldest date covered by
/// the summary. Records are not re-sorted.
pub fn most_recent_date(records: &[SightingRecord]) -> Option<NaiveDate> {
    records.last().map(|r| r.observed_at.date())
}

/// `"{city} {state}"`, or just the city when no state is known.
pub fn place_label(city: &str, state: Option<&str>) -> String {
    match state {
        Some(state) if !state.is_empty() => format!("{} {}", city, state),
        _ => city.to_string(),
    }
}

/// Full spoken sentence for the sightings at `place`.
pub fn summarize_sightings(records: &[SightingRecord], place: &str) -> String {
    let Some(since) = most_recent_date(records) else {
        return format!("There are no recent sightings for {}.", place);
    };
    let since = since.format("%Y-%m-%d");
    let birds = format_sightings(records);

    if records.len() == 1 {
        format!(
            "The only recent bird seen since {} in {}, is a {}",
            since, place, birds
        )
    } else {
        format!(
            "The {} most recent birds seen since {} in {}, are {}",
            records.len(),
            since,
            place,
            birds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, obs_dt: &str) -> SightingRecord {
        SightingRecord {
            common_name: name.to_string(),
            observed_at: parse_observation_time(obs_dt).unwrap(),
        }
    }

    fn records(names: &[&str]) -> Vec<SightingRecord> {
        names.iter().map(|n| record(n, "2024-05-01 09:00")).collect()
    }

    #[test]
    fn test_format_single_sighting() {
        let out = format_sightings(&records(&["Blue Jay"]));
        assert_eq!(out, "Blue Jay.");
        assert!(!out.contains("and"));
    }

    #[test]
    fn test_format_two_sightings() {
        assert_eq!(format_sightings(&records(&["Blue Jay", "Robin"])), "Blue Jay, and Robin.");
    }

    #[test]
    fn test_format_three_sightings() {
        assert_eq!(
            format_sightings(&records(&["Blue Jay", "Robin", "Cardinal"])),
            "Blue Jay, Robin, and Cardinal."
        );
    }

    #[test]
    fn test_format_comma_count_and_conjunction() {
        let names = [
            "Mallard",
            "Canada Goose",
            "American Crow",
            "Song Sparrow",
            "Northern Flicker",
            "Downy Woodpecker",
            "House Finch",
            "Mourning Dove",
            "Tufted Titmouse",
            "Black-capped Chickadee",
        ];
        for n in 2..=names.len() {
            let out = format_sightings(&records(&names[..n]));
            assert_eq!(out.matches(", ").count(), n - 1, "output: {}", out);
            assert!(out.ends_with(&format!(", and {}.", names[n - 1])), "output: {}", out);
            assert_eq!(out.matches(" and ").count(), 1);
        }
    }

    #[test]
    fn test_format_empty_is_empty() {
        assert_eq!(format_sightings(&[]), "");
    }

    #[test]
    fn test_parse_observation_time_formats() {
        let with_time = parse_observation_time("2024-05-01 09:00").unwrap();
        assert_eq!(with_time.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 09:00");

        let date_only = parse_observation_time("2024-05-01").unwrap();
        assert_eq!(date_only.format("%H:%M").to_string(), "00:00");

        assert!(parse_observation_time("May 1st").is_err());
        assert!(parse_observation_time("").is_err());
    }

    #[test]
    fn test_most_recent_date_uses_last_record_without_sorting() {
        let list = vec![
            record("Blue Jay", "2024-05-03 07:15"),
            record("Robin", "2024-04-20 18:00"),
            record("Cardinal", "2024-05-02 12:30"),
        ];
        assert_eq!(
            most_recent_date(&list),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert_eq!(most_recent_date(&[]), None);
    }

    #[test]
    fn test_place_label() {
        assert_eq!(place_label("Binghamton", Some("New York")), "Binghamton New York");
        assert_eq!(place_label("Binghamton", None), "Binghamton");
        assert_eq!(place_label("Binghamton", Some("")), "Binghamton");
    }

    #[test]
    fn test_summarize_no_sightings() {
        assert_eq!(
            summarize_sightings(&[], "Binghamton New York"),
            "There are no recent sightings for Binghamton New York."
        );
    }

    #[test]
    fn test_summarize_single_sighting() {
        let list = vec![record("Snowy Owl", "2024-01-12 16:45")];
        assert_eq!(
            summarize_sightings(&list, "Binghamton New York"),
            "The only recent bird seen since 2024-01-12 in Binghamton New York, is a Snowy Owl."
        );
    }

    #[test]
    fn test_summarize_many_sightings() {
        let list = vec![
            record("Blue Jay", "2024-05-02 10:00"),
            record("Robin", "2024-05-01 17:30"),
            record("Cardinal", "2024-05-01 09:00"),
        ];
        assert_eq!(
            summarize_sightings(&list, "Binghamton New York"),
            "The 3 most recent birds seen since 2024-05-01 in Binghamton New York, are Blue Jay, Robin, and Cardinal."
        );
    }
}
