use crate::ProjectStatus;

use std::str::FromStr;

#[test]
fn test_as_str_round_trip() {
    for status in [
        ProjectStatus::Draft,
        ProjectStatus::InProgress,
        ProjectStatus::Done,
        ProjectStatus::Archived,
    ] {
        assert_eq!(ProjectStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_from_str_rejects_unknown_value() {
    assert!(ProjectStatus::from_str("cancelled").is_err());
}

#[test]
fn test_default_is_draft() {
    assert_eq!(ProjectStatus::default(), ProjectStatus::Draft);
}

#[test]
fn test_display_matches_database_representation() {
    assert_eq!(ProjectStatus::InProgress.to_string(), "in_progress");
}
