use weekplan::time::{ClockTime, TaskDuration, is_time_range_valid, is_valid_time, time_to_minutes};

#[test]
fn accepts_one_or_two_digit_hours() {
    assert_eq!(ClockTime::parse("9:05").unwrap().minutes(), 9 * 60 + 5);
    assert_eq!(ClockTime::parse("09:05").unwrap().minutes(), 9 * 60 + 5);
    assert_eq!(ClockTime::parse("00:00").unwrap().minutes(), 0);
    assert_eq!(ClockTime::parse("23:59").unwrap().minutes(), 23 * 60 + 59);
}

#[test]
fn rejects_malformed_times() {
    for bad in ["24:00", "12:60", "12:5", "123:00", "1200", "", ":30", "ab:cd", "+1:00", "12:00 "] {
        assert!(!is_valid_time(bad), "{bad:?} should be rejected");
    }
}

#[test]
fn minutes_round_trip_and_bounds() {
    let time = ClockTime::from_minutes(13 * 60 + 7).unwrap();
    assert_eq!(time.to_string(), "13:07");
    assert_eq!(ClockTime::from_minutes(24 * 60), None);
    assert_eq!(time_to_minutes("7:30"), Some(450));
    assert_eq!(time_to_minutes("7:3"), None);
}

#[test]
fn twelve_hour_formatting() {
    assert_eq!(ClockTime::parse("00:15").unwrap().format_12h(), "12:15 AM");
    assert_eq!(ClockTime::parse("09:05").unwrap().format_12h(), "9:05 AM");
    assert_eq!(ClockTime::parse("12:00").unwrap().format_12h(), "12:00 PM");
    assert_eq!(ClockTime::parse("17:30").unwrap().format_12h(), "5:30 PM");
}

#[test]
fn range_requires_valid_times_in_order() {
    assert!(is_time_range_valid("09:00", "17:00"));
    assert!(is_time_range_valid("9:00", "09:01"));
    assert!(!is_time_range_valid("09:00", "09:00"));
    assert!(!is_time_range_valid("17:00", "09:00"));
    assert!(!is_time_range_valid("nine", "17:00"));
    assert!(!is_time_range_valid("09:00", "25:00"));
}

#[test]
fn duration_display_and_minutes() {
    assert_eq!(TaskDuration::default(), TaskDuration::new(1, 0));
    assert_eq!(TaskDuration::new(0, 45).to_string(), "45m");
    assert_eq!(TaskDuration::new(2, 0).to_string(), "2h");
    assert_eq!(TaskDuration::new(1, 30).to_string(), "1h 30m");
    assert_eq!(TaskDuration::new(1, 30).total_minutes(), 90);
}
