use bus2go::{
    favourites::countdown,
    shared::{DayCode, Duration, Time},
};

#[test]
fn display_parses_back() {
    let time = Time::new(8, 5, 3);
    let parsed: Time = time.to_string().parse().unwrap();
    assert_eq!(
        (parsed.hour(), parsed.minute(), parsed.second()),
        (8, 5, 3)
    );
}

#[test]
fn hours_past_midnight_are_kept() {
    let time: Time = "26:15:00".parse().unwrap();
    assert_eq!(time.hour(), 26);
    assert!(time > Time::new(23, 59, 59));
}

#[test]
fn invalid_times_are_rejected() {
    for input in ["", "08:00", "08:00:00:00", "aa:00:00", "08:60:00", "08:00:-1"] {
        assert!(input.parse::<Time>().is_err(), "{input:?} should not parse");
    }
}

#[test]
fn remaining_is_zero_at_target() {
    let time = Time::new(12, 0, 0);
    assert_eq!(time.time_remaining(time), Some(Duration::ZERO));
}

#[test]
fn remaining_is_none_once_passed() {
    let time = Time::new(12, 0, 0);
    assert_eq!(time.time_remaining(Time::new(12, 0, 1)), None);
}

#[test]
fn remaining_until_later_time() {
    let remaining = Time::new(9, 0, 0).time_remaining(Time::new(7, 45, 30));
    assert_eq!(remaining, Some(Duration::from_seconds(4470)));
    let remaining = remaining.unwrap();
    assert_eq!((remaining.hours(), remaining.minutes()), (1, 14));
}

#[test]
fn countdown_text() {
    assert_eq!(countdown(Duration::ZERO), "In 0 min");
    assert_eq!(countdown(Duration::from_minutes(5)), "In 5 min");
    assert_eq!(
        countdown(Duration::from_hours(1) + Duration::from_minutes(20)),
        "In 1 h, 20 min"
    );
}

#[test]
fn day_codes_follow_week() {
    let codes: String = DayCode::ALL.iter().map(|day| day.code()).collect();
    assert_eq!(codes, "dmtwyfs");
    assert_eq!("y".parse::<DayCode>().unwrap(), DayCode::Thursday);
    assert!("x".parse::<DayCode>().is_err());
}
