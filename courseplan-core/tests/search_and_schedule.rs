use chrono::Weekday;
use courseplan_core::{
    CourseRecord, MeetingInterval, MeetingTime, ONLINE_ASYNC_MODE, ParsedQuery, Schedule,
    ScheduleError, ScheduledSelection, ScoredMatch, Section, Tier, classify, has_conflict,
    match_courses, search, search_courses,
};

fn meeting(day: &str, start: &str, end: &str) -> MeetingTime {
    MeetingTime {
        day: day.to_string(),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        building: "HLL".to_string(),
        room: "114".to_string(),
        mode: "LEC".to_string(),
        campus: "Busch".to_string(),
    }
}

fn section(index: &str, meetings: Vec<MeetingTime>) -> Section {
    Section {
        number: "01".to_string(),
        index: index.to_string(),
        instructors: vec!["SMITH, J".to_string()],
        status: "OPEN".to_string(),
        comments: String::new(),
        meeting_times: meetings,
    }
}

fn catalog() -> Vec<CourseRecord> {
    vec![
        CourseRecord::new("01:198:111", "INTRO COMPUTER SCI")
            .with_subject("198", "111")
            .with_subject_description("Computer Science")
            .with_description("Introduction to programming in Java.")
            .with_section(section(
                "09214",
                vec![
                    meeting("Monday", "10:20 AM", "11:40 AM"),
                    meeting("Wednesday", "10:20 AM", "11:40 AM"),
                ],
            )),
        CourseRecord::new("01:198:112", "DATA STRUCTURES")
            .with_subject("198", "112")
            .with_subject_description("Computer Science")
            .with_section(section("09301", vec![meeting("Tuesday", "2:00 PM", "3:20 PM")])),
        CourseRecord::new("01:640:151", "CALCULUS I MATH/PHYS")
            .with_subject("640", "151")
            .with_subject_description("Mathematics")
            .with_section(section("10100", vec![meeting("Monday", "11:00 AM", "12:20 PM")]))
            .with_section(section("10101", vec![meeting("Friday", "11:00 AM", "12:20 PM")])),
        CourseRecord::new("01:640:1510", "CALCULUS LAB")
            .with_subject("640", "1510")
            .with_subject_description("Mathematics"),
        CourseRecord::new("01:750:111", "PHYSICS FOR SCIENCES")
            .with_subject("750", "111")
            .with_subject_description("Physics")
            .with_section(section(
                "20000",
                vec![MeetingTime {
                    mode: ONLINE_ASYNC_MODE.to_string(),
                    campus: "Online".to_string(),
                    ..MeetingTime::default()
                }],
            )),
    ]
}

#[test]
fn classification_precedence() {
    assert!(matches!(classify("01:198:111"), ParsedQuery::Code { .. }));
    assert_eq!(
        classify("CS 111"),
        ParsedQuery::SubjectNumber {
            subject: "198".to_string(),
            number: "111".to_string()
        }
    );
    assert!(matches!(classify("111"), ParsedQuery::Number { .. }));
    assert!(matches!(
        classify("intro to programming"),
        ParsedQuery::General { .. }
    ));
}

#[test]
fn subject_number_lookup_returns_only_the_exact_course() {
    let courses = catalog();
    let out = search(&courses, "MATH 151");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].course.course_string, "01:640:151");
    assert_eq!(out[0].tier, Tier::Exact);
}

#[test]
fn bare_number_matches_every_department() {
    let courses = catalog();
    let out = search_courses(&courses, "111");
    let ids: Vec<&str> = out.iter().map(|c| c.course_string.as_str()).collect();
    assert_eq!(ids, vec!["01:198:111", "01:750:111"]);
}

#[test]
fn general_text_ranks_by_score() {
    let courses = catalog();
    let out = search(&courses, "computer science");
    assert!(out.len() >= 2);
    assert!(out.iter().all(|m| m.tier == Tier::Fuzzy));
    assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(out[0].course.course_string, "01:198:111");
}

fn score_of(v: &[ScoredMatch<'_>], id: &str) -> u32 {
    v.iter()
        .find(|m| m.course.course_string == id)
        .map(|m| m.score)
        .unwrap_or(0)
}

#[test]
fn fuzzy_extra_matching_token_never_lowers_score() {
    let courses = catalog();
    let base = search(&courses, "calculus");
    let more = search(&courses, "calculus lab");
    assert!(score_of(&more, "01:640:1510") > score_of(&base, "01:640:1510"));
    assert_eq!(score_of(&more, "01:640:151"), score_of(&base, "01:640:151"));
}

#[test]
fn duplicates_never_returned_twice() {
    let mut courses = catalog();
    courses.extend(catalog());
    for q in ["CS 111", "111", "calculus", "01:198:112", "science"] {
        let out = search_courses(&courses, q);
        let mut ids: Vec<&str> = out.iter().map(|c| c.course_string.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(before, ids.len(), "duplicate result for {q}");
    }
}

#[test]
fn matching_is_deterministic() {
    let courses = catalog();
    let q = classify("science");
    assert_eq!(match_courses(&courses, &q), match_courses(&courses, &q));
}

#[test]
fn building_a_schedule_checks_conflicts() {
    let courses = catalog();
    let mut schedule = Schedule::new();

    let intro = search_courses(&courses, "CS 111")[0];
    schedule
        .add(ScheduledSelection::from_course(intro, "09214").unwrap())
        .unwrap();

    let calc = search_courses(&courses, "01:640:151")[0];
    let monday = ScheduledSelection::from_course(calc, "10100").unwrap();
    let friday = ScheduledSelection::from_course(calc, "10101").unwrap();

    assert!(matches!(
        schedule.add(monday),
        Err(ScheduleError::Conflict { .. })
    ));
    schedule.add(friday).unwrap();

    let physics = search_courses(&courses, "PHYS 111")[0];
    schedule
        .add(ScheduledSelection::from_course(physics, "20000").unwrap())
        .unwrap();

    assert_eq!(schedule.selections.len(), 3);
}

#[test]
fn conflict_detector_over_raw_intervals() {
    let candidate = vec![MeetingInterval::new(Weekday::Mon, "10:00 AM", "11:20 AM", "LEC")];
    let scheduled = [
        vec![MeetingInterval::new(Weekday::Tue, "10:00 AM", "11:20 AM", "LEC")],
        vec![MeetingInterval::new(Weekday::Mon, "11:20 AM", "12:40 PM", "LEC")],
    ];
    assert!(!has_conflict(&candidate, scheduled.iter().map(Vec::as_slice)));

    let overlapping = vec![MeetingInterval::new(Weekday::Mon, "11:00 AM", "12:00 PM", "LEC")];
    assert!(has_conflict(&candidate, [overlapping.as_slice()]));
}
