#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::filter::*;
use super::tests::make_record;
use super::*;

fn dated(position: &str, timestamp: &str) -> ApplicationRecord {
    ApplicationRecord {
        timestamp: Some(timestamp.to_owned()),
        ..make_record(position, "Acme", None, true)
    }
}

/// Five records covering every filter dimension.
fn fixture() -> Vec<ApplicationRecord> {
    vec![
        ApplicationRecord {
            application_type: Some("easy_apply".to_owned()),
            timestamp: Some("2024-03-10T12:00:00.000Z".to_owned()),
            ..make_record("Senior Software Engineer", "Acme", Some("linkedin"), true)
        },
        ApplicationRecord {
            application_type: Some("external".to_owned()),
            timestamp: Some("2024-03-09T08:00:00.000Z".to_owned()),
            ..make_record("Data Analyst", "Engineering Partners", Some("indeed"), true)
        },
        ApplicationRecord {
            application_type: Some("easy_apply".to_owned()),
            timestamp: Some("2024-03-08T23:59:59.000Z".to_owned()),
            ..make_record("Platform ENGINEER", "Globex", Some("linkedin"), false)
        },
        ApplicationRecord {
            timestamp: Some("2024-03-01T00:00:00.000Z".to_owned()),
            description: Some("We need an engineer who loves Rust".to_owned()),
            ..make_record("Developer", "Initech", None, true)
        },
        ApplicationRecord {
            application_type: Some("external".to_owned()),
            timestamp: Some("2024-02-20T10:00:00.000Z".to_owned()),
            ..make_record("Designer", "Umbrella", Some("glassdoor"), false)
        },
    ]
}

fn positions(records: &[ApplicationRecord]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r.position.as_deref())
        .collect()
}

#[test]
fn empty_criteria_returns_input_unchanged() {
    let records = fixture();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_empty());
    assert_eq!(apply(&records, &criteria), records);
}

#[test]
fn empty_criteria_on_empty_input() {
    assert!(apply(&[], &FilterCriteria::default()).is_empty());
}

#[test]
fn empty_search_text_is_inactive() {
    let criteria = FilterCriteria {
        search_text: Some(String::new()),
        ..FilterCriteria::default()
    };
    assert!(criteria.is_empty());
    assert_eq!(apply(&fixture(), &criteria).len(), 5);
}

#[test]
fn search_text_matches_position_company_and_description() {
    let criteria = FilterCriteria {
        search_text: Some("Engineer".to_owned()),
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec![
            "Senior Software Engineer",
            "Data Analyst",
            "Platform ENGINEER",
            "Developer"
        ]
    );
}

#[test]
fn search_text_and_success_status_combine() {
    let criteria = FilterCriteria {
        search_text: Some("engineer".to_owned()),
        status: StatusFilter::Success,
        ..FilterCriteria::default()
    };
    let result = apply(&fixture(), &criteria);
    assert!(result.iter().all(|r| r.success));
    assert!(result.iter().all(|r| {
        [&r.position, &r.company, &r.description]
            .into_iter()
            .flatten()
            .any(|f| f.to_lowercase().contains("engineer"))
    }));
    assert_eq!(
        positions(&result),
        vec!["Senior Software Engineer", "Data Analyst", "Developer"]
    );
}

#[test]
fn failed_status_selects_unsuccessful_records() {
    let criteria = FilterCriteria {
        status: StatusFilter::Failed,
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec!["Platform ENGINEER", "Designer"]
    );
}

#[test]
fn type_filter_is_exact_match() {
    let criteria = FilterCriteria {
        application_type: TypeFilter::EasyApply,
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec!["Senior Software Engineer", "Platform ENGINEER"]
    );

    let criteria = FilterCriteria {
        application_type: TypeFilter::External,
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec!["Data Analyst", "Designer"]
    );
}

#[test]
fn platform_filter_is_exact_match_and_skips_absent() {
    let criteria = FilterCriteria {
        platform: PlatformFilter::Only("linkedin".to_owned()),
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec!["Senior Software Engineer", "Platform ENGINEER"]
    );

    let criteria = FilterCriteria {
        platform: PlatformFilter::Only("external".to_owned()),
        ..FilterCriteria::default()
    };
    assert!(apply(&fixture(), &criteria).is_empty());
}

#[test]
fn start_date_is_inclusive() {
    let records = vec![
        dated("before", "2024-03-07T23:59:59.999Z"),
        dated("midnight", "2024-03-08T00:00:00.000Z"),
        dated("after", "2024-03-09T10:00:00.000Z"),
    ];
    let criteria = FilterCriteria {
        date_range: DateRange {
            start: Some(parse_day("2024-03-08").unwrap()),
            end: None,
        },
        ..FilterCriteria::default()
    };
    assert_eq!(positions(&apply(&records, &criteria)), vec!["midnight", "after"]);
}

#[test]
fn end_date_includes_the_whole_day() {
    let records = vec![
        dated("start of day", "2024-03-08T00:00:00.000Z"),
        dated("end of day", "2024-03-08T23:59:59.999Z"),
        dated("next day", "2024-03-09T00:00:00.000Z"),
    ];
    let criteria = FilterCriteria {
        date_range: DateRange {
            start: None,
            end: Some(parse_day("2024-03-08").unwrap()),
        },
        ..FilterCriteria::default()
    };
    assert_eq!(
        positions(&apply(&records, &criteria)),
        vec!["start of day", "end of day"]
    );
}

#[test]
fn date_constraint_rejects_missing_or_bad_timestamps() {
    let records = vec![
        make_record("no timestamp", "Acme", None, true),
        dated("bad timestamp", "not a date"),
        dated("good", "2024-03-08T12:00:00.000Z"),
    ];
    let criteria = FilterCriteria {
        date_range: DateRange {
            start: Some(parse_day("2024-01-01").unwrap()),
            end: None,
        },
        ..FilterCriteria::default()
    };
    assert_eq!(positions(&apply(&records, &criteria)), vec!["good"]);
}

#[test]
fn inverted_date_range_yields_empty_result() {
    let range = DateRange {
        start: Some(parse_day("2024-03-10").unwrap()),
        end: Some(parse_day("2024-03-01").unwrap()),
    };
    assert!(range.is_inverted());
    let criteria = FilterCriteria {
        date_range: range,
        ..FilterCriteria::default()
    };
    assert!(apply(&fixture(), &criteria).is_empty());
}

#[test]
fn all_dimensions_combine_with_and() {
    let criteria = FilterCriteria {
        search_text: Some("engineer".to_owned()),
        status: StatusFilter::Success,
        application_type: TypeFilter::EasyApply,
        platform: PlatformFilter::Only("linkedin".to_owned()),
        date_range: DateRange {
            start: Some(parse_day("2024-03-10").unwrap()),
            end: Some(parse_day("2024-03-10").unwrap()),
        },
    };
    assert!(!criteria.is_empty());
    assert_eq!(
        positions(&apply(&fixture(), &criteria)),
        vec!["Senior Software Engineer"]
    );
}

#[test]
fn matches_agrees_with_apply() {
    let records = fixture();
    let criteria = FilterCriteria {
        search_text: Some("ENGINEER".to_owned()),
        status: StatusFilter::Failed,
        ..FilterCriteria::default()
    };
    let by_matches: Vec<_> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();
    assert_eq!(by_matches, apply(&records, &criteria));
}

// --- parsing ---

#[test]
fn parse_filter_values() {
    assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    assert_eq!("SUCCESS".parse::<StatusFilter>().unwrap(), StatusFilter::Success);
    assert_eq!("failed".parse::<StatusFilter>().unwrap(), StatusFilter::Failed);
    assert!("maybe".parse::<StatusFilter>().is_err());

    assert_eq!("easy_apply".parse::<TypeFilter>().unwrap(), TypeFilter::EasyApply);
    assert_eq!("external".parse::<TypeFilter>().unwrap(), TypeFilter::External);
    assert!("fax".parse::<TypeFilter>().is_err());

    assert_eq!("all".parse::<PlatformFilter>().unwrap(), PlatformFilter::All);
    assert_eq!(
        "LinkedIn".parse::<PlatformFilter>().unwrap(),
        PlatformFilter::Only("linkedin".to_owned())
    );
    assert!(" ".parse::<PlatformFilter>().is_err());
}

#[test]
fn parse_day_rejects_garbage() {
    assert!(parse_day("2024-02-30").is_err());
    assert!(parse_day("03/08/2024").is_err());
    assert_eq!(
        parse_day(" 2024-03-08 ").unwrap().to_string(),
        "2024-03-08"
    );
}
