//! Field validation on create and rename

mod common;

use cattree::application::services::CategoryService;
use cattree::application::ApplicationError;
use cattree::domain::{DomainError, FieldLimits, NewCategory};
use rstest::rstest;

#[rstest]
#[case::missing_name(NewCategory { code: Some("CODE".into()), ..Default::default() }, "name")]
#[case::missing_code(NewCategory { name: Some("이름".into()), ..Default::default() }, "code")]
#[case::blank_name(NewCategory::new("   ", "CODE"), "name")]
#[case::blank_code(NewCategory::new("이름", ""), "code")]
#[case::nothing(NewCategory::default(), "name")]
fn given_absent_field_when_creating_then_missing_field(
    #[case] request: NewCategory,
    #[case] field: &'static str,
) {
    let service = CategoryService::default();

    let err = service.create(request).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Domain(DomainError::MissingField(f)) if f == field),
        "{err}"
    );
    assert!(service.is_empty().unwrap());
}

#[rstest]
#[case::name_at_limit("가".repeat(50), "CODE".to_string(), None)]
#[case::name_over_limit("가".repeat(51), "CODE".to_string(), Some(("name", 50, 51)))]
#[case::code_at_limit("이름".to_string(), "C".repeat(20), None)]
#[case::code_over_limit("이름".to_string(), "C".repeat(21), Some(("code", 20, 21)))]
fn given_field_length_when_creating_then_limit_is_inclusive(
    #[case] name: String,
    #[case] code: String,
    #[case] expected: Option<(&'static str, usize, usize)>,
) {
    let service = CategoryService::default();

    let result = service.create(NewCategory::new(name, code));

    match expected {
        None => assert!(result.is_ok(), "{:?}", result),
        Some((field, max, actual)) => {
            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ApplicationError::Domain(DomainError::FieldTooLong { field: f, max: m, actual: a })
                    if f == field && m == max && a == actual
            ));
        }
    }
}

#[test]
fn given_custom_limits_when_creating_then_they_apply() {
    let service = CategoryService::new(FieldLimits {
        name_max: 3,
        code_max: 2,
    });

    assert!(service.create(NewCategory::new("컴퓨터", "PC")).is_ok());
    let err = service.create(NewCategory::new("데스크톱", "DT")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::FieldTooLong { field: "name", .. })
    ));
}

#[test]
fn given_overlong_name_when_renaming_then_rejected_and_subtree_untouched() {
    let (service, seed) = common::seeded_service();

    let err = service.rename(seed.it, &"가".repeat(51)).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::FieldTooLong { field: "name", .. })
    ));
    assert_eq!(
        service.get(seed.desktop).unwrap().path,
        "IT장비/컴퓨터/데스크톱"
    );
}

#[test]
fn given_surrounding_whitespace_when_creating_then_code_is_trimmed_before_uniqueness() {
    let service = CategoryService::default();
    service.create(NewCategory::new("가구", "FURNITURE")).unwrap();

    let err = service
        .create(NewCategory::new("가구2", " FURNITURE "))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateCode(ref c)) if c == "FURNITURE"
    ));
}
