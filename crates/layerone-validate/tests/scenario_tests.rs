//! End-to-end checks of the validation pipeline

use http::StatusCode;
use layerone_core::{Request, Response, TestRequest};
use layerone_validate::prelude::*;
use layerone_validate::{ConfigError, Failure, FailurePayload, Stage};
use proptest::prelude::*;
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("layerone_validate=debug")
        .with_test_writer()
        .try_init();
}

fn post(body: Value) -> Request {
    TestRequest::post("/user").json(&body).build()
}

fn failure(validator: &Validator, req: &Request) -> Failure {
    match validator.check(req) {
        Outcome::Fail(failure) => failure,
        Outcome::Pass => panic!("expected {} to be rejected", req.path()),
    }
}

#[test]
fn scenario_a_valid_id_passes() {
    init_tracing();
    let validator = Validator::bind(vec![Rule::new("id")
        .of_type(predicates::is_number)
        .biz(predicates::is_positive_integer)])
    .unwrap();

    let mut continued = false;
    let mut response: Option<Response> = None;
    validator.handle(&post(json!({ "id": 3 })), &mut response, || continued = true);

    assert!(continued);
    assert!(response.is_none());
}

#[test]
fn scenario_b_extra_field_is_reported() {
    init_tracing();
    let validator = Validator::bind(vec![Rule::new("id").of_type(predicates::is_number)]).unwrap();

    let failure = failure(&validator, &post(json!({ "id": 3, "username": "vik" })));

    assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::to_value(&failure.payload).unwrap(),
        json!({
            "success": false,
            "message": "input-fields :: Miss match",
            "fail": "username",
            "fields": { "missing": [], "extra": ["username"] },
            "layer": "body"
        })
    );
}

#[test]
fn scenario_c_empty_sequence_fails_the_type_stage() {
    init_tracing();
    let validator = Validator::bind(vec![Rule::new("values")
        .of_type(predicates::is_object)
        .biz(predicates::is_coords_array)])
    .unwrap();

    let failure = failure(&validator, &post(json!({ "values": [] })));

    assert_eq!(failure.stage, Stage::Type);
    assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        failure.payload.message,
        "input-types :: Tip: Test the item, not the array."
    );
    assert_eq!(failure.payload.fail.as_deref(), Some("values"));
}

#[test]
fn scenario_d_bad_item_fails_the_business_stage() {
    init_tracing();
    let validator = Validator::bind(vec![Rule::new("values")
        .of_type(predicates::is_object)
        .biz(predicates::is_coords)])
    .unwrap();

    let body = json!({
        "values": [
            { "x": 1, "y": 2 },
            { "x": 1, "y": "a" },
            { "x": 2, "y": "b" },
            { "x": 3, "y": "c" }
        ]
    });
    let failure = failure(&validator, &post(body));

    assert_eq!(failure.stage, Stage::Business);
    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    let payload: FailurePayload = failure.payload;
    assert_eq!(payload.message, "biz");
    assert_eq!(payload.fail.as_deref(), Some("values"));
}

#[test]
fn scenario_e_sentinel_accepting_type_fails_at_bind_time() {
    init_tracing();
    let accepts_everything = |v: &Value| {
        matches!(
            v,
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Object(_)
        )
    };

    let err = Validator::bind(vec![Rule::new("values").of_type(accepts_everything)]).unwrap_err();

    assert_eq!(
        err,
        ConfigError::TypeAcceptsSentinels {
            prop: "values".into()
        }
    );
}

#[test]
fn optional_fields_are_checked_only_when_present() {
    init_tracing();
    let validator = Validator::bind(vec![
        Rule::new("id").of_type(predicates::is_number),
        Rule::new("nickname")
            .of_type(predicates::is_string)
            .biz(predicates::is_username)
            .optional(),
    ])
    .unwrap();

    assert!(validator.check(&post(json!({ "id": 1 }))).is_pass());
    assert!(validator.check(&post(json!({ "id": 1, "nickname": "vikcch" }))).is_pass());

    let failure = failure(&validator, &post(json!({ "id": 1, "nickname": "v1" })));
    assert_eq!(failure.stage, Stage::Business);
    assert_eq!(failure.payload.fail.as_deref(), Some("nickname"));
}

#[test]
fn query_sequences_use_item_semantics() {
    init_tracing();
    let validator = Validator::query(vec![Rule::new("id")
        .of_type(predicates::is_string)
        .biz(predicates::can_be_positive_integer)])
    .unwrap();

    let ok = TestRequest::get("/user?id=1&id=2").build();
    assert!(validator.check(&ok).is_pass());

    let bad = TestRequest::get("/user?id=1&id=zero").build();
    let failure = failure(&validator, &bad);
    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(failure.payload.layer, Some(Source::Query));
}

#[test]
fn faults_are_answered_without_details() {
    init_tracing();
    let validator = Validator::bind(Rule::new("id").biz(predicates::is_id)).unwrap();
    let req = TestRequest::post("/user")
        .content_type("text/plain")
        .body("id=3")
        .build();

    let failure = failure(&validator, &req);

    assert_eq!(failure.stage, Stage::Guard);
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        failure.payload.to_value(),
        json!({
            "success": false,
            "message": "If you own the server, check the logs",
            "layer": "body"
        })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // An absent optional field never fails any stage.
    #[test]
    fn prop_absent_optional_never_fails(id in 1u32..10_000) {
        let validator = Validator::bind(vec![
            Rule::new("id").of_type(predicates::is_number).biz(predicates::is_positive_integer),
            Rule::new("tags").of_type(predicates::is_string).biz(|_: &Value| false).optional(),
        ])
        .unwrap();

        let outcome = validator.check(&post(json!({ "id": id })));
        prop_assert!(outcome.is_pass());
    }

    // Present optional fields are checked like required ones.
    #[test]
    fn prop_present_optional_is_checked(tag in "[a-z]{1,8}") {
        let validator = Validator::bind(vec![
            Rule::new("tags").of_type(predicates::is_string).biz(|_: &Value| false).optional(),
        ])
        .unwrap();

        let outcome = validator.check(&post(json!({ "tags": tag })));
        prop_assert_eq!(outcome.failure().map(|f| f.stage), Some(Stage::Business));
    }
}
