mod common;

use std::sync::Arc;

use common::RecordingChannel;
use math_game_client::models::{ResultStatus, UserAnswer};
use math_game_client::services::{ReconcilePolicy, SUBMIT_ANSWER};
use math_game_client::workflow::{EventRouter, GameSession, RouteOutcome};
use math_game_client::{ChannelMessage, Config, GameError};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn setup(policy: ReconcilePolicy) -> (GameSession, EventRouter, Arc<RecordingChannel>) {
    let config = Config {
        reconcile_policy: policy,
        ..Config::default()
    };
    let channel = Arc::new(RecordingChannel::default());
    let session = GameSession::new(&config, channel.clone());
    (session, EventRouter::new(), channel)
}

fn new_question(expression: &str, correct_answer: f64) -> ChannelMessage {
    ChannelMessage::new(
        "NewQuestion",
        vec![json!({ "expression": expression, "correctAnswer": correct_answer })],
    )
}

fn receive_result(is_correct: bool, user_answer: &str) -> ChannelMessage {
    ChannelMessage::new(
        "ReceiveResult",
        vec![json!({ "isCorrect": is_correct, "userAnswer": user_answer })],
    )
}

#[tokio::test]
async fn scenario_a_yes_on_true_equation() {
    let (mut session, router, channel) = setup(ReconcilePolicy::Latest);

    router.route(&mut session, &new_question("3+4=7", 7.0));
    assert_eq!(session.entries().len(), 1);
    assert!(session.entries()[0].is_correct.is_none());

    assert_ok!(session.on_user_decision(true).await);

    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, SUBMIT_ANSWER);
    assert_eq!(
        calls[0].1,
        vec![json!("Player"), json!(7.0), json!(7.0), json!(true), json!(true)]
    );
    assert_eq!(session.entries()[0].user_answer, Some(UserAnswer::Yes));
}

#[tokio::test]
async fn scenario_b_confirmation_renders_ok() {
    let (mut session, router, _) = setup(ReconcilePolicy::Latest);
    router.route(&mut session, &new_question("3+4=7", 7.0));
    assert_ok!(session.on_user_decision(true).await);

    let outcome = router.route(&mut session, &receive_result(true, "Yes"));

    assert!(matches!(outcome, RouteOutcome::Applied(_)));
    let entry = session.ledger().latest().unwrap();
    assert_eq!(entry.is_correct, Some(true));
    assert_eq!(entry.status(), ResultStatus::Ok);
    assert_eq!(entry.status().to_string(), "OK");
}

#[tokio::test]
async fn scenario_c_no_on_false_equation() {
    let (mut session, router, channel) = setup(ReconcilePolicy::Correlated);
    router.route(&mut session, &new_question("5*2=9", 10.0));

    assert_ok!(session.on_user_decision(false).await);

    let args = &channel.calls()[0].1;
    assert_eq!(args[1], json!(10.0));
    assert_eq!(args[2], json!(9.0));
    assert_eq!(args[3], json!(false));
    assert_eq!(args[4], json!(false));
    // 关联模式下附带 requestId
    let request_id = args[5].as_str().unwrap().to_string();

    let confirmation = ChannelMessage::new(
        "ReceiveResult",
        vec![json!({ "isCorrect": false, "userAnswer": "No", "requestId": request_id })],
    );
    router.route(&mut session, &confirmation);

    let entry = session.ledger().latest().unwrap();
    assert_eq!(entry.is_correct, Some(false));
    assert_eq!(entry.status(), ResultStatus::Ok);
}

#[tokio::test]
async fn scenario_d_missing_equals_sign() {
    let (mut session, router, channel) = setup(ReconcilePolicy::Correlated);
    router.route(&mut session, &new_question("3+4 7", 7.0));

    let err = assert_err!(session.on_user_decision(true).await);

    assert!(matches!(err, GameError::MalformedExpression { .. }));
    assert!(channel.calls().is_empty());
    assert!(session.entries()[0].user_answer.is_none());
}

#[tokio::test]
async fn ledger_only_grows() {
    let (mut session, router, _) = setup(ReconcilePolicy::Correlated);

    let mut previous = 0;
    for i in 0..5 {
        router.route(&mut session, &new_question(&format!("{i}+1={}", i + 1), (i + 1) as f64));
        assert_eq!(session.entries().len(), previous + 1);
        previous = session.entries().len();

        assert_ok!(session.on_user_decision(i % 2 == 0).await);
        router.route(&mut session, &receive_result(true, "Yes"));
        router.route(&mut session, &ChannelMessage::new("ReceiveResult", vec![]));
        assert_eq!(session.entries().len(), previous);
    }
}

#[test]
fn result_before_any_question_is_noop() {
    let (mut session, router, _) = setup(ReconcilePolicy::Latest);
    let outcome = router.route(&mut session, &receive_result(true, "Yes"));
    assert!(matches!(outcome, RouteOutcome::Applied(_)));
    assert!(session.ledger().is_empty());
}

#[tokio::test]
async fn new_question_clears_current_decision() {
    let (mut session, router, _) = setup(ReconcilePolicy::Correlated);
    router.route(&mut session, &new_question("3+4=7", 7.0));
    assert_ok!(session.on_user_decision(true).await);
    assert_eq!(session.current_decision(), Some(UserAnswer::Yes));

    router.route(&mut session, &new_question("2+2=5", 4.0));
    assert!(session.current_decision().is_none());
    assert!(session.awaiting_decision());
}

#[tokio::test]
async fn confirmation_without_id_skips_newer_unanswered_question() {
    let (mut session, router, _) = setup(ReconcilePolicy::Correlated);
    router.route(&mut session, &new_question("3+4=7", 7.0));
    assert_ok!(session.on_user_decision(true).await);
    router.route(&mut session, &new_question("2+2=5", 4.0));

    router.route(&mut session, &receive_result(true, "Yes"));

    let entries = session.entries();
    assert_eq!(entries[0].status(), ResultStatus::Ok);
    assert!(entries[1].user_answer.is_none());
    assert_eq!(entries[1].status(), ResultStatus::Waiting);
    assert!(session.awaiting_decision());
}
