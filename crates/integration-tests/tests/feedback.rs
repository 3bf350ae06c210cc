//! Feedback form delivery.

use std::sync::Arc;

use reqwest::StatusCode;

use bizdesk_integration_tests::{FailingNotifier, TestApp, location};
use bizdesk_server::services::{DisabledNotifier, FeedbackMessage};

const FORM: &[(&str, &str)] = &[
    ("name", "Jane Doe"),
    ("email", "jane@example.com"),
    ("feedback", "The low-stock page saved my week."),
];

#[tokio::test]
async fn test_feedback_form_is_public() {
    let app = TestApp::spawn().await;
    assert_eq!(app.get("/feedback").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_feedback_is_delivered() {
    let app = TestApp::spawn().await;

    let resp = app.post_form("/feedback", FORM).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/feedback");
    assert!(app.page("/feedback").await.contains("Thank you for your feedback!"));

    let sent = app.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    let message = sent.first().expect("one message");
    assert_eq!(message.name, "Jane Doe");
    assert_eq!(message.email.as_str(), "jane@example.com");
    assert_eq!(FeedbackMessage::SUBJECT, "User Feedback");

    let text = message.text_body().expect("text body");
    assert!(text.contains("Name: Jane Doe"));
    assert!(text.contains("Email: jane@example.com"));
    assert!(text.contains("Feedback: The low-stock page saved my week."));
}

#[tokio::test]
async fn test_feedback_invalid_email_is_not_sent() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/feedback",
            &[("name", "Jane"), ("email", "not-an-address"), ("feedback", "Hi")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_feedback_transport_failure_is_reported() {
    let app = TestApp::spawn_with_notifier(Arc::new(FailingNotifier)).await;

    let resp = app.post_form("/feedback", FORM).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/feedback");

    let body = app.page("/feedback").await;
    assert!(body.contains("Error sending feedback:"));
    assert!(body.contains("relay refused recipient"));
}

#[tokio::test]
async fn test_feedback_without_mail_config() {
    let app = TestApp::spawn_with_notifier(Arc::new(DisabledNotifier)).await;

    app.post_form("/feedback", FORM).await;
    assert!(
        app.page("/feedback")
            .await
            .contains("Error sending feedback: mail delivery is not configured")
    );
}
