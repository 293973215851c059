// tests/notify_telegram.rs
use update_sentinel::notify::telegram::TelegramNotifier;
use update_sentinel::notify::{Notify, OutgoingMessage};

const TOKEN: &str = "1234:TEST";

fn notifier(base: &str, recipients: &[&str]) -> TelegramNotifier {
    TelegramNotifier::new(
        Some(TOKEN.to_string()),
        recipients.iter().map(|s| s.to_string()).collect(),
        reqwest::Client::new(),
    )
    .with_api_base(base.to_string())
}

#[tokio::test]
async fn failing_send_retries_exactly_once_in_plain_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bot1234:TEST/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok":false,"description":"can't parse entities"}"#)
        .expect(2)
        .create_async()
        .await;

    let n = notifier(&server.url(), &["42"]);
    let ok = n.send(&OutgoingMessage::markdown("*broken _markdown")).await;

    assert!(!ok, "both attempts failed, send must report false");
    mock.assert_async().await; // markdown attempt + one plain retry, no more
}

#[tokio::test]
async fn plain_message_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bot1234:TEST/sendMessage")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let n = notifier(&server.url(), &["42"]);
    let mut msg = OutgoingMessage::markdown("plain text");
    msg.markdown = false;
    assert!(!n.send(&msg).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn successful_send_posts_once_per_recipient() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/bot1234:TEST/sendMessage")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect(2)
        .create_async()
        .await;

    let n = notifier(&server.url(), &["42", "43"]);
    assert!(n.send(&OutgoingMessage::markdown("hello")).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn one_bad_recipient_does_not_block_the_rest() {
    let mut server = mockito::Server::new_async().await;
    // All requests fail; what matters is that every recipient is attempted.
    let mock = server
        .mock("POST", "/bot1234:TEST/sendMessage")
        .with_status(502)
        .expect(4) // 2 recipients x (markdown + plain retry)
        .create_async()
        .await;

    let n = notifier(&server.url(), &["42", "43"]);
    assert!(!n.send(&OutgoingMessage::markdown("hello")).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_recipient_list_is_a_vacuous_success() {
    // No server: with nobody to deliver to, no request may be issued.
    let n = TelegramNotifier::new(Some(TOKEN.to_string()), vec![], reqwest::Client::new())
        .with_api_base("http://127.0.0.1:9");
    assert!(n.send(&OutgoingMessage::markdown("hello")).await);
}

#[tokio::test]
async fn disabled_notifier_returns_false_without_requests() {
    let n = TelegramNotifier::new(None, vec!["42".to_string()], reqwest::Client::new());
    assert!(!n.send(&OutgoingMessage::markdown("dry run")).await);
}
