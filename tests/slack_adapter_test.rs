//! Slack adapter tests against a mock Web API
//! Run with: cargo test --test slack_adapter_test

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use nimbus_bot::application::errors::{BotError, PluginErrorKind};
use nimbus_bot::application::services::BotService;
use nimbus_bot::domain::entities::{Event, Response};
use nimbus_bot::domain::traits::Bot;
use nimbus_bot::infrastructure::adapters::slack::SlackAdapter;
use nimbus_bot::plugins::{PluginConfig, PluginManager};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter(server: &MockServer) -> SlackAdapter {
    SlackAdapter::new("xoxb-test").with_api_base(server.uri())
}

#[tokio::test]
async fn open_direct_message_returns_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations.open"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_partial_json(serde_json::json!({ "users": "U1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "channel": { "id": "D024BE91L" }
        })))
        .mount(&server)
        .await;

    let reply = adapter(&server).open_direct_message("U1").await.unwrap();
    assert_eq!(reply.channel_id(), Some("D024BE91L"));
}

#[tokio::test]
async fn open_direct_message_reports_platform_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations.open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "cannot_dm_bot"
        })))
        .mount(&server)
        .await;

    let reply = adapter(&server).open_direct_message("U1").await.unwrap();
    assert!(!reply.ok);
    assert_eq!(reply.channel_id(), None);
    assert_eq!(reply.error.as_deref(), Some("cannot_dm_bot"));
}

#[tokio::test]
async fn user_info_parses_privileges() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users.info"))
        .and(query_param("user", "U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "user": { "id": "U1", "name": "ada", "is_admin": false, "is_owner": true }
        })))
        .mount(&server)
        .await;

    let reply = adapter(&server).user_info("U1").await.unwrap();
    let user = reply.profile().unwrap();
    assert_eq!(user.display_name(), "ada");
    assert!(user.is_privileged());
}

#[tokio::test]
async fn http_errors_surface_as_network_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users.info"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = adapter(&server).user_info("U1").await.unwrap_err();
    assert!(matches!(err, BotError::Network(_)), "{err}");
}

#[tokio::test]
async fn post_message_sends_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(body_partial_json(serde_json::json!({
            "channel": "C1",
            "text": "hello",
            "mrkdwn_in": ["text"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = Response::to("C1").with_text("hello").with_markdown();
    adapter(&server).post_message(&response).await.unwrap();
}

#[tokio::test]
async fn post_message_fails_when_slack_says_not_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "channel_not_found"
        })))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .post_message(&Response::to("C404").with_text("hi"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("channel_not_found"), "{err}");
}

#[tokio::test]
async fn poll_channel_returns_new_messages_oldest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .and(query_param("channel", "C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": [
                { "type": "message", "user": "U2", "text": "!coin", "ts": "1700000003.000000" },
                { "type": "message", "user": "U1", "text": "hello", "ts": "1700000002.000000" },
                { "type": "message", "subtype": "bot_message", "text": "beep", "ts": "1700000001.000000" }
            ]
        })))
        .mount(&server)
        .await;

    let events = adapter(&server).poll_channel("C1", "1600000000.000000").await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].subtype.as_deref(), Some("bot_message"));
    assert_eq!(events[1].text, "hello");
    assert_eq!(events[2].user, "U2");
    assert!(events.iter().all(|e| e.channel == "C1"));

    let events = adapter(&server)
        .poll_channel("C1", "1700000002.000000")
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text, "!coin");
}

#[tokio::test]
async fn poll_channel_follows_pagination_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .and(query_param("cursor", "bmV4dF90czoxNzAw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": [
                { "type": "message", "user": "U1", "text": "first", "ts": "1700000001.000000" }
            ],
            "has_more": false
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": [
                { "type": "message", "user": "U3", "text": "third", "ts": "1700000003.000000" },
                { "type": "message", "user": "U2", "text": "second", "ts": "1700000002.000000" }
            ],
            "has_more": true,
            "response_metadata": { "next_cursor": "bmV4dF90czoxNzAw" }
        })))
        .with_priority(2)
        .mount(&server)
        .await;

    let events = adapter(&server).poll_channel("C1", "1600000000.000000").await.unwrap();
    let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn failed_first_poll_does_not_replay_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .and(query_param("oldest", "1600000000.000100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": [
                { "type": "message", "user": "U2", "text": "!coin 3", "ts": "1600000001.000000" },
                { "type": "message", "user": "U1", "text": "!coin 5", "ts": "1600000000.000100" }
            ]
        })))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": [
                { "type": "message", "user": "U1", "text": "!coin 5", "ts": "1600000000.000100" }
            ]
        })))
        .with_priority(3)
        .mount(&server)
        .await;

    let bot = adapter(&server).with_channels(vec!["C1".to_string()], Duration::from_secs(1));
    let mut positions = HashMap::new();

    // Slack is down, then the channel gets anchored at its newest message
    assert!(bot.poll_once(&mut positions).await.is_empty());
    assert!(positions.is_empty());
    assert!(bot.poll_once(&mut positions).await.is_empty());
    assert_eq!(positions.get("C1").map(String::as_str), Some("1600000000.000100"));

    let events = bot.poll_once(&mut positions).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].text, "!coin 3");
    assert_eq!(positions.get("C1").map(String::as_str), Some("1600000001.000000"));
}

#[tokio::test]
async fn empty_channel_is_anchored_without_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations.history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "messages": []
        })))
        .mount(&server)
        .await;

    let bot = adapter(&server).with_channels(vec!["C1".to_string()], Duration::from_secs(1));
    let mut positions = HashMap::new();

    assert!(bot.poll_once(&mut positions).await.is_empty());
    assert!(positions.contains_key("C1"));
    assert!(bot.poll_once(&mut positions).await.is_empty());
}

#[tokio::test]
async fn fetch_bot_info_reads_auth_test() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "user_id": "UBOT",
            "user": "nimbus"
        })))
        .mount(&server)
        .await;

    let mut bot = adapter(&server);
    bot.fetch_bot_info().await.unwrap();
    assert_eq!(bot.bot_info().id, "UBOT");
}

#[tokio::test]
async fn bad_token_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "invalid_auth"
        })))
        .mount(&server)
        .await;

    let err = adapter(&server).fetch_bot_info().await.unwrap_err();
    assert!(matches!(err, BotError::Auth(_)));
}

#[tokio::test]
async fn command_reply_is_posted_through_slack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;

    let mut plugins = PluginManager::new("!", PluginConfig::default());
    plugins.register_builtin().unwrap();
    let service = BotService::new(Arc::new(adapter(&server)), plugins);

    let posted = service.handle_event(&Event::message("U1", "C1", "!coin 3")).await;
    assert_eq!(posted, 1);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["channel"], "C1");
    assert!(body["text"].as_str().unwrap().starts_with("*_3_* coins are flipped"));
}

#[tokio::test]
async fn failed_lookup_over_http_denies_admin_command() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users.info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "error": "user_not_found"
        })))
        .mount(&server)
        .await;

    let mut dispatcher = nimbus_bot::application::messaging::CommandDispatcher::new("!");
    dispatcher
        .register(Arc::new(common_admin::Purge::new()))
        .unwrap();

    let err = dispatcher
        .dispatch(&Event::message("U1", "C1", "!purge"), &adapter(&server))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), PluginErrorKind::Lookup);
}

mod common_admin {
    use nimbus_bot::application::errors::PluginResult;
    use nimbus_bot::domain::entities::{CommandDescriptor, Invocation, Response};
    use nimbus_bot::plugins::CommandPlugin;

    /// Admin-only command used to exercise permission lookups
    pub struct Purge {
        desc: CommandDescriptor,
    }

    impl Purge {
        pub fn new() -> Self {
            Self {
                desc: CommandDescriptor::new("purge").with_trigger("purge").admin_only(),
            }
        }
    }

    impl CommandPlugin for Purge {
        fn descriptor(&self) -> &CommandDescriptor {
            &self.desc
        }

        fn on_command(&self, _invocation: &Invocation, response: Response) -> PluginResult<Option<Response>> {
            Ok(Some(response.with_text("purged")))
        }
    }
}
