//! Fire-and-forget webhook delivery.
//!
//! Used by four independent callers: operational log embeds, guild
//! join/leave audit embeds, starboard reposts, and bot-list server-count
//! documents. Delivery is best-effort by contract: every transport or HTTP
//! status failure is logged as a warning with the target's name and
//! otherwise ignored, so a dead webhook can never fail the flow that
//! triggered the notification.

use std::sync::OnceLock;

use {
    async_trait::async_trait,
    serde_json::{Value, json},
    tracing::{debug, warn},
};

use {
    sigil_common::Embed,
    sigil_config::WebhookTarget,
    sigil_skills::AuditSink,
};

/// The sender identity stamped onto webhook embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookIdentity {
    pub username: String,
    pub avatar_url: Option<String>,
}

impl Default for WebhookIdentity {
    fn default() -> Self {
        Self {
            username: "sigil".into(),
            avatar_url: None,
        }
    }
}

/// Discord-webhook-shaped body attributed to the bot identity.
pub fn embed_body(identity: &WebhookIdentity, embeds: &[Embed]) -> Value {
    let mut body = json!({
        "username": identity.username,
        "embeds": embeds,
    });
    if let Some(avatar) = &identity.avatar_url {
        body["avatar_url"] = json!(avatar);
    }
    body
}

/// Server-count document posted to bot-list directories.
pub fn server_count_body(server_count: usize, shard_id: u32, shard_count: u32) -> Value {
    json!({
        "server_count": server_count,
        "shard_id": shard_id,
        "shard_count": shard_count,
    })
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    identity: OnceLock<WebhookIdentity>,
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            identity: OnceLock::new(),
        }
    }

    /// Record the connected bot's identity; set once at ready.
    pub fn set_identity(&self, identity: WebhookIdentity) {
        let _ = self.identity.set(identity);
    }

    fn identity(&self) -> WebhookIdentity {
        self.identity.get().cloned().unwrap_or_default()
    }

    /// Post an embed to a Discord webhook, attributed to the bot.
    pub async fn send_embed(&self, target: &WebhookTarget, embed: Embed) {
        let body = embed_body(&self.identity(), std::slice::from_ref(&embed));
        self.post(&target.name, &target.url, None, &body).await;
    }

    /// Post a JSON document with an Authorization token (bot-list style).
    pub async fn send_json(&self, name: &str, url: &str, token: Option<&str>, body: &Value) {
        self.post(name, url, token, body).await;
    }

    async fn post(&self, name: &str, url: &str, token: Option<&str>, body: &Value) {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.header("Authorization", token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!(target = name, status = %response.status(), "webhook delivered");
            },
            Ok(response) => {
                warn!(
                    target = name,
                    status = %response.status(),
                    "webhook delivery failed"
                );
            },
            Err(e) => {
                warn!(target = name, "webhook unreachable: {e}");
            },
        }
    }
}

#[async_trait]
impl AuditSink for WebhookNotifier {
    async fn audit(&self, target: &WebhookTarget, embed: Embed) {
        self.send_embed(target, embed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, url: &str) -> WebhookTarget {
        WebhookTarget {
            name: name.into(),
            url: url.into(),
        }
    }

    #[test]
    fn embed_body_carries_identity_and_embeds() {
        let identity = WebhookIdentity {
            username: "sigil".into(),
            avatar_url: Some("https://cdn.example/avatar.png".into()),
        };
        let body = embed_body(&identity, &[Embed::new().title("Guild Joined")]);
        assert_eq!(body["username"], "sigil");
        assert_eq!(body["avatar_url"], "https://cdn.example/avatar.png");
        assert_eq!(body["embeds"][0]["title"], "Guild Joined");
    }

    #[test]
    fn embed_body_omits_missing_avatar() {
        let body = embed_body(&WebhookIdentity::default(), &[]);
        assert!(body.get("avatar_url").is_none());
    }

    #[test]
    fn server_count_body_shape() {
        let body = server_count_body(120, 0, 1);
        assert_eq!(
            body,
            json!({ "server_count": 120, "shard_id": 0, "shard_count": 1 })
        );
    }

    #[tokio::test]
    async fn successful_delivery_hits_the_webhook_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new();
        notifier
            .send_embed(
                &target("ops", &format!("{}/hook", server.url())),
                Embed::new().title("test"),
            )
            .await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_swallowed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new();
        // Must return normally: a failed log post never fails the caller.
        notifier
            .send_embed(
                &target("ops", &format!("{}/hook", server.url())),
                Embed::new().title("test"),
            )
            .await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_swallowed() {
        let notifier = WebhookNotifier::new();
        notifier
            .send_embed(
                &target("ops", "http://127.0.0.1:1/hook"),
                Embed::new().title("test"),
            )
            .await;
    }

    #[tokio::test]
    async fn authorization_header_is_sent_for_json_posts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/stats")
            .match_header("authorization", "list-token")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new();
        notifier
            .send_json(
                "discordbots",
                &format!("{}/api/stats", server.url()),
                Some("list-token"),
                &server_count_body(5, 0, 1),
            )
            .await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn one_rejecting_directory_does_not_stop_the_others() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/list-a")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/list-b")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;
        let third = server
            .mock("POST", "/list-c")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let notifier = WebhookNotifier::new();
        let body = server_count_body(77, 0, 1);
        for path in ["/list-a", "/list-b", "/list-c"] {
            notifier
                .send_json(path, &format!("{}{path}", server.url()), Some("t"), &body)
                .await;
        }

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn identity_is_set_once() {
        let notifier = WebhookNotifier::new();
        notifier.set_identity(WebhookIdentity {
            username: "first".into(),
            avatar_url: None,
        });
        notifier.set_identity(WebhookIdentity {
            username: "second".into(),
            avatar_url: None,
        });
        assert_eq!(notifier.identity().username, "first");
    }
}
