use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde_json::json,
    tracing::debug,
};

use {crate::intent::IntentResult, sigil_config::NluConfig};

/// Errors from the NLU collaborator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("nlu request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("nlu responded with status {0}")]
    Status(u16),

    #[error("nlu response missing field: {0}")]
    MissingField(&'static str),
}

/// Classifies free-form chat text into an intent with parameters.
///
/// The trait seam keeps the gateway handler drivable without the real
/// service.
#[async_trait]
pub trait NluClient: Send + Sync {
    /// Classify `text` within the given conversation session.
    async fn classify(&self, session_id: &str, text: &str) -> Result<IntentResult, Error>;
}

/// Detect-intent REST client.
///
/// POSTs `{queryInput: {text: {text, languageCode}}}` to
/// `<endpoint>/sessions/<session>:detectIntent` with bearer auth.
pub struct HttpNluClient {
    client: reqwest::Client,
    endpoint: String,
    token: Secret<String>,
    language: String,
}

impl HttpNluClient {
    pub fn new(config: &NluConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &NluConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            language: config.language.clone(),
        }
    }

    fn session_url(&self, session_id: &str) -> String {
        format!("{}/sessions/{session_id}:detectIntent", self.endpoint)
    }
}

#[async_trait]
impl NluClient for HttpNluClient {
    async fn classify(&self, session_id: &str, text: &str) -> Result<IntentResult, Error> {
        let body = json!({
            "queryInput": {
                "text": { "text": text, "languageCode": self.language }
            }
        });

        let response = self
            .client
            .post(self.session_url(session_id))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let payload: serde_json::Value = response.json().await?;
        let result = IntentResult::from_detect_intent(&payload)?;
        debug!(
            session_id,
            intent = %result.intent,
            confidence = result.confidence,
            "nlu classified message"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> NluConfig {
        NluConfig {
            endpoint: endpoint.into(),
            token: Secret::new("nlu-token".into()),
            language: "en".into(),
        }
    }

    #[test]
    fn session_url_shape() {
        let client = HttpNluClient::new(&config("https://nlu.example/v2/"));
        assert_eq!(
            client.session_url("400347514466992128"),
            "https://nlu.example/v2/sessions/400347514466992128:detectIntent"
        );
    }

    #[tokio::test]
    async fn classify_parses_successful_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sessions/42:detectIntent")
            .match_header("authorization", "Bearer nlu-token")
            .with_status(200)
            .with_body(
                r#"{"queryResult": {
                    "intent": {"displayName": "skill.rank"},
                    "parameters": {"memberProperty": "join"},
                    "intentDetectionConfidence": 0.92
                }}"#,
            )
            .create_async()
            .await;

        let client = HttpNluClient::new(&config(&server.url()));
        let result = client
            .classify("42", "who joined first?")
            .await
            .unwrap_or_else(|e| panic!("classify failed: {e}"));
        assert_eq!(result.intent, "skill.rank");
        assert_eq!(result.string_param("memberProperty"), Some("join"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn classify_surfaces_http_status_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/sessions/42:detectIntent")
            .with_status(503)
            .create_async()
            .await;

        let client = HttpNluClient::new(&config(&server.url()));
        let result = client.classify("42", "hello").await;
        assert!(matches!(result, Err(Error::Status(503))));
    }

    #[tokio::test]
    async fn classify_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/sessions/42:detectIntent")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = HttpNluClient::new(&config(&server.url()));
        let result = client.classify("42", "hello").await;
        assert!(matches!(result, Err(Error::MissingField(_))));
    }
}
