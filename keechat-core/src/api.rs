use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{KeechatError, KeechatResult};
use crate::models::{AdminSession, ChatIdentity, Message, QaEntry, Question};

/// Most endpoints wrap their payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// The messaging endpoint answers with `{"response": "..."}` instead.
#[derive(Debug, Deserialize)]
struct MessageReply {
    response: String,
}

/// Unauthenticated endpoints used by the chat flow.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn register_student(
        &self,
        username: &str,
        is_existing_student: bool,
    ) -> KeechatResult<ChatIdentity>;

    async fn message_history(&self, identifier: &str) -> KeechatResult<Vec<Message>>;

    async fn send_message(&self, content: &str, user_identifier: &str) -> KeechatResult<String>;
}

/// Bearer-token endpoints used by the admin flows.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn admin_login(&self, email: &str, password: &str) -> KeechatResult<AdminSession>;

    async fn unanswered_questions(&self, token: &str) -> KeechatResult<Vec<Question>>;

    async fn qa_entries(&self, token: &str) -> KeechatResult<Vec<QaEntry>>;

    async fn answer_question(
        &self,
        token: &str,
        question_id: i64,
        answer: &str,
    ) -> KeechatResult<()>;
}

/// HTTP client for the chatbot backend.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> KeechatResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> KeechatResult<T> {
        debug!(path, "GET");
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::decode(req.send().await?).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> KeechatResult<T> {
        debug!(path, "POST");
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::decode(req.send().await?).await
    }

    /// POST where only the status matters; the body is discarded.
    async fn post_unit(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: Option<&str>,
    ) -> KeechatResult<()> {
        debug!(path, "POST");
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(KeechatError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(KeechatError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> KeechatResult<T> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(KeechatError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(KeechatError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

// Backends report human-readable failures in a `detail` field; fall back
// to the raw body, truncated, when it is absent.
fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    body.trim().chars().take(200).collect()
}

#[async_trait]
impl ChatApi for ApiClient {
    async fn register_student(
        &self,
        username: &str,
        is_existing_student: bool,
    ) -> KeechatResult<ChatIdentity> {
        let body = json!({
            "username": username,
            "is_existing_student": is_existing_student,
        });
        let result: KeechatResult<DataEnvelope<ChatIdentity>> =
            self.post_json("/api/auth/student", &body, None).await;
        match result {
            Ok(envelope) => Ok(envelope.data),
            Err(KeechatError::Api { status: 400, .. }) => Err(KeechatError::DuplicateUsername),
            Err(e) => Err(e),
        }
    }

    async fn message_history(&self, identifier: &str) -> KeechatResult<Vec<Message>> {
        let envelope: DataEnvelope<Vec<Message>> = self
            .get_json(&format!("/api/messages/{identifier}"), None)
            .await?;
        Ok(envelope.data)
    }

    async fn send_message(&self, content: &str, user_identifier: &str) -> KeechatResult<String> {
        let body = json!({
            "content": content,
            "user_identifier": user_identifier,
        });
        let reply: MessageReply = self.post_json("/api/message/", &body, None).await?;
        Ok(reply.response)
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn admin_login(&self, email: &str, password: &str) -> KeechatResult<AdminSession> {
        let body = json!({"email": email, "password": password});
        let envelope: DataEnvelope<AdminSession> = self
            .post_json("/api/auth/admin/login", &body, None)
            .await?;
        Ok(envelope.data)
    }

    async fn unanswered_questions(&self, token: &str) -> KeechatResult<Vec<Question>> {
        let envelope: DataEnvelope<Vec<Question>> = self
            .get_json("/api/admin/unanswered-questions", Some(token))
            .await?;
        Ok(envelope.data)
    }

    async fn qa_entries(&self, token: &str) -> KeechatResult<Vec<QaEntry>> {
        let envelope: DataEnvelope<Vec<QaEntry>> =
            self.get_json("/api/admin/qa-entries", Some(token)).await?;
        Ok(envelope.data)
    }

    async fn answer_question(
        &self,
        token: &str,
        question_id: i64,
        answer: &str,
    ) -> KeechatResult<()> {
        let body = json!({"answer": answer});
        self.post_unit(
            &format!("/api/admin/answer-question/{question_id}"),
            &body,
            Some(token),
        )
        .await
    }
}
