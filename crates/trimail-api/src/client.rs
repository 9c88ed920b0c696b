//! HTTP client for the triage backend.

use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{
    BulkOutcome, MailboxStats, MessageList, Sender, Suggestion, SuggestionAction, SuggestionStatus,
};

/// Header carrying the authenticated user's address on every request.
const USER_HEADER: &str = "X-User-Email";

/// Remote mailbox surface consumed by the sync layer.
///
/// `HttpMailboxClient` is the production implementation; tests substitute
/// their own. Futures returned by these methods are not required to be
/// `Send`; bound them at the use site if you spawn them.
#[allow(async_fn_in_trait)]
pub trait MailboxApi {
    /// Pull new mail from the upstream provider into the backend store.
    ///
    /// Expensive; callers are expected to throttle it.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream pull fails.
    async fn sync_mailbox(&self) -> Result<()>;

    /// List messages matching `query`, up to `max_results` per page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessageList>;

    /// List aggregated sender information.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_senders(&self) -> Result<Vec<Sender>>;

    /// List triage suggestions in the given state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_suggestions(&self, status: SuggestionStatus) -> Result<Vec<Suggestion>>;

    /// Fetch the mailbox statistics snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_stats(&self) -> Result<MailboxStats>;

    /// Execute a suggestion's action on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn apply_suggestion(&self, id: &str) -> Result<()>;

    /// Decline a suggestion on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn reject_suggestion(&self, id: &str) -> Result<()>;

    /// Apply one action to every message from a sender.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn apply_bulk_action(
        &self,
        sender_email: &str,
        action: SuggestionAction,
        label: Option<&str>,
    ) -> Result<BulkOutcome>;
}

/// REST client for the triage backend.
#[derive(Debug, Clone)]
pub struct HttpMailboxClient {
    client: reqwest::Client,
    base_url: String,
    user_email: String,
}

impl HttpMailboxClient {
    /// Create a client for the backend at `base_url`, acting as `user_email`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, user_email: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            user_email: user_email.into(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header(USER_HEADER, &self.user_email)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(USER_HEADER, &self.user_email)
    }
}

/// Check the status and decode the body, or map to an API error.
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Check the status and discard the body, or map to an API error.
async fn expect_success(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(())
}

impl MailboxApi for HttpMailboxClient {
    async fn sync_mailbox(&self) -> Result<()> {
        debug!("POST /api/emails/sync");
        let response = self.post("/api/emails/sync").send().await?;
        expect_success(response).await
    }

    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessageList> {
        debug!(query, max_results, has_token = page_token.is_some(), "GET /api/emails");
        let mut request = self
            .get("/api/emails")
            .query(&[("q", query), ("maxResults", &max_results.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        decode(request.send().await?).await
    }

    async fn list_senders(&self) -> Result<Vec<Sender>> {
        debug!("GET /api/senders");
        decode(self.get("/api/senders").send().await?).await
    }

    async fn list_suggestions(&self, status: SuggestionStatus) -> Result<Vec<Suggestion>> {
        debug!(status = status.as_str(), "GET /api/ai/suggestions");
        let response = self
            .get("/api/ai/suggestions")
            .query(&[("status", status.as_str())])
            .send()
            .await?;
        decode(response).await
    }

    async fn get_stats(&self) -> Result<MailboxStats> {
        debug!("GET /api/stats");
        decode(self.get("/api/stats").send().await?).await
    }

    async fn apply_suggestion(&self, id: &str) -> Result<()> {
        debug!(id, "POST /api/ai/apply");
        let response = self
            .post("/api/ai/apply")
            .json(&json!({ "suggestionId": id }))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn reject_suggestion(&self, id: &str) -> Result<()> {
        debug!(id, "POST reject suggestion");
        let response = self
            .post(&format!("/api/ai/suggestions/{id}/reject"))
            .send()
            .await?;
        expect_success(response).await
    }

    async fn apply_bulk_action(
        &self,
        sender_email: &str,
        action: SuggestionAction,
        label: Option<&str>,
    ) -> Result<BulkOutcome> {
        debug!(sender_email, action = action.as_str(), "POST /api/ai/apply-bulk");
        let response = self
            .post("/api/ai/apply-bulk")
            .json(&json!({
                "senderEmail": sender_email,
                "action": action.as_str(),
                "labelName": label.unwrap_or_default(),
            }))
            .send()
            .await?;
        decode(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = HttpMailboxClient::new("http://localhost:8080/", "me@example.com");
        assert_eq!(client.base_url, "http://localhost:8080");

        let client = HttpMailboxClient::new("http://localhost:8080", "me@example.com");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_get_request_carries_user_header_and_query() {
        let client = HttpMailboxClient::new("http://localhost:8080", "me@example.com");
        let request = client
            .get("/api/emails")
            .query(&[("q", "in:inbox"), ("maxResults", "100")])
            .build()
            .unwrap();

        assert_eq!(request.method().as_str(), "GET");
        assert_eq!(request.url().path(), "/api/emails");
        assert_eq!(
            request.headers().get(USER_HEADER).unwrap().to_str().unwrap(),
            "me@example.com"
        );

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "in:inbox".to_string())));
        assert!(pairs.contains(&("maxResults".to_string(), "100".to_string())));
    }

    #[test]
    fn test_post_request_carries_user_header() {
        let client = HttpMailboxClient::new("http://localhost:8080", "me@example.com");
        let request = client
            .post("/api/ai/suggestions/s1/reject")
            .build()
            .unwrap();

        assert_eq!(request.method().as_str(), "POST");
        assert_eq!(request.url().path(), "/api/ai/suggestions/s1/reject");
        assert_eq!(
            request.headers().get(USER_HEADER).unwrap().to_str().unwrap(),
            "me@example.com"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_maps_to_api_error() {
        let response = http::Response::builder()
            .status(502)
            .body("bad gateway")
            .unwrap();

        let err = expect_success(reqwest::Response::from(response))
            .await
            .unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_decode_reads_success_payload() {
        let response = http::Response::builder()
            .status(200)
            .body(r#"{"appliedCount":3}"#)
            .unwrap();

        let outcome: BulkOutcome = decode(reqwest::Response::from(response)).await.unwrap();
        assert_eq!(outcome.applied_count, 3);
    }
}
