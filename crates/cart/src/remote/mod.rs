//! Remote cart store client.
//!
//! The mutation core consumes the [`CartStore`] contract; [`HttpCartStore`]
//! implements it against the backend cart API over JSON. The transport owns
//! its own timeout and retry policy; the core issues one write per user
//! action and treats the response as a boolean acceptance signal.

mod wire;

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use marigold_core::UserId;

use crate::config::CartApiConfig;
use crate::draft::CartItemDraft;

use wire::AddItemRequest;

/// How much response body to keep in an error detail.
const ERROR_DETAIL_LIMIT: usize = 200;

/// Errors that can occur when writing to the remote cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the write with a non-success status.
    #[error("cart API returned {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body, for logs only.
        detail: String,
    },

    /// Rate limited by the cart API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The bearer token cannot be used as a header value.
    #[error("invalid API token: {0}")]
    InvalidToken(String),
}

/// Contract the mutation core requires from the backend cart store.
///
/// The write is expected to upsert by `(userId, productId)` with quantity
/// accumulation, matching the local cache's default merge. If the backend is
/// confirmed to append a line item per call instead, pair it with
/// [`MergePolicy::Replace`](crate::cache::MergePolicy::Replace) locally.
pub trait CartStore {
    /// Persist one add-to-cart write for the given user.
    ///
    /// Acceptance is a boolean signal; callers do not branch on specific
    /// status codes beyond success/not-success.
    fn add_item(
        &self,
        user_id: &UserId,
        draft: &CartItemDraft,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// JSON-over-HTTP client for the backend cart API.
#[derive(Debug, Clone)]
pub struct HttpCartStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCartStore {
    /// Create a new cart API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &CartApiConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| StoreError::InvalidToken(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert("Authorization", auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let endpoint = format!("{}/cart", config.base_url.as_str().trim_end_matches('/'));

        Ok(Self { client, endpoint })
    }
}

impl CartStore for HttpCartStore {
    #[instrument(skip(self, draft), fields(user_id = %user_id, product_id = %draft.product_id))]
    async fn add_item(&self, user_id: &UserId, draft: &CartItemDraft) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AddItemRequest::new(user_id, draft))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StoreError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "cart API returned non-success status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail: body.chars().take(ERROR_DETAIL_LIMIT).collect(),
            });
        }

        // Any success status is acceptance; the body carries nothing the
        // core needs.
        Ok(())
    }
}
