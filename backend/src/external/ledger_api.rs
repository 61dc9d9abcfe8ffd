//! HTTP client for the remote ledger persistence API

use axum::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{StockOrder, TimelineEntry, TransformationDraft};
use std::time::Duration;
use uuid::Uuid;

use super::{AvailableLotsQuery, LedgerStore, SubmissionReceipt};
use crate::config::RemoteConfig;
use crate::error::{AppError, AppResult};

/// Ledger persistence API client
#[derive(Clone)]
pub struct LedgerApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl LedgerApiClient {
    /// Create a client from the remote section of the configuration
    pub fn new(config: &RemoteConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> AppResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::RemoteFailure(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(resource.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RemoteFailure(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json()
            .await
            .map_err(|e| AppError::RemoteFailure(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LedgerStore for LedgerApiClient {
    async fn fetch_lot(&self, lot_id: Uuid) -> AppResult<StockOrder> {
        let url = self.url(&format!("/stock-orders/{}", lot_id));
        tracing::debug!("Fetching lot {}", lot_id);
        let response = self.send(self.client.get(&url), "Lot").await?;
        Self::parse(response).await
    }

    async fn fetch_available_lots(&self, query: &AvailableLotsQuery) -> AppResult<Vec<StockOrder>> {
        let url = self.url(&format!("/facilities/{}/available-stock-orders", query.facility_id));
        let response = self
            .send(self.client.get(&url).query(query), "Facility")
            .await?;
        Self::parse(response).await
    }

    async fn fetch_raw_history(&self, lot_id: Uuid) -> AppResult<Vec<TimelineEntry>> {
        let url = self.url(&format!("/stock-orders/{}/history", lot_id));
        let response = self.send(self.client.get(&url), "Lot").await?;
        Self::parse(response).await
    }

    async fn submit_transformation(&self, draft: &TransformationDraft) -> AppResult<SubmissionReceipt> {
        let url = self.url("/processing-orders");
        let response = self
            .send(self.client.post(&url).json(draft), "Processing order")
            .await?;
        Self::parse(response).await
    }

    async fn delete_transformation(&self, processing_order_id: Uuid) -> AppResult<()> {
        let url = self.url(&format!("/processing-orders/{}", processing_order_id));
        self.send(self.client.delete(&url), "Processing order").await?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        let url = self.url("/health");
        match self.authorize(self.client.get(&url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Ledger service unreachable: {}", e);
                false
            }
        }
    }
}
