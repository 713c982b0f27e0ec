// Minimal Razorpay client: orders, payment lookup, refunds and signature checks.

use std::collections::HashMap;

pub mod models;
pub mod signature;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::error;

use crate::models::{
    CreateOrderRequest, CreateRefundRequest, ErrorEnvelope, Order, PaymentEntity, RefundEntity,
};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    #[error("request to Razorpay failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Razorpay returned {status}: {description}")]
    Api {
        status: u16,
        code: Option<String>,
        description: String,
    },
}

#[derive(Debug, Clone)]
pub struct RazorpayOptions {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
}

#[derive(Debug, Clone)]
pub struct RazorpayClient {
    options: RazorpayOptions,
    base_url: String,
    client: Client,
}

impl RazorpayClient {
    pub fn new(options: RazorpayOptions) -> Self {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(options: RazorpayOptions, base_url: impl Into<String>) -> Self {
        Self {
            options,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Public key id, handed to the checkout widget.
    pub fn key_id(&self) -> &str {
        &self.options.key_id
    }

    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
        notes: HashMap<String, String>,
    ) -> Result<Order, RazorpayError> {
        let body = CreateOrderRequest {
            amount: amount_minor,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            notes,
        };

        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.options.key_id, Some(&self.options.key_secret))
            .json(&body)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentEntity, RazorpayError> {
        let response = self
            .client
            .get(format!("{}/v1/payments/{}", self.base_url, payment_id))
            .basic_auth(&self.options.key_id, Some(&self.options.key_secret))
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Refund a captured payment. `amount_minor = None` refunds in full.
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
        notes: HashMap<String, String>,
    ) -> Result<RefundEntity, RazorpayError> {
        let body = CreateRefundRequest {
            amount: amount_minor,
            notes,
        };

        let response = self
            .client
            .post(format!("{}/v1/payments/{}/refund", self.base_url, payment_id))
            .basic_auth(&self.options.key_id, Some(&self.options.key_secret))
            .json(&body)
            .send()
            .await?;

        Self::parse(response).await
    }

    pub fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature::verify_payment_signature(order_id, payment_id, signature, &self.options.key_secret)
    }

    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> bool {
        signature::verify_webhook_signature(body, signature, &self.options.webhook_secret)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, RazorpayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let raw = response.text().await.unwrap_or_default();
        let (code, description) = match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(envelope) => (envelope.error.code, envelope.error.description),
            Err(_) => (None, raw),
        };
        error!(status = status.as_u16(), %description, "Razorpay request failed");
        Err(RazorpayError::Api {
            status: status.as_u16(),
            code,
            description,
        })
    }
}
