use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

use crate::domains::auth::models::OtpPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from_number: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_webhook_secret: String,
    pub payment_currency: String,
    pub app_name: String,
    pub otp_policy: OtpPolicy,
    pub default_country_code: String,
    /// Phone numbers that always sign in as admin
    pub admin_phone_numbers: Vec<String>,
    /// Enables the fixed test phone/code pair (debug builds only)
    pub test_identifier_enabled: bool,
    pub sms_notifications_enabled: bool,
    pub pending_booking_ttl_hours: i64,
    /// Empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = OtpPolicy::default();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parsed("PORT", 8080)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "homefix".to_string()),
            twilio_account_sid: required("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: required("TWILIO_AUTH_TOKEN")?,
            twilio_from_number: required("TWILIO_FROM_NUMBER")?,
            razorpay_key_id: required("RAZORPAY_KEY_ID")?,
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET")?,
            razorpay_webhook_secret: required("RAZORPAY_WEBHOOK_SECRET")?,
            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "HomeFix".to_string()),
            otp_policy: OtpPolicy {
                ttl_minutes: parsed("OTP_TTL_MINUTES", defaults.ttl_minutes)?,
                max_attempts: parsed("OTP_MAX_ATTEMPTS", defaults.max_attempts)?,
                resend_cooldown_seconds: parsed(
                    "OTP_RESEND_COOLDOWN_SECONDS",
                    defaults.resend_cooldown_seconds,
                )?,
            },
            default_country_code: env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "+91".to_string()),
            admin_phone_numbers: list("ADMIN_PHONE_NUMBERS"),
            test_identifier_enabled: parsed("TEST_IDENTIFIER_ENABLED", false)?,
            sms_notifications_enabled: parsed("SMS_NOTIFICATIONS_ENABLED", false)?,
            pending_booking_ttl_hours: parsed("PENDING_BOOKING_TTL_HOURS", 24)?,
            allowed_origins: list("ALLOWED_ORIGINS"),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} must be set", name))
}

fn parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        _ => Ok(default),
    }
}

/// Comma-separated list, blanks dropped.
fn list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|raw| split_list(&raw))
        .unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
