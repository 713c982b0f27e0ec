use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use sqlx::PgPool;

use crate::common::OtpCodeId;

/// Limits applied to one-time codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    pub ttl_minutes: i64,
    pub max_attempts: i32,
    pub resend_cooldown_seconds: i64,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl_minutes: 10,
            max_attempts: 5,
            resend_cooldown_seconds: 60,
        }
    }
}

/// A one-time login code. Only a digest of the code is persisted.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct OtpCode {
    pub id: OtpCodeId,
    pub phone_number: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub verified_at: Option<DateTime<Utc>>,
    pub invalidated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn remaining_attempts(&self) -> i32 {
        (self.max_attempts - self.attempts).max(0)
    }

    /// Constant-time check of a submitted code against the stored digest.
    pub fn matches(&self, submitted: &str) -> bool {
        let Ok(expected) = hex::decode(&self.code_hash) else {
            return false;
        };
        match code_mac(&self.phone_number, submitted) {
            Some(mac) => mac.verify_slice(&expected).is_ok(),
            None => false,
        }
    }

    pub async fn create(
        phone_number: &str,
        code: &str,
        policy: &OtpPolicy,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO otp_codes (id, phone_number, code_hash, expires_at, max_attempts)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(OtpCodeId::new())
        .bind(phone_number)
        .bind(hash_code(phone_number, code))
        .bind(Utc::now() + Duration::minutes(policy.ttl_minutes))
        .bind(policy.max_attempts)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest code issued to the phone, whatever its state.
    pub async fn find_latest(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM otp_codes
            WHERE phone_number = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest code that is neither verified nor superseded.
    pub async fn find_active(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM otp_codes
            WHERE phone_number = $1
              AND verified_at IS NULL
              AND invalidated_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Supersede every outstanding code for the phone.
    pub async fn invalidate_active(phone_number: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE otp_codes SET invalidated_at = NOW()
            WHERE phone_number = $1
              AND verified_at IS NULL
              AND invalidated_at IS NULL
            "#,
        )
        .bind(phone_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count an attempt before the comparison happens.
    ///
    /// Returns the new attempt count, or `None` when the cap was already
    /// reached (including by a concurrent request).
    pub async fn register_attempt(id: OtpCodeId, pool: &PgPool) -> Result<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE otp_codes SET attempts = attempts + 1
            WHERE id = $1 AND attempts < max_attempts
            RETURNING attempts
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns false if the code was already used.
    pub async fn mark_verified(id: OtpCodeId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE otp_codes SET verified_at = NOW() WHERE id = $1 AND verified_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn delete(id: OtpCodeId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM otp_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove codes that expired more than `grace` ago.
    pub async fn purge_expired(grace: Duration, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE expires_at < $1")
            .bind(Utc::now() - grace)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Uniformly random 6-digit code, leading zeros kept.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

type HmacSha256 = Hmac<Sha256>;

fn code_mac(phone_number: &str, code: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(phone_number.as_bytes()).ok()?;
    mac.update(code.trim().as_bytes());
    Some(mac)
}

/// HMAC-SHA256 of the code keyed by the phone, hex encoded. Equal codes for
/// different users never share a digest.
pub fn hash_code(phone_number: &str, code: &str) -> String {
    match code_mac(phone_number, code) {
        Some(mac) => hex::encode(mac.finalize().into_bytes()),
        None => String::new(),
    }
}

pub fn is_well_formed_code(code: &str) -> bool {
    let code = code.trim();
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// SMS body for a login code.
pub fn render_otp_message(code: &str, app_name: &str, ttl_minutes: i64) -> String {
    format!(
        "{} is your {} verification code. It expires in {} minutes.",
        code, app_name, ttl_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_with(phone: &str, code: &str, attempts: i32) -> OtpCode {
        OtpCode {
            id: OtpCodeId::new(),
            phone_number: phone.to_string(),
            code_hash: hash_code(phone, code),
            expires_at: Utc::now() + Duration::minutes(10),
            attempts,
            max_attempts: 5,
            verified_at: None,
            invalidated_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(is_well_formed_code(&code), "bad code {}", code);
        }
    }

    #[test]
    fn test_hash_is_salted_by_phone() {
        assert_eq!(hash_code("+911", "123456"), hash_code("+911", "123456"));
        assert_ne!(hash_code("+911", "123456"), hash_code("+912", "123456"));
        assert_eq!(hash_code("+911", "123456").len(), 64);
    }

    #[test]
    fn test_matches() {
        let otp = code_with("+919876543210", "042137", 0);
        assert!(otp.matches("042137"));
        assert!(otp.matches(" 042137 "));
        assert!(!otp.matches("42137"));
        assert!(!otp.matches("000000"));
    }

    #[test]
    fn test_corrupt_digest_never_matches() {
        let mut otp = code_with("+919876543210", "042137", 0);
        otp.code_hash = "not-hex".to_string();
        assert!(!otp.matches("042137"));

        // Truncated digest of the right code
        otp.code_hash = hash_code("+919876543210", "042137")[..32].to_string();
        assert!(!otp.matches("042137"));
    }

    #[test]
    fn test_attempt_accounting() {
        let otp = code_with("+919876543210", "042137", 4);
        assert!(!otp.attempts_exhausted());
        assert_eq!(otp.remaining_attempts(), 1);

        let otp = code_with("+919876543210", "042137", 5);
        assert!(otp.attempts_exhausted());
        assert_eq!(otp.remaining_attempts(), 0);
    }

    #[test]
    fn test_expiry() {
        let otp = code_with("+919876543210", "042137", 0);
        assert!(!otp.is_expired(Utc::now()));
        assert!(otp.is_expired(otp.expires_at));
        assert!(otp.is_expired(otp.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_well_formed_code() {
        assert!(is_well_formed_code("000123"));
        assert!(!is_well_formed_code("12345"));
        assert!(!is_well_formed_code("12a456"));
    }

    #[test]
    fn test_render_message() {
        assert_eq!(
            render_otp_message("042137", "HomeFix", 10),
            "042137 is your HomeFix verification code. It expires in 10 minutes."
        );
    }
}
