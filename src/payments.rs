use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::Config;

/// Replay window for webhook timestamps.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

/// Parses a `t=timestamp,v1=signature` provider signature header.
pub fn parse_signature_header(header: &str) -> anyhow::Result<(i64, String)> {
    let mut timestamp = None;
    let mut v1 = None;

    for part in header.split(',') {
        if let Some((key, value)) = part.split_once('=') {
            match key.trim() {
                "t" => timestamp = value.trim().parse::<i64>().ok(),
                "v1" => v1 = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    match (timestamp, v1) {
        (Some(t), Some(sig)) if !sig.is_empty() => Ok((t, sig)),
        _ => Err(anyhow::anyhow!("invalid signature header format")),
    }
}

/// Verifies that the raw webhook body was signed with the shared secret:
/// HMAC-SHA256 over `timestamp.payload`, constant-time comparison, and a
/// bounded timestamp skew so captured requests cannot be replayed later.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> anyhow::Result<()> {
    let (timestamp, v1_sig) = parse_signature_header(header)?;

    let now = chrono::Utc::now().timestamp();
    if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(anyhow::anyhow!("signature timestamp outside tolerance"));
    }

    let expected = compute_signature(payload, timestamp, secret)?;
    if expected.as_bytes().ct_eq(v1_sig.as_bytes()).into() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("signature mismatch"))
    }
}

fn compute_signature(payload: &[u8], timestamp: i64, secret: &str) -> anyhow::Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| anyhow::anyhow!("invalid webhook secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds a valid signature header for a payload. Used to exercise the
/// webhook route in tests.
pub fn sign_payload(payload: &[u8], timestamp: i64, secret: &str) -> String {
    let sig = compute_signature(payload, timestamp, secret).unwrap_or_default();
    format!("t={},v1={}", timestamp, sig)
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

impl CheckoutSession {
    /// Donor email from session metadata, falling back to the email the
    /// provider collected at checkout.
    pub fn donor_email(&self) -> Option<String> {
        self.metadata
            .get("donorEmail")
            .cloned()
            .filter(|e| !e.is_empty())
            .or_else(|| {
                self.customer_details
                    .as_ref()
                    .and_then(|d| d.email.clone())
            })
            .or_else(|| self.customer_email.clone())
    }
}

/// Minor units as recorded by the provider, converted to major units for the
/// persisted donation row.
pub fn amount_major(amount_total: i64) -> f64 {
    amount_total as f64 / 100.0
}

pub struct DonationIntent {
    pub amount_minor: i64,
    pub donor_name: String,
    pub donor_email: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub project_id: Option<String>,
    pub program_category: Option<String>,
}

/// Creates a hosted checkout session for one donation attempt. The donor
/// metadata rides on the session and comes back to us on the completion
/// webhook.
pub async fn create_checkout_session(
    http: &reqwest::Client,
    config: &Config,
    intent: &DonationIntent,
) -> anyhow::Result<CheckoutSession> {
    let secret_key = config
        .stripe_secret_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("STRIPE_SECRET_KEY not configured"))?;

    let mut form: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        (
            "success_url".to_string(),
            format!(
                "{}/donation-success?session_id={{CHECKOUT_SESSION_ID}}",
                config.site_base_url
            ),
        ),
        (
            "cancel_url".to_string(),
            format!("{}/donate", config.site_base_url),
        ),
        ("customer_email".to_string(), intent.donor_email.clone()),
        (
            "line_items[0][price_data][currency]".to_string(),
            "usd".to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            intent.amount_minor.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            "Donation".to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "metadata[donorName]".to_string(),
            intent.donor_name.clone(),
        ),
        (
            "metadata[donorEmail]".to_string(),
            intent.donor_email.clone(),
        ),
        (
            "metadata[isAnonymous]".to_string(),
            intent.is_anonymous.to_string(),
        ),
    ];
    if let Some(message) = &intent.message {
        form.push(("metadata[message]".to_string(), message.clone()));
    }
    if let Some(project_id) = &intent.project_id {
        form.push(("metadata[projectId]".to_string(), project_id.clone()));
    }
    if let Some(category) = &intent.program_category {
        form.push(("metadata[programCategory]".to_string(), category.clone()));
    }

    let resp = http
        .post(CHECKOUT_SESSIONS_URL)
        .bearer_auth(secret_key)
        .form(&form)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!(
            "checkout session creation failed ({}): {}",
            status,
            body
        ));
    }

    let session: CheckoutSession = resp.json().await?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signature_header() {
        let (t, v1) = parse_signature_header("t=1609459200,v1=abcdef1234567890").expect("parse");
        assert_eq!(t, 1609459200);
        assert_eq!(v1, "abcdef1234567890");
    }

    #[test]
    fn rejects_malformed_signature_header() {
        assert!(parse_signature_header("garbage").is_err());
        assert!(parse_signature_header("t=notanumber,v1=aa").is_err());
        assert!(parse_signature_header("t=1609459200").is_err());
    }

    #[test]
    fn round_trips_a_signed_payload() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign_payload(payload, now, "whsec_test");
        assert!(verify_signature(payload, &header, "whsec_test").is_ok());
    }

    #[test]
    fn rejects_wrong_secret_and_tampered_payload() {
        let payload = br#"{"amount_total":5000}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign_payload(payload, now, "whsec_test");
        assert!(verify_signature(payload, &header, "whsec_other").is_err());
        assert!(verify_signature(br#"{"amount_total":9000}"#, &header, "whsec_test").is_err());
    }

    #[test]
    fn rejects_stale_timestamp() {
        let payload = b"{}";
        let stale = chrono::Utc::now().timestamp() - 3600;
        let header = sign_payload(payload, stale, "whsec_test");
        assert!(verify_signature(payload, &header, "whsec_test").is_err());
    }

    #[test]
    fn converts_minor_units_to_major() {
        assert_eq!(amount_major(5000), 50.0);
        assert_eq!(amount_major(199), 1.99);
    }

    #[test]
    fn donor_email_falls_back_to_customer_details() {
        let session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_123",
            "customer_details": {"email": "fallback@example.org"},
            "metadata": {}
        }))
        .expect("session");
        assert_eq!(session.donor_email().as_deref(), Some("fallback@example.org"));
    }
}
