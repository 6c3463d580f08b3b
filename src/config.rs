use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use anyhow::Context;

use crate::auth::PASSCODE_LENGTH;

pub const DEFAULT_ADMIN_PASSCODE: &str = "123456";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;
pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 4000;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub admin_passcode: String,
    pub jwt_secret: String,
    pub admin_token_ttl: chrono::Duration,
    pub payment_delay: Duration,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_address", &self.bind_address)
            .field("admin_token_ttl", &self.admin_token_ttl)
            .field("payment_delay", &self.payment_delay)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?,
            Err(_) => 5000,
        };

        let bind_address = parse_bind_address(&host, port)?;

        let admin_passcode = std::env::var("KIOSK_ADMIN_PASSCODE")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSCODE.to_string());
        if admin_passcode.len() != PASSCODE_LENGTH
            || !admin_passcode.bytes().all(|b| b.is_ascii_digit())
        {
            anyhow::bail!("KIOSK_ADMIN_PASSCODE must be exactly {} digits", PASSCODE_LENGTH);
        }

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            let bytes: [u8; 32] = rng.gen();
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        });

        let admin_token_ttl = match std::env::var("ADMIN_TOKEN_TTL_MINUTES") {
            Ok(value) => parse_token_ttl(&value)?,
            Err(_) => chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        };

        let delay_ms = match std::env::var("PAYMENT_DELAY_MS") {
            Ok(value) => value
                .parse::<u64>()
                .with_context(|| format!("PAYMENT_DELAY_MS must be milliseconds, got {:?}", value))?,
            Err(_) => DEFAULT_PAYMENT_DELAY_MS,
        };

        Ok(Self {
            bind_address,
            admin_passcode,
            jwt_secret,
            admin_token_ttl,
            payment_delay: Duration::from_millis(delay_ms),
        })
    }
}

/// Resolves `host` and `port` into a listen address. Accepts IPv4, bare
/// IPv6 (`::`) and host names.
pub fn parse_bind_address(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?
        .next()
        .with_context(|| format!("Host {} resolved to no address", host))
}

/// Parses `ADMIN_TOKEN_TTL_MINUTES`: a whole number of minutes between 1 and
/// [`MAX_TOKEN_TTL_MINUTES`].
pub fn parse_token_ttl(value: &str) -> anyhow::Result<chrono::Duration> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|minutes| (1..=MAX_TOKEN_TTL_MINUTES).contains(minutes))
        .and_then(chrono::Duration::try_minutes)
        .with_context(|| {
            format!(
                "ADMIN_TOKEN_TTL_MINUTES must be between 1 and {}, got {:?}",
                MAX_TOKEN_TTL_MINUTES, value
            )
        })
}
