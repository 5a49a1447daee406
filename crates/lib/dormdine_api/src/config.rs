//! API server configuration.

use dormdine_core::auth::jwt::resolve_session_secret;

/// Origin allowed when `ALLOWED_ORIGINS` is unset.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Configuration for the API server.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL; `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Session token signing secret.
    pub session_secret: String,
    /// Stripe secret key; `None` disables payment intents.
    pub stripe_secret_key: Option<String>,
    /// Browser origins allowed to make credentialed requests.
    pub allowed_origins: Vec<String>,
    /// Currency for payment intents.
    pub payment_currency: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database", &self.database_url.as_ref().map(|_| "<set>"))
            .field("stripe", &self.stripe_secret_key.as_ref().map(|_| "<set>"))
            .field("allowed_origins", &self.allowed_origins)
            .field("payment_currency", &self.payment_currency)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                              | Default                        |
    /// |---------------------------------------|--------------------------------|
    /// | `BIND_ADDR`                           | `127.0.0.1:$PORT`, port `5000` |
    /// | `DATABASE_URL`                        | unset (in-memory store)        |
    /// | `ACCESS_TOKEN_SECRET` / `JWT_SECRET`  | generated & persisted to file  |
    /// | `STRIPE_SECRET_KEY`                   | unset (payments disabled)      |
    /// | `ALLOWED_ORIGINS`                     | `http://localhost:5173`        |
    /// | `PAYMENT_CURRENCY`                    | `usd`                          |
    pub fn from_env() -> Self {
        let bind_addr = non_empty_var("BIND_ADDR").unwrap_or_else(|| {
            let port = non_empty_var("PORT").unwrap_or_else(|| "5000".into());
            format!("127.0.0.1:{port}")
        });
        Self {
            bind_addr,
            database_url: non_empty_var("DATABASE_URL"),
            session_secret: resolve_session_secret(),
            stripe_secret_key: non_empty_var("STRIPE_SECRET_KEY"),
            allowed_origins: non_empty_var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.into()]),
            payment_currency: non_empty_var("PAYMENT_CURRENCY").unwrap_or_else(|| "usd".into()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test/ ,,https://b.test"),
            vec!["http://a.test".to_string(), "https://b.test".to_string()]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: Some("postgres://user:pw@db/dormdine".into()),
            session_secret: "s3cret".into(),
            stripe_secret_key: Some("sk_live".into()),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.into()],
            payment_currency: "usd".into(),
        };
        let shown = format!("{config:?}");
        assert!(!shown.contains("s3cret"));
        assert!(!shown.contains("pw@db"));
        assert!(!shown.contains("sk_live"));
    }
}
