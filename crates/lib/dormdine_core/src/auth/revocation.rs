//! Server-side session revocation.
//!
//! Tokens are otherwise self-contained, so logout records the token id here
//! until the token would have expired anyway.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

/// Revoked token ids, each kept until its token's expiry.
#[derive(Debug, Default)]
pub struct RevocationList {
    revoked: DashMap<String, i64>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `jti` until `exp` (unix timestamp).
    pub fn revoke(&self, jti: &str, exp: i64) {
        self.prune(Utc::now().timestamp());
        self.revoked.insert(jti.to_string(), exp);
        debug!(jti, "session revoked");
    }

    /// Whether `jti` has been revoked and has not yet expired.
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .get(jti)
            .is_some_and(|exp| *exp >= Utc::now().timestamp())
    }

    /// Drop entries whose tokens have expired by `now`.
    pub fn prune(&self, now: i64) {
        self.revoked.retain(|_, exp| *exp >= now);
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoked_until_expiry() {
        let list = RevocationList::new();
        let exp = Utc::now().timestamp() + 60;
        assert!(!list.is_revoked("a"));
        list.revoke("a", exp);
        assert!(list.is_revoked("a"));
        assert!(!list.is_revoked("b"));
    }

    #[test]
    fn expired_entries_are_pruned() {
        let list = RevocationList::new();
        let now = Utc::now().timestamp();
        list.revoke("old", now - 10);
        list.revoke("fresh", now + 60);
        assert!(!list.is_revoked("old"));
        list.prune(now);
        assert_eq!(list.len(), 1);
    }
}
