use moka::future::Cache;
use std::time::Duration;

/// Token ids revoked by logout. An entry only needs to outlive the token it
/// blocks, so the TTL matches the access token TTL. Unbounded, so an entry is
/// only ever dropped by expiry.
#[derive(Clone)]
pub struct RevokedTokens {
    jtis: Cache<String, ()>,
}

impl RevokedTokens {
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            jtis: Cache::builder().time_to_live(token_ttl).build(),
        }
    }

    pub async fn revoke(&self, jti: &str) {
        self.jtis.insert(jti.to_string(), ()).await;
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.jtis.contains_key(jti)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn revoked_jti_is_remembered() {
        let revoked = RevokedTokens::new(Duration::from_secs(60));
        assert!(!revoked.is_revoked("abc"));
        revoked.revoke("abc").await;
        assert!(revoked.is_revoked("abc"));
        assert!(!revoked.is_revoked("def"));
    }

    #[actix_web::test]
    async fn every_logout_is_kept() {
        let revoked = RevokedTokens::new(Duration::from_secs(60));
        for i in 0..5_000 {
            revoked.revoke(&format!("jti-{i}")).await;
        }
        assert!((0..5_000).all(|i| revoked.is_revoked(&format!("jti-{i}"))));
    }
}
