//! Credential resolution.

use keygate_core::result::AppResult;
use keygate_database::store::KeyStore;
use keygate_entity::key::LicenseKey;

/// Resolve a client credential to a key.
///
/// Exact match on the secret first; only if that misses, exact match on the
/// display name. No prefix, case-folding or fuzzy matching.
pub async fn resolve_credential(
    keys: &dyn KeyStore,
    credential: &str,
) -> AppResult<Option<LicenseKey>> {
    if let Some(key) = keys.find_by_secret(credential).await? {
        return Ok(Some(key));
    }
    keys.find_by_name(credential).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_database::MemoryStore;
    use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyType};

    fn key(secret: &str, name: &str) -> CreateLicenseKey {
        CreateLicenseKey {
            secret: secret.into(),
            key_name: name.into(),
            key_type: KeyType::Lifetime,
            status: KeyStatus::Active,
            max_users: 1,
            expires_at: None,
            owner_id: None,
        }
    }

    #[tokio::test]
    async fn test_secret_and_name_resolve_same_record() {
        let store = MemoryStore::new();
        let created = store.create(key("ABC123", "MyKey")).await.unwrap();

        let by_secret = resolve_credential(&store, "ABC123").await.unwrap().unwrap();
        let by_name = resolve_credential(&store, "MyKey").await.unwrap().unwrap();
        assert_eq!(by_secret.id, created.id);
        assert_eq!(by_name.id, created.id);
    }

    #[tokio::test]
    async fn test_secret_takes_precedence() {
        let store = MemoryStore::new();
        let named = store.create(key("AAA", "BBB")).await.unwrap();
        let secret = store.create(key("BBB", "other")).await.unwrap();

        let resolved = resolve_credential(&store, "BBB").await.unwrap().unwrap();
        assert_eq!(resolved.id, secret.id);
        assert_ne!(resolved.id, named.id);
    }

    #[tokio::test]
    async fn test_no_partial_match() {
        let store = MemoryStore::new();
        store.create(key("ABC123", "MyKey")).await.unwrap();
        assert!(resolve_credential(&store, "ABC").await.unwrap().is_none());
        assert!(resolve_credential(&store, "mykey").await.unwrap().is_none());
    }
}
