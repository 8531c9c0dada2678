use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::db::{self, DbPool};

/// Cache over the public rows of the settings table. Refreshing swaps the
/// whole map; a failed refresh keeps the last successfully fetched map so
/// branding/text lookups fail open instead of erroring pages.
#[derive(Default)]
pub struct SettingsCache {
    map: RwLock<HashMap<String, String>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh(&self, pool: &DbPool) {
        match db::list_public_settings(pool).await {
            Ok(rows) => {
                let fresh: HashMap<String, String> =
                    rows.into_iter().map(|s| (s.key, s.value)).collect();
                *self.map.write().await = fresh;
            }
            Err(e) => {
                tracing::error!("Settings refresh failed, keeping cached values: {}", e);
            }
        }
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.map.read().await.clone()
    }

    pub async fn get(&self, key: &str, default: &str) -> String {
        self.map
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_returns_default() {
        let cache = SettingsCache::new();
        assert_eq!(cache.get("site_name", "Nonprofit").await, "Nonprofit");
    }

    #[tokio::test]
    async fn refresh_populates_and_get_prefers_stored_value() {
        let pool = crate::db::init_pool_for_tests().await;
        let now = chrono::Utc::now();
        crate::db::create_setting(
            &pool,
            &crate::db::models::SiteSetting {
                id: uuid::Uuid::new_v4().to_string(),
                key: "site_name".to_string(),
                value: "Hope Foundation".to_string(),
                description: None,
                is_public: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .expect("create_setting");
        crate::db::create_setting(
            &pool,
            &crate::db::models::SiteSetting {
                id: uuid::Uuid::new_v4().to_string(),
                key: "smtp_password".to_string(),
                value: "secret".to_string(),
                description: None,
                is_public: false,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .expect("create_setting");

        let cache = SettingsCache::new();
        cache.refresh(&pool).await;

        assert_eq!(cache.get("site_name", "fallback").await, "Hope Foundation");
        // Private rows never land in the public cache.
        assert_eq!(cache.get("smtp_password", "").await, "");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_good_map() {
        let pool = crate::db::init_pool_for_tests().await;
        let now = chrono::Utc::now();
        crate::db::create_setting(
            &pool,
            &crate::db::models::SiteSetting {
                id: uuid::Uuid::new_v4().to_string(),
                key: "tagline".to_string(),
                value: "Together we rise".to_string(),
                description: None,
                is_public: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .expect("create_setting");

        let cache = SettingsCache::new();
        cache.refresh(&pool).await;
        assert_eq!(cache.get("tagline", "").await, "Together we rise");

        // A refresh against a broken store leaves the cached map untouched.
        pool.close().await;
        cache.refresh(&pool).await;
        assert_eq!(cache.get("tagline", "").await, "Together we rise");
    }
}
