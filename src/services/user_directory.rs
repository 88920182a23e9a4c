use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Display name substituted whenever a profile lookup misses or fails.
/// Directory trouble must never abort a send or a conversation listing.
pub const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    /// Avatar URL; empty when the user never uploaded one.
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Identity lookup owned by the user service; the chat core only ever needs
/// an id plus a display name. Production deployments implement this against
/// their user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Option<UserProfile>, DirectoryError>;
}

/// Resolve a full profile without letting directory failures propagate.
/// Misses and outages yield the "Unknown" name and an empty avatar URL.
pub async fn profile_or_placeholder(directory: &dyn UserDirectory, id: &str) -> UserProfile {
    match directory.get_by_id(id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => placeholder_profile(id),
        Err(e) => {
            tracing::warn!(user_id = %id, error = %e, "user directory lookup failed");
            placeholder_profile(id)
        }
    }
}

/// Resolve a display name without letting directory failures propagate.
pub async fn display_name_or_placeholder(directory: &dyn UserDirectory, id: &str) -> String {
    profile_or_placeholder(directory, id).await.display_name
}

fn placeholder_profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        display_name: UNKNOWN_USER.to_string(),
        profile_image_url: String::new(),
    }
}

/// In-memory directory used by tests and single-node deployments.
#[derive(Default, Clone)]
pub struct InMemoryUserDirectory {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from the `USER_DIRECTORY_SEED` env var, a JSON array
    /// of `{id, display_name, profile_image_url?}` objects. Absent var yields
    /// an empty directory.
    pub fn from_env_seed() -> Result<Self, crate::error::AppError> {
        let mut seeded = HashMap::new();
        if let Ok(raw) = std::env::var("USER_DIRECTORY_SEED") {
            let profiles: Vec<UserProfile> = serde_json::from_str(&raw).map_err(|e| {
                crate::error::AppError::Config(format!("USER_DIRECTORY_SEED invalid json: {e}"))
            })?;
            for profile in profiles {
                seeded.insert(profile.id.clone(), profile);
            }
        }
        Ok(Self {
            profiles: Arc::new(RwLock::new(seeded)),
        })
    }

    pub async fn register(&self, id: &str, display_name: &str) {
        self.register_with_image(id, display_name, "").await;
    }

    pub async fn register_with_image(&self, id: &str, display_name: &str, profile_image_url: &str) {
        let mut guard = self.profiles.write().await;
        guard.insert(
            id.to_string(),
            UserProfile {
                id: id.to_string(),
                display_name: display_name.to_string(),
                profile_image_url: profile_image_url.to_string(),
            },
        );
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_by_id(&self, id: &str) -> Result<Option<UserProfile>, DirectoryError> {
        let guard = self.profiles.read().await;
        Ok(guard.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_on_missing_profile() {
        let dir = InMemoryUserDirectory::new();
        assert_eq!(display_name_or_placeholder(&dir, "ghost").await, UNKNOWN_USER);

        dir.register("ghost", "Casper").await;
        assert_eq!(display_name_or_placeholder(&dir, "ghost").await, "Casper");
    }

    #[tokio::test]
    async fn avatar_defaults_to_empty_string() {
        let dir = InMemoryUserDirectory::new();
        let missing = profile_or_placeholder(&dir, "ghost").await;
        assert_eq!(missing.display_name, UNKNOWN_USER);
        assert_eq!(missing.profile_image_url, "");

        dir.register("plain", "Plain").await;
        assert_eq!(profile_or_placeholder(&dir, "plain").await.profile_image_url, "");

        dir.register_with_image("ghost", "Casper", "https://cdn.example/casper.png")
            .await;
        let found = profile_or_placeholder(&dir, "ghost").await;
        assert_eq!(found.profile_image_url, "https://cdn.example/casper.png");
    }
}
