use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const FLASH_COOKIE_NAME: &str = "saml2_flash";

#[derive(Debug, Clone)]
struct FlashEntry {
    value: String,
    expires_at: Instant,
}

/// One-shot carryover slots for the next response cycle.
///
/// A resolved tenant's UUID is stashed server-side under a random token;
/// only the token travels in a short-TTL cookie. `take` consumes the slot,
/// so a value can be claimed at most once.
#[derive(Clone)]
pub struct FlashStore {
    entries: Arc<RwLock<HashMap<String, FlashEntry>>>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a value and return the token identifying its slot
    pub async fn put(&self, value: String) -> String {
        let token = format!("{:032x}", rand::random::<u128>());
        let mut entries = self.entries.write().await;

        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.clone(),
            FlashEntry {
                value,
                expires_at: now + self.ttl,
            },
        );

        token
    }

    /// Claim and consume a slot; a second claim of the same token finds
    /// nothing
    pub async fn take(&self, token: &str) -> Option<String> {
        let mut entries = self.entries.write().await;
        let entry = entries.remove(token)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.value)
    }

    /// Cookie carrying the slot token to the next request
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/saml2; HttpOnly; SameSite=Lax",
            FLASH_COOKIE_NAME,
            token,
            self.ttl.as_secs()
        )
    }
}

/// Pull the flash token out of a Cookie header value
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == FLASH_COOKIE_NAME).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_take_is_one_shot() {
        let store = FlashStore::new(Duration::from_secs(60));
        let token = store.put("6f9619ff-8b86-4d01-b42d-00cf4fc964ff".to_string()).await;

        assert_eq!(
            store.take(&token).await.as_deref(),
            Some("6f9619ff-8b86-4d01-b42d-00cf4fc964ff")
        );
        assert_eq!(store.take(&token).await, None);
    }

    #[tokio::test]
    async fn test_unknown_token_finds_nothing() {
        let store = FlashStore::new(Duration::from_secs(60));
        assert_eq!(store.take("deadbeef").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_gone() {
        let store = FlashStore::new(Duration::from_millis(10));
        let token = store.put("value".to_string()).await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.take(&token).await, None);
    }

    #[test]
    fn test_token_from_cookie_header() {
        let header = "other=1; saml2_flash=abc123; theme=dark";
        assert_eq!(token_from_cookie_header(header), Some("abc123"));
        assert_eq!(token_from_cookie_header("other=1"), None);
    }
}
