//! Record trait and id/timestamp helpers

use serde::{Serialize, de::DeserializeOwned};

/// A value that can live in a [`Store`](crate::Store)
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Unique id within the collection
    fn id(&self) -> &str;

    /// Last update timestamp (Unix milliseconds)
    fn updated_at(&self) -> i64;

    /// Collection (directory) name for this record type
    fn collection_name() -> &'static str;
}

/// Current time in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a time-ordered id with a short prefix, e.g. `sess-0193f1c2...`
pub fn generate_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    format!("{}-{}", prefix, uuid.simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_has_prefix_and_is_unique() {
        let a = generate_id("sess");
        let b = generate_id("sess");
        assert!(a.starts_with("sess-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_now_ms_is_positive() {
        assert!(now_ms() > 0);
    }
}
