//! Domain types shared by the store, the services and the HTTP layer.

pub mod macros;
pub mod metric;
pub mod player;
pub mod record;
pub mod sample;

pub use metric::*;
pub use player::*;
pub use record::*;

/// Grouping key for a player/class pairing.
///
/// Exact concatenation: no case folding and no trimming, so `"Alice"` and
/// `"alice"` produce different summaries.
pub fn group_key(player_name: &str, class_name: &str) -> String {
    format!("{}-{}", player_name, class_name)
}

#[cfg(test)]
mod tests {
    use super::group_key;

    #[test]
    fn test_group_key_is_exact() {
        assert_eq!(group_key("Alice", "Tank"), "Alice-Tank");
        assert_ne!(group_key("Alice", "Tank"), group_key("alice", "Tank"));
        assert_ne!(group_key("Alice ", "Tank"), group_key("Alice", "Tank"));
    }
}
