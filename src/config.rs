//! Configuration read by the result tree engine.
//!
//! The host owns settings persistence; this crate only consumes a snapshot.
//! Field names follow the host's camelCase setting keys so a settings object
//! can be deserialized directly:
//!
//! ```json
//! {
//!   "groupByDirectory": true,
//!   "groupByMember": true,
//!   "excludedMemberKinds": "Variable, Field",
//!   "autoNavigateTimeout": 1500
//! }
//! ```

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::grouping::SymbolKind;

/// Default time to wait for a single result before opening the result tree.
pub const DEFAULT_AUTO_NAVIGATE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Settings that shape the result tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Group files into a compressed folder tree (default `true`).
    pub group_by_directory: bool,
    /// Group each file's results by enclosing symbol (default `false`).
    pub group_by_member: bool,
    /// Symbol kinds never used as member groups.
    #[serde(deserialize_with = "deserialize_kind_list")]
    pub excluded_member_kinds: FxHashSet<SymbolKind>,
    /// How long to wait for a lone result before showing the tree.
    /// Zero disables auto-navigation.
    #[serde(deserialize_with = "deserialize_millis")]
    pub auto_navigate_timeout: Duration,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            group_by_directory: true,
            group_by_member: false,
            excluded_member_kinds: FxHashSet::default(),
            auto_navigate_timeout: DEFAULT_AUTO_NAVIGATE_TIMEOUT,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group_by_directory(mut self, enabled: bool) -> Self {
        self.group_by_directory = enabled;
        self
    }

    pub fn with_group_by_member(mut self, enabled: bool) -> Self {
        self.group_by_member = enabled;
        self
    }

    /// Set the excluded kinds from a comma-separated list such as
    /// `"Variable, field"`. Unknown names are skipped.
    pub fn with_excluded_kinds(mut self, list: &str) -> Self {
        self.excluded_member_kinds = parse_kind_list(list);
        self
    }

    pub fn with_auto_navigate_timeout(mut self, timeout: Duration) -> Self {
        self.auto_navigate_timeout = timeout;
        self
    }

    /// Whether switching from `self` to `other` changes the shape of a tree,
    /// i.e. whether cached trees must be rebuilt.
    pub fn affects_grouping(&self, other: &TreeConfig) -> bool {
        self.group_by_directory != other.group_by_directory
            || self.group_by_member != other.group_by_member
            || self.excluded_member_kinds != other.excluded_member_kinds
    }
}

/// Parse a comma-separated list of symbol kind names.
pub fn parse_kind_list(list: &str) -> FxHashSet<SymbolKind> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match name.parse::<SymbolKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                warn!(%err, "ignoring excluded member kind");
                None
            }
        })
        .collect()
}

fn deserialize_kind_list<'de, D>(deserializer: D) -> Result<FxHashSet<SymbolKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = String::deserialize(deserializer)?;
    Ok(parse_kind_list(&list))
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();

        assert!(config.group_by_directory);
        assert!(!config.group_by_member);
        assert!(config.excluded_member_kinds.is_empty());
        assert_eq!(config.auto_navigate_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_kind_list_skips_unknown_and_blank() {
        let kinds = parse_kind_list("Variable, field,,gizmo , ");

        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&SymbolKind::Variable));
        assert!(kinds.contains(&SymbolKind::Field));
    }

    #[test]
    fn test_affects_grouping() {
        let base = TreeConfig::default();

        assert!(!base.affects_grouping(&base.clone()));
        assert!(base.affects_grouping(&base.clone().with_group_by_directory(false)));
        assert!(base.affects_grouping(&base.clone().with_group_by_member(true)));
        assert!(base.affects_grouping(&base.clone().with_excluded_kinds("Method")));
        assert!(!base.affects_grouping(
            &base.clone().with_auto_navigate_timeout(Duration::ZERO)
        ));
    }

    #[test]
    fn test_deserialize_camel_case_settings() {
        let json = r#"{
            "groupByDirectory": false,
            "groupByMember": true,
            "excludedMemberKinds": "Variable, Constant",
            "autoNavigateTimeout": 0
        }"#;
        let config: TreeConfig = serde_json::from_str(json).unwrap();

        assert!(!config.group_by_directory);
        assert!(config.group_by_member);
        assert!(config.excluded_member_kinds.contains(&SymbolKind::Constant));
        assert_eq!(config.auto_navigate_timeout, Duration::ZERO);
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let config: TreeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TreeConfig::default());
    }
}
