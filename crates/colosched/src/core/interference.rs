//! Pairwise co-location limits between app kinds.

use std::collections::HashMap;

/// Stores directional limits: entry `(a, b) -> k` allows at most `k` instances of `b` on a machine
/// hosting at least one instance of `a`.
#[derive(Clone, Debug, Default)]
pub struct InterferenceTable {
    limits: HashMap<String, HashMap<String, u32>>,
}

impl InterferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a limit, replacing any previous one for the same ordered pair.
    ///
    /// For a self-pair the stored limit is `k + 1`, since the instance that triggers the rule counts towards it.
    pub fn insert(&mut self, app_a: &str, app_b: &str, k: u32) {
        let limit = if app_a == app_b { k.saturating_add(1) } else { k };
        self.limits
            .entry(app_a.to_string())
            .or_default()
            .insert(app_b.to_string(), limit);
    }

    /// Returns the limit of `app_b` instances in presence of `app_a`, if any.
    pub fn limit(&self, app_a: &str, app_b: &str) -> Option<u32> {
        self.limits.get(app_a).and_then(|row| row.get(app_b)).copied()
    }

    /// Returns the number of stored ordered pairs.
    pub fn len(&self) -> usize {
        self.limits.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_directional() {
        let mut table = InterferenceTable::new();
        table.insert("a", "b", 3);
        assert_eq!(table.limit("a", "b"), Some(3));
        assert_eq!(table.limit("b", "a"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn self_pair_gets_one_more() {
        let mut table = InterferenceTable::new();
        table.insert("a", "a", 1);
        assert_eq!(table.limit("a", "a"), Some(2));
    }

    #[test]
    fn later_entry_replaces_earlier() {
        let mut table = InterferenceTable::new();
        table.insert("a", "b", 3);
        table.insert("a", "b", 0);
        assert_eq!(table.limit("a", "b"), Some(0));
        assert_eq!(table.len(), 1);
    }
}
