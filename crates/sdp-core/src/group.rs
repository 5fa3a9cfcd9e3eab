//! # Statement Multisets and Group Partitions
//!
//! Statement lists are multisets: the same line may legitimately occur more
//! than once and every occurrence is tracked by position.
//!
//! [`StatementMultiset`] maps statement text to its remaining available
//! count. Partitioning consumes one occurrence per matched original
//! statement, so a statement occurring three times in the original and twice
//! in a selection is assigned twice to `matching` and once to `non_matching`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Original 0-based position → statement.
pub type IndexedStatements = BTreeMap<usize, String>;

/// Remaining-count multiset of statement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementMultiset {
    remaining: HashMap<String, usize>,
    total: usize,
}

impl StatementMultiset {
    /// Count every statement in `statements`.
    pub fn from_statements<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for statement in statements {
            set.add(statement.into(), 1);
        }
        set
    }

    fn add(&mut self, statement: String, count: usize) {
        *self.remaining.entry(statement).or_insert(0) += count;
        self.total += count;
    }

    /// Consume one occurrence of `statement`. Returns false when none remain.
    pub fn consume(&mut self, statement: &str) -> bool {
        match self.remaining.get_mut(statement) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.total -= 1;
                true
            }
            _ => false,
        }
    }

    /// Remaining occurrences of `statement`.
    pub fn count(&self, statement: &str) -> usize {
        self.remaining.get(statement).copied().unwrap_or(0)
    }

    /// Total remaining occurrences.
    pub fn len(&self) -> usize {
        self.total
    }

    /// True when nothing remains.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Multiset union: each statement keeps the larger of the two counts.
    pub fn union_max(&mut self, other: &StatementMultiset) {
        for (statement, &count) in &other.remaining {
            let current = self.count(statement);
            if count > current {
                self.add(statement.clone(), count - current);
            }
        }
    }

    /// Expand back to a statement list in code-point order.
    pub fn into_sorted_statements(self) -> Vec<String> {
        let mut entries: Vec<(String, usize)> = self.remaining.into_iter().collect();
        entries.sort_unstable();
        entries
            .into_iter()
            .flat_map(|(statement, count)| std::iter::repeat(statement).take(count))
            .collect()
    }
}

/// Partition of one statement list into matching and non-matching subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResult {
    /// Statements selected by the group, keyed by original position.
    pub matching: IndexedStatements,
    /// Every other statement, keyed by original position.
    pub non_matching: IndexedStatements,
}

impl GroupResult {
    /// Everything matches.
    pub fn all(statements: &[String]) -> Self {
        Self {
            matching: index(statements),
            non_matching: IndexedStatements::new(),
        }
    }

    /// Nothing matches.
    pub fn none(statements: &[String]) -> Self {
        Self {
            matching: IndexedStatements::new(),
            non_matching: index(statements),
        }
    }

    /// True when `matching` and `non_matching` are disjoint and together
    /// recover exactly `statements` by index.
    pub fn is_partition_of(&self, statements: &[String]) -> bool {
        if self.matching.len() + self.non_matching.len() != statements.len() {
            return false;
        }
        statements.iter().enumerate().all(|(i, s)| {
            match (self.matching.get(&i), self.non_matching.get(&i)) {
                (Some(m), None) => m == s,
                (None, Some(n)) => n == s,
                _ => false,
            }
        })
    }
}

fn index(statements: &[String]) -> IndexedStatements {
    statements.iter().cloned().enumerate().collect()
}

/// Partition `statements` by multiset membership in `selected`.
///
/// Fast paths: a selection as large as the input matches everything; an
/// empty selection matches nothing.
pub fn partition(statements: &[String], selected: &[String]) -> GroupResult {
    if selected.len() == statements.len() {
        return GroupResult::all(statements);
    }
    if selected.is_empty() {
        return GroupResult::none(statements);
    }
    partition_by(statements, StatementMultiset::from_statements(selected.iter().cloned()))
}

/// Partition `statements`, consuming one occurrence of `available` per match.
pub fn partition_by(statements: &[String], mut available: StatementMultiset) -> GroupResult {
    let mut result = GroupResult::default();
    for (i, statement) in statements.iter().enumerate() {
        if available.consume(statement) {
            result.matching.insert(i, statement.clone());
        } else {
            result.non_matching.insert(i, statement.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> String {
        format!("{text}\n")
    }

    #[test]
    fn test_multiset_consume_bounded() {
        let mut set = StatementMultiset::from_statements([s("a"), s("a"), s("b")]);
        assert_eq!(set.len(), 3);
        assert!(set.consume(&s("a")));
        assert!(set.consume(&s("a")));
        assert!(!set.consume(&s("a")));
        assert!(!set.consume(&s("c")));
        assert_eq!(set.count(&s("b")), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_union_max() {
        let mut left = StatementMultiset::from_statements([s("a"), s("b"), s("b")]);
        let right = StatementMultiset::from_statements([s("a"), s("a"), s("b"), s("c")]);
        left.union_max(&right);
        assert_eq!(left.count(&s("a")), 2);
        assert_eq!(left.count(&s("b")), 2);
        assert_eq!(left.count(&s("c")), 1);
        assert_eq!(left.len(), 5);
        assert_eq!(
            left.into_sorted_statements(),
            vec![s("a"), s("a"), s("b"), s("b"), s("c")]
        );
    }

    #[test]
    fn test_partition_repeated_statement() {
        // X three times in the input, twice in the selection.
        let statements = vec![s("x"), s("y"), s("x"), s("x")];
        let selected = vec![s("x"), s("x")];
        let result = partition(&statements, &selected);
        assert_eq!(result.matching.len(), 2);
        assert_eq!(result.matching.get(&0), Some(&s("x")));
        assert_eq!(result.matching.get(&2), Some(&s("x")));
        assert_eq!(result.non_matching.get(&1), Some(&s("y")));
        assert_eq!(result.non_matching.get(&3), Some(&s("x")));
        assert!(result.is_partition_of(&statements));
    }

    #[test]
    fn test_partition_fast_paths() {
        let statements = vec![s("a"), s("b")];
        let all = partition(&statements, &[s("b"), s("a")]);
        assert_eq!(all.matching.len(), 2);
        assert!(all.non_matching.is_empty());

        let none = partition(&statements, &[]);
        assert!(none.matching.is_empty());
        assert_eq!(none.non_matching.len(), 2);
        assert!(none.is_partition_of(&statements));
    }

    #[test]
    fn test_partition_ignores_unknown_selected() {
        let statements = vec![s("a"), s("b"), s("c")];
        let result = partition(&statements, &[s("z")]);
        assert!(result.matching.is_empty());
        assert!(result.is_partition_of(&statements));
    }

    #[test]
    fn test_is_partition_detects_overlap() {
        let statements = vec![s("a")];
        let mut result = GroupResult::all(&statements);
        result.non_matching.insert(0, s("a"));
        assert!(!result.is_partition_of(&statements));
    }

    #[test]
    fn test_group_result_serializes_camel_case() {
        let result = GroupResult::none(&[s("a")]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("nonMatching").is_some());
        assert_eq!(json["nonMatching"]["0"], "a\n");
    }
}
