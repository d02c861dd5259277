//! Keep-latest reduction
//!
//! Selects, per identity, the single row with the greatest key. Rows whose key
//! is None never win over a row with a key. On equal keys the first row seen
//! wins. Winners come back ordered by key descending (None last), ties in
//! source order.

use std::collections::HashMap;
use std::hash::Hash;

pub fn keep_latest<T, I, K>(
    rows: impl IntoIterator<Item = T>,
    identity: impl Fn(&T) -> I,
    key: impl Fn(&T) -> Option<K>,
) -> Vec<T>
where
    I: Eq + Hash,
    K: Ord,
{
    // (source position, row) of the current winner for each identity
    let mut winners: Vec<(usize, T)> = Vec::new();
    let mut slots: HashMap<I, usize> = HashMap::new();

    for (position, row) in rows.into_iter().enumerate() {
        match slots.get(&identity(&row)) {
            Some(&slot) => {
                // Option ordering puts None below any Some; strict > keeps the first on ties
                if key(&row) > key(&winners[slot].1) {
                    winners[slot] = (position, row);
                }
            }
            None => {
                slots.insert(identity(&row), winners.len());
                winners.push((position, row));
            }
        }
    }

    winners.sort_by(|(pa, a), (pb, b)| key(b).cmp(&key(a)).then(pa.cmp(pb)));
    winners.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        unit: &'static str,
        day: Option<u32>,
        tag: &'static str,
    }

    fn row(unit: &'static str, day: Option<u32>, tag: &'static str) -> Row {
        Row { unit, day, tag }
    }

    fn latest(rows: Vec<Row>) -> Vec<&'static str> {
        keep_latest(rows, |r| r.unit, |r| r.day)
            .into_iter()
            .map(|r| r.tag)
            .collect()
    }

    #[test]
    fn test_picks_greatest_date_per_identity() {
        let rows = vec![
            row("a", Some(1), "a1"),
            row("b", Some(4), "b4"),
            row("a", Some(3), "a3"),
            row("a", Some(2), "a2"),
        ];
        assert_eq!(latest(rows), vec!["b4", "a3"]);
    }

    #[test]
    fn test_ties_resolved_by_source_order() {
        let rows = vec![
            row("a", Some(5), "first"),
            row("a", Some(5), "second"),
            row("a", Some(2), "older"),
        ];
        assert_eq!(latest(rows), vec!["first"]);

        // Moving an older row around does not change the winner among equals
        let rows = vec![
            row("a", Some(2), "older"),
            row("a", Some(5), "first"),
            row("a", Some(5), "second"),
        ];
        assert_eq!(latest(rows), vec!["first"]);
    }

    #[test]
    fn test_null_keys_never_win_over_dated_rows() {
        let rows = vec![
            row("a", None, "undated"),
            row("a", Some(1), "dated"),
            row("b", None, "only-undated"),
        ];
        assert_eq!(latest(rows), vec!["dated", "only-undated"]);
    }

    #[test]
    fn test_output_order_is_key_descending_then_source() {
        let rows = vec![
            row("c", Some(2), "c2"),
            row("a", Some(9), "a9"),
            row("b", Some(2), "b2"),
            row("d", None, "d-"),
        ];
        assert_eq!(latest(rows), vec!["a9", "c2", "b2", "d-"]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let rows = vec![
            row("x", Some(3), "x3a"),
            row("y", Some(3), "y3"),
            row("x", Some(3), "x3b"),
        ];
        let first = latest(rows.clone());
        for _ in 0..10 {
            assert_eq!(latest(rows.clone()), first);
        }
        assert_eq!(first, vec!["x3a", "y3"]);
    }
}
