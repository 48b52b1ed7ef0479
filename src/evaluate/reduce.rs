//! Reductions shared by local and deferred evaluation.
//!
//! Every function takes the already filtered and ordered sequence, either as
//! borrowed rows (`&T`) or owned rows (`T`), and preserves its order.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::types::{Numeric, Sort};

pub(crate) fn group_by<T, I, K, F>(rows: impl IntoIterator<Item = I>, key: F) -> IndexMap<K, Vec<I>>
where
    T: ?Sized,
    I: Borrow<T>,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<I>> = IndexMap::new();
    for row in rows {
        groups.entry(key(row.borrow())).or_default().push(row);
    }
    groups
}

pub(crate) fn distinct<T, I, K, F>(rows: impl IntoIterator<Item = I>, key: F) -> Vec<I>
where
    T: ?Sized,
    I: Borrow<T>,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(key(row.borrow())))
        .collect()
}

pub(crate) fn duplicates<T, I, K, F>(rows: impl IntoIterator<Item = I>, key: F) -> Vec<I>
where
    T: ?Sized,
    I: Borrow<T>,
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let rows: Vec<I> = rows.into_iter().collect();
    let mut counts: HashMap<K, usize> = HashMap::new();
    for row in &rows {
        *counts.entry(key(row.borrow())).or_insert(0) += 1;
    }
    rows.into_iter()
        .filter(|row| counts.get(&key(row.borrow())).is_some_and(|n| *n > 1))
        .collect()
}

pub(crate) fn duplicate_groups<K, I>(groups: IndexMap<K, Vec<I>>) -> IndexMap<K, Vec<I>>
where
    K: Hash + Eq,
{
    groups.into_iter().filter(|(_, rows)| rows.len() > 1).collect()
}

pub(crate) fn unique_groups<K, I>(groups: IndexMap<K, Vec<I>>) -> IndexMap<K, I>
where
    K: Hash + Eq,
{
    groups
        .into_iter()
        .filter_map(|(key, mut rows)| {
            if rows.len() == 1 {
                rows.pop().map(|row| (key, row))
            } else {
                None
            }
        })
        .collect()
}

pub(crate) fn top_groups<T, I, K>(
    groups: IndexMap<K, Vec<I>>,
    count: usize,
    order: &Sort<T>,
) -> IndexMap<K, Vec<I>>
where
    T: ?Sized,
    I: Borrow<T>,
    K: Hash + Eq,
{
    groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by(|a, b| order.compare(a.borrow(), b.borrow()));
            rows.truncate(count);
            (key, rows)
        })
        .collect()
}

pub(crate) fn sum<N: Numeric>(
    values: impl IntoIterator<Item = N>,
    operation: &'static str,
) -> Result<N> {
    values.into_iter().try_fold(N::zero(), |acc, v| {
        acc.checked_add(v).ok_or(Error::Overflow { operation })
    })
}

pub(crate) fn fold<N, F>(values: impl IntoIterator<Item = N>, f: F) -> N
where
    N: Numeric,
    F: Fn(N, N) -> N,
{
    values.into_iter().fold(N::zero(), f)
}

/// Smallest value; the first one wins among incomparable values.
pub(crate) fn min<N: Numeric>(
    values: impl IntoIterator<Item = N>,
    operation: &'static str,
) -> Result<N> {
    values
        .into_iter()
        .reduce(|best, v| if v < best { v } else { best })
        .ok_or(Error::EmptyAggregation { operation })
}

/// Largest value; the first one wins among incomparable values.
pub(crate) fn max<N: Numeric>(
    values: impl IntoIterator<Item = N>,
    operation: &'static str,
) -> Result<N> {
    values
        .into_iter()
        .reduce(|best, v| if v > best { v } else { best })
        .ok_or(Error::EmptyAggregation { operation })
}

/// Exact decimal mean.
pub(crate) fn average<N: Numeric>(
    values: impl IntoIterator<Item = N>,
    operation: &'static str,
) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    let mut count: u64 = 0;
    for value in values {
        let d = value.to_decimal().ok_or_else(|| Error::InvalidArgument {
            argument: "value",
            reason: format!("{value:?} has no decimal representation"),
        })?;
        total = total.checked_add(d).ok_or_else(|| Error::InvalidArgument {
            argument: "value",
            reason: "sum exceeds the decimal range".to_owned(),
        })?;
        count += 1;
    }
    if count == 0 {
        return Err(Error::EmptyAggregation { operation });
    }
    Ok(total / Decimal::from(count))
}

/// Applies a fallible per-group reduction to every group.
pub(crate) fn per_group<K, I, V>(
    groups: IndexMap<K, Vec<I>>,
    mut reduce: impl FnMut(Vec<I>) -> Result<V>,
) -> Result<IndexMap<K, V>>
where
    K: Hash + Eq,
{
    groups
        .into_iter()
        .map(|(key, rows)| reduce(rows).map(|v| (key, v)))
        .collect()
}
