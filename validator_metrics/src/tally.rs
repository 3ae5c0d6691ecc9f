use core::borrow::Borrow;
use std::collections::BTreeMap;

use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};

/// Headcount paired with its stake-weighted equivalent.
#[derive(Clone, Copy, Default, PartialEq, Debug, Deserialize, Serialize)]
pub struct Tally {
    pub count: u64,
    pub scaled_count: f64,
}

impl Tally {
    #[expect(clippy::float_arithmetic)]
    pub fn add(&mut self, weight: f64) {
        self.count += 1;
        self.scaled_count += weight;
    }

    #[expect(clippy::float_arithmetic)]
    pub fn merge(&mut self, other: Self) {
        self.count += other.count;
        self.scaled_count += other.scaled_count;
    }
}

/// Tallies keyed by an arbitrary value. Unknown keys are simply new entries.
#[derive(Clone, PartialEq, Debug, Deref, IntoIterator, Deserialize, Serialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Ord + Serialize",
        deserialize = "K: Ord + Deserialize<'de>"
    )
)]
pub struct Histogram<K> {
    #[into_iterator(owned, ref)]
    tallies: BTreeMap<K, Tally>,
}

impl<K> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            tallies: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Histogram<K> {
    pub fn add(&mut self, key: K, weight: f64) {
        self.tallies.entry(key).or_default().add(weight);
    }

    /// Like [`Histogram::add`], but only allocates a key the first time it is seen.
    pub fn add_borrowed<Q>(&mut self, key: &Q, weight: f64)
    where
        K: Borrow<Q>,
        Q: Ord + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(tally) = self.tallies.get_mut(key) {
            tally.add(weight);
        } else {
            self.tallies.entry(key.to_owned()).or_default().add(weight);
        }
    }

    pub fn merge(&mut self, other: Self) {
        for (key, tally) in other.tallies {
            self.tallies.entry(key).or_default().merge(tally);
        }
    }

    #[must_use]
    pub fn count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tallies.get(key).map_or(0, |tally| tally.count)
    }
}

/// Bounded list of examples. The limit is passed on every append.
#[derive(Clone, PartialEq, Eq, Debug, Deref, IntoIterator, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Samples<T> {
    #[into_iterator(owned, ref)]
    items: Vec<T>,
}

impl<T> Default for Samples<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Samples<T> {
    pub fn push_within(&mut self, limit: usize, item: T) {
        if self.items.len() < limit {
            self.items.push(item);
        }
    }

    /// Takes items from the front of `items` until the list is full.
    pub fn extend_within(&mut self, limit: usize, items: impl IntoIterator<Item = T>) {
        let room = limit.saturating_sub(self.items.len());
        self.items.extend(items.into_iter().take(room));
    }

    pub fn merge(&mut self, limit: usize, other: Self) {
        self.extend_within(limit, other.items);
    }
}
