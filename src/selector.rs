//! Quote selection over an immutable snapshot of the collection.
//!
//! Both operations are defined only for non-empty snapshots and return `None`
//! otherwise; callers translate that into their own "no quotes" signal.

use crate::db::Quote;
use chrono::NaiveDate;
use rand::Rng;
use sha2::{Digest, Sha256};

/// One element chosen uniformly at random. Re-evaluated per call.
pub fn random_quote(quotes: &[Quote]) -> Option<&Quote> {
    if quotes.is_empty() {
        return None;
    }
    let idx = rand::rng().random_range(0..quotes.len());
    quotes.get(idx)
}

/// The deterministic quote of the day for `date`.
///
/// Two calls on the same UTC calendar day against the same snapshot return
/// the same element. The index is computed against the snapshot's current
/// length and ordering, so callers that want restart-stable selection must
/// enumerate quotes in a stable order (the repository lists `ORDER BY id`).
pub fn quote_of_the_day(quotes: &[Quote], date: NaiveDate) -> Option<&Quote> {
    if quotes.is_empty() {
        return None;
    }
    quotes.get(daily_index(date, quotes.len()))
}

/// SHA-256 of the `YYYY-MM-DD` date string, interpreted as a big-endian
/// integer and reduced modulo `len`.
///
/// The digest is folded byte-by-byte under the modulus, which is exact
/// big-integer arithmetic without a bigint dependency. `len` must be
/// non-zero.
pub fn daily_index(date: NaiveDate, len: usize) -> usize {
    debug_assert!(len > 0);
    let day = date.format("%Y-%m-%d").to_string();
    let digest = Sha256::digest(day.as_bytes());

    let len = len as u128;
    let rem = digest
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | u128::from(b)) % len);
    rem as usize
}
