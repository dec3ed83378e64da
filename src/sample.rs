// Random sampling for the swipe-discovery feed: an unweighted shuffle of
// the catalog followed by a prefix take. Deliberately unseeded, so exact
// output is untestable; tests cover cardinality and membership only.

use rand::seq::SliceRandom;

use crate::models::{RawInventoryRecord, Vehicle};
use crate::normalize::normalize;

// Returns min(count, catalog size) vehicles drawn without replacement.
pub fn sample(catalog: &[RawInventoryRecord], count: usize) -> Vec<Vehicle> {
    let mut indices: Vec<usize> = (0..catalog.len()).collect();
    indices.shuffle(&mut rand::thread_rng());
    indices
        .into_iter()
        .take(count)
        .map(|i| normalize(&catalog[i]))
        .collect()
}
