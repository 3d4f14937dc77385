//! Uniform random selection among eligible notifications

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::NotificationRecord;

/// Pick one record with probability `1/len`, or `None` for an empty list
///
/// A fresh generator is seeded from OS entropy on every call, so each page
/// view is an independent draw.
pub fn pick_one(eligible: &[NotificationRecord]) -> Option<NotificationRecord> {
    let mut rng = StdRng::from_entropy();
    pick_one_with(eligible, &mut rng)
}

/// Same as [`pick_one`] with a caller-supplied generator
pub fn pick_one_with<R: Rng + ?Sized>(
    eligible: &[NotificationRecord],
    rng: &mut R,
) -> Option<NotificationRecord> {
    eligible.choose(rng).cloned()
}
