//! The proportional fit loop.
//!
//! Moves a set of entries toward a target raw sum one unit (0.1%) at a time,
//! cycling through the candidates round-robin so repeated small edits are
//! spread across entries instead of always landing on the first one.

use crate::entry::{ChanceEntry, RAW_MAX};
use crate::error::{ChanceError, ChanceResult};

/// Adjust `candidates` until their raw values sum to `target` (clamped to
/// `0..=1000`).
///
/// `counter` is the round-robin cursor; it is read and advanced so the next
/// call continues where this one stopped. Entries that hit `0` or `1000` in
/// the direction of travel drop out. Running out of entries before the
/// target is reached is an [`ChanceError::InsufficientCapacity`] error.
pub fn fit_in_loop(
    mut candidates: Vec<&mut ChanceEntry>,
    target: i32,
    counter: &mut usize,
) -> ChanceResult<()> {
    let original = candidates.len();
    let target = target.clamp(0, RAW_MAX);
    let mut delta = target - candidates.iter().map(|e| e.raw_value()).sum::<i32>();

    while delta != 0 {
        if candidates.is_empty() {
            return Err(ChanceError::InsufficientCapacity {
                target,
                delta,
                candidates: original,
            });
        }

        let sign = delta.signum();
        *counter = advance(*counter, sign, candidates.len());

        let raw = candidates[*counter].raw_value();
        if (sign < 0 && raw == 0) || (sign > 0 && raw == RAW_MAX) {
            log::trace!(
                "fit loop: {} is saturated, {} candidates left",
                candidates[*counter].name(),
                candidates.len() - 1
            );
            candidates.remove(*counter);
            continue;
        }

        candidates[*counter].set_raw_value(raw + sign);
        delta -= sign;
    }

    Ok(())
}

/// Step the cursor one position in the direction of `sign`, wrapping around
/// `0..len`. A cursor left over from a longer list wraps to the start.
fn advance(counter: usize, sign: i32, len: usize) -> usize {
    let next = if sign > 0 {
        counter.checked_add(1)
    } else {
        counter.checked_sub(1)
    };
    match next {
        Some(n) if n < len => n,
        Some(_) => 0,
        None => len - 1,
    }
}
