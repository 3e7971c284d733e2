//! Prime helpers used to normalise table capacities

/// Returns true if `n` is prime.
///
/// Trial division by odd factors up to `√n`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    while factor.checked_mul(factor).is_some_and(|square| square <= n) {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }

    true
}

/// Returns the smallest odd prime at or above `n`.
///
/// Even inputs are bumped to the next odd number first, so `next_prime(2)` is 3.
/// Returns `None` when no such prime fits in a `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = if n % 2 == 0 { n.checked_add(1)? } else { n };
    while !is_prime(candidate) {
        candidate = candidate.checked_add(2)?;
    }
    Some(candidate)
}

/// Keeps `n` when it is already prime, otherwise moves to [`next_prime`].
#[must_use]
pub fn normalize_capacity(n: usize) -> Option<usize> {
    if is_prime(n) { Some(n) } else { next_prime(n) }
}
