//! String hashes and prime helpers used by the probe table.
//!
//! Two unrelated polynomial hashes are needed: `djb2` picks the primary slot
//! and `sdbm` the offset where linear probing starts, so the two rarely
//! coincide for a given key.

/// Bernstein hash: `h = h * 33 + c`, seeded with 5381.
#[inline]
pub fn djb2(key: &str) -> u64 {
    key.bytes().fold(5381u64, |h, c| {
        (h << 5).wrapping_add(h).wrapping_add(u64::from(c))
    })
}

/// SDBM hash: `h = c + (h << 6) + (h << 16) - h` (i.e. `h * 65599 + c`), seeded with 0.
#[inline]
pub fn sdbm(key: &str) -> u64 {
    key.bytes().fold(0u64, |h, c| {
        u64::from(c)
            .wrapping_add(h << 6)
            .wrapping_add(h << 16)
            .wrapping_sub(h)
    })
}

pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= n`, by trial division upward from `n`.
///
/// Returns `None` if no such prime fits in `usize`.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}
