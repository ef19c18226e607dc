//! Half-open slicing where negative bounds count from the end of the sequence
//! and out-of-range bounds clamp instead of panicking.

/// Resolve one bound against a sequence of length `len`
fn resolve_bound(bound: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if bound < 0 { bound + len_i } else { bound };
    // Clamped into 0..=len, so the cast back is lossless
    usize::try_from(resolved.clamp(0, len_i)).unwrap_or(len)
}

/// `seq[start:end]`, never panicking
///
/// # Examples
///
/// ```
/// use vdj_assess::utils::slicing::clamped_slice;
///
/// assert_eq!(clamped_slice(b"ACGTAC", 0, 3), b"ACG");
/// assert_eq!(clamped_slice(b"ACGTAC", -2, 10), b"AC");
/// assert_eq!(clamped_slice(b"ACGTAC", 4, 2), b"");
/// ```
#[must_use]
pub fn clamped_slice(seq: &[u8], start: i64, end: i64) -> &[u8] {
    let start = resolve_bound(start, seq.len());
    let end = resolve_bound(end, seq.len());
    if end <= start {
        &[]
    } else {
        &seq[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        assert_eq!(clamped_slice(b"TGTGCCAGC", 2, 5), b"TGC");
    }

    #[test]
    fn test_end_past_length() {
        assert_eq!(clamped_slice(b"TGTGCC", 3, 100), b"GCC");
        assert_eq!(clamped_slice(b"TGTGCC", 10, 12), b"");
    }

    #[test]
    fn test_negative_bounds_count_from_end() {
        assert_eq!(clamped_slice(b"TGTGCC", -3, 6), b"GCC");
        assert_eq!(clamped_slice(b"TGTGCC", -3, -1), b"GC");
        // Start before the beginning clamps to 0
        assert_eq!(clamped_slice(b"TGTGCC", -10, 2), b"TG");
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(clamped_slice(b"", -1, 4), b"");
    }
}
