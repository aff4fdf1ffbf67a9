//! Canonical float bit patterns for hashing and change keys.

/// `-0.0` becomes `0.0`; every NaN becomes the one canonical NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Bit pattern of the canonical value. Values that compare equal (and all
/// NaNs) map to the same bits.
pub fn canonical_bits(v: f64) -> u64 {
    canonical_f64(v).to_bits()
}

#[cfg(test)]
mod tests {
    use super::{canonical_bits, canonical_f64};

    #[test]
    fn zero_signs_collapse() {
        assert_eq!(canonical_f64(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(canonical_bits(-0.0), canonical_bits(0.0));
    }

    #[test]
    fn nans_collapse() {
        let other_nan = f64::from_bits(0x7ff8_0000_0000_0001);
        assert!(other_nan.is_nan());
        assert_eq!(canonical_bits(other_nan), canonical_bits(f64::NAN));
        assert_ne!(canonical_bits(1.0), canonical_bits(-1.0));
    }
}
