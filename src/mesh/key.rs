//! Exact-equality keys for floating-point positions.

use nalgebra::Point3;

/// A hashable key identifying a position by the bit patterns of its coordinates.
///
/// Two positions share a key exactly when their coordinates compare equal
/// with `==`: `-0.0` is folded onto `+0.0` before the bits are taken. There
/// is no tolerance; positions one ulp apart are different keys. NaN
/// coordinates produce keys that only match the identical NaN payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([u64; 3]);

impl PositionKey {
    /// Build the key for a position.
    #[inline]
    pub fn new(p: &Point3<f64>) -> Self {
        Self([canonical_bits(p.x), canonical_bits(p.y), canonical_bits(p.z)])
    }
}

impl From<&Point3<f64>> for PositionKey {
    fn from(p: &Point3<f64>) -> Self {
        Self::new(p)
    }
}

#[inline]
fn canonical_bits(v: f64) -> u64 {
    // -0.0 + 0.0 == +0.0
    (v + 0.0).to_bits()
}
