use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// Edge length of the design grid every cursor is drawn on.
pub const BASE_GRID: u32 = 24;
/// DPI the design grid is rendered at for scale factor 1.
pub const BASE_DPI: u32 = 96;

/// Multiple of the base grid, kept as an exact rational so that
/// `24 * 1.5` never goes through a float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaleFactor {
    num: u32,
    den: u32,
}

impl ScaleFactor {
    pub const fn new(num: u32, den: u32) -> Self {
        assert!(num > 0 && den > 0, "scale factor must be positive");
        let g = gcd(num, den);
        Self {
            num: num / g,
            den: den / g,
        }
    }

    pub const fn whole(n: u32) -> Self {
        Self::new(n, 1)
    }

    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Bitmap edge length at this scale, truncated.
    pub fn pixel_size(self) -> u32 {
        BASE_GRID * self.num / self.den
    }

    pub fn dpi(self) -> u32 {
        BASE_DPI * self.num / self.den
    }

    /// Scales a base-grid value and drops the fractional part.
    pub fn scale(self, base_value: f64) -> u32 {
        let scaled = base_value * self.num as f64 / self.den as f64;
        if scaled <= 0.0 { 0 } else { scaled.trunc() as u32 }
    }

    /// Directory name the rendered bitmaps for this scale live in, e.g. `x1.5`.
    pub fn dir_name(self) -> String {
        format!("x{}", self)
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num % self.den == 0 {
            write!(f, "{}", self.num / self.den)
        } else {
            write!(f, "{}", self.as_f64())
        }
    }
}

impl PartialOrd for ScaleFactor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScaleFactor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.num as u64 * other.den as u64).cmp(&(other.num as u64 * self.den as u64))
    }
}

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Every scale factor a theme can be built at, ascending.
pub const CANONICAL_SCALES: [ScaleFactor; 8] = [
    ScaleFactor::whole(1),
    ScaleFactor::new(3, 2),
    ScaleFactor::whole(2),
    ScaleFactor::new(5, 2),
    ScaleFactor::whole(3),
    ScaleFactor::whole(4),
    ScaleFactor::whole(5),
    ScaleFactor::whole(6),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DensityTier {
    Lo,
    Tv,
    Hd,
    Xhd,
    Xxhd,
    #[default]
    Xxxhd,
}

impl DensityTier {
    pub const ALL: [DensityTier; 6] = [
        DensityTier::Lo,
        DensityTier::Tv,
        DensityTier::Hd,
        DensityTier::Xhd,
        DensityTier::Xxhd,
        DensityTier::Xxxhd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DensityTier::Lo => "lo",
            DensityTier::Tv => "tv",
            DensityTier::Hd => "hd",
            DensityTier::Xhd => "xhd",
            DensityTier::Xxhd => "xxhd",
            DensityTier::Xxxhd => "xxxhd",
        }
    }

    /// How many leading entries of [`CANONICAL_SCALES`] this tier enables.
    pub fn scale_count(self) -> usize {
        match self {
            DensityTier::Lo => 2,
            DensityTier::Tv => 3,
            DensityTier::Hd => 4,
            DensityTier::Xhd => 5,
            DensityTier::Xxhd => 7,
            DensityTier::Xxxhd => 8,
        }
    }

    pub fn scale_factors(self) -> &'static [ScaleFactor] {
        &CANONICAL_SCALES[..self.scale_count()]
    }
}

impl fmt::Display for DensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DensityTier {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| BuildError::InvalidTier { tier: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tier_prefix_lengths() {
        let expected = [
            ("lo", 2),
            ("tv", 3),
            ("hd", 4),
            ("xhd", 5),
            ("xxhd", 7),
            ("xxxhd", 8),
        ];
        for (tier, len) in expected {
            let scales = tier.parse::<DensityTier>().unwrap().scale_factors();
            assert_eq!(scales.len(), len, "tier {}", tier);
            assert_eq!(scales, &CANONICAL_SCALES[..len]);
        }
    }

    #[test]
    fn test_invalid_tier() {
        for bad in ["", "HD", "xxxxhd", "medium", " hd"] {
            match bad.parse::<DensityTier>() {
                Err(BuildError::InvalidTier { tier }) => assert_eq!(tier, bad),
                other => panic!("expected InvalidTier for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_scale_factor_display() {
        let names: Vec<String> = CANONICAL_SCALES.iter().map(|s| s.dir_name()).collect();
        assert_eq!(
            names,
            ["x1", "x1.5", "x2", "x2.5", "x3", "x4", "x5", "x6"]
        );
    }

    #[test]
    fn test_pixel_sizes() {
        let sizes: Vec<u32> = CANONICAL_SCALES.iter().map(|s| s.pixel_size()).collect();
        assert_eq!(sizes, [24, 36, 48, 60, 72, 96, 120, 144]);
        assert_eq!(ScaleFactor::new(3, 2).dpi(), 144);
    }

    #[test]
    fn test_scale_truncates() {
        let two = ScaleFactor::whole(2);
        assert_eq!(two.scale(23.9999), 47);
        assert_eq!(two.scale(3.0), 6);
        assert_eq!(ScaleFactor::new(3, 2).scale(5.0), 7);
        assert_eq!(ScaleFactor::new(5, 2).scale(1.0), 2);
        assert_eq!(ScaleFactor::new(4, 2), ScaleFactor::whole(2));
    }

    proptest! {
        #[test]
        fn prop_canonical_scales_ascending(i in 0usize..7) {
            prop_assert!(CANONICAL_SCALES[i] < CANONICAL_SCALES[i + 1]);
        }

        #[test]
        fn prop_tier_is_prefix(ix in 0usize..6) {
            let tier = DensityTier::ALL[ix];
            let scales = tier.scale_factors();
            prop_assert!(!scales.is_empty());
            prop_assert_eq!(scales, &CANONICAL_SCALES[..scales.len()]);
        }
    }
}
