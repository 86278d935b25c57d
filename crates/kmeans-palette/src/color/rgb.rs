//! 8-bit RGB color sample.

/// A single 8-bit RGB color.
///
/// Used both as the clustering input (one per pixel) and as the stored
/// palette entry after centroids are rounded back to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Create a color from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from an `[r, g, b]` byte triple.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Returns the color as an `[r, g, b]` byte triple.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in RGB space.
    #[inline]
    pub fn distance_squared(self, other: Rgb8) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Channel values as floats, for centroid arithmetic.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Round a floating point centroid to the nearest integer color.
    ///
    /// Channels are clamped into `[0, 255]` first, then rounded half up.
    #[inline]
    pub fn from_f32_rounded(c: [f32; 3]) -> Self {
        let round = |v: f32| (v.clamp(0.0, 255.0) + 0.5).floor() as u8;
        Self::new(round(c[0]), round(c[1]), round(c[2]))
    }

    /// Squared distance between this color and a floating point centroid.
    #[inline]
    pub(crate) fn distance_squared_f32(self, c: &[f32; 3]) -> f32 {
        let dr = self.r as f32 - c[0];
        let dg = self.g as f32 - c[1];
        let db = self.b as f32 - c[2];
        dr * dr + dg * dg + db * db
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(color: Rgb8) -> Self {
        color.to_bytes()
    }
}
