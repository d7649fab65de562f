//! Cross-platform color values.

/// An RGBA color with channels in `0.0..=1.0`.
///
/// Backends convert this to whatever the native toolkit wants (an ARGB int on
/// Android, a `UIColor` on iOS).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// An opaque color from floating point channels.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, a: 1. }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// An opaque color from 8-bit channels, for the `0xRRGGBB` values native
    /// APIs tend to hand out.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Color {
        Color::rgb(f64::from(r) / 255., f64::from(g) / 255., f64::from(b) / 255.)
    }

    /// Packs the color into the ARGB integer layout used by
    /// `android.graphics.Color`.
    pub fn to_argb8(self) -> u32 {
        let quantize = |c: f64| (c.max(0.).min(1.) * 255.).round() as u32;
        (quantize(self.a) << 24) | (quantize(self.r) << 16) | (quantize(self.g) << 8) | quantize(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing() {
        assert_eq!(Color::rgb(1., 0., 0.).to_argb8(), 0xFF_FF_00_00);
        assert_eq!(Color::rgba(0., 0., 1., 0.).to_argb8(), 0x00_00_00_FF);
        assert_eq!(Color::from_rgb8(0x12, 0x34, 0x56).to_argb8(), 0xFF_12_34_56);
    }
}
