use std::fmt;

use serde::Serialize;

use crate::core::error::{HostError, HostResult};

/// 8-bit RGBA color as handed to the backend.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 255)
    }

    /// Unpacks a 24-bit `0xRRGGBB` triplet. Alpha is fully opaque.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// `hue` in degrees, `saturation` and `value` in [0, 1].
    pub fn from_hsv(hue: f32, saturation: f32, value: f32, alpha: u8) -> Self {
        let channel = |n: f32| {
            let k = (n + hue / 60.0).rem_euclid(6.0);
            let k = k.min(4.0 - k).clamp(0.0, 1.0);
            ((value - value * saturation * k) * 255.0) as u8
        };
        Self::new(channel(5.0), channel(3.0), channel(1.0), alpha)
    }

    /// Inverse of [`Color::from_hsv`]; hue in degrees.
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta < 0.00001 || max <= 0.0 {
            return (0.0, 0.0, max);
        }

        let saturation = delta / max;
        let mut hue = if r >= max {
            (g - b) / delta
        } else if g >= max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }

        (hue, saturation, max)
    }

    /// Hue, saturation and brightness all normalized to [0, 1].
    pub fn to_hsb(self) -> (f32, f32, f32) {
        let (h, s, v) = self.to_hsv();
        (h / 360.0, s, v)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Convention used to read color-accepting arguments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsb,
}

impl ColorMode {
    pub fn id(self) -> i64 {
        match self {
            Self::Rgb => 0,
            Self::Hsb => 1,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Self::Rgb),
            1 => Some(Self::Hsb),
            _ => None,
        }
    }

    fn upper_bound(self) -> f64 {
        match self {
            Self::Rgb => 255.0,
            Self::Hsb => 1.0,
        }
    }
}

/// Range check for already-numeric color arguments. A single RGB argument
/// is exempt from the upper bound since it may be a packed hex triplet.
pub fn check_color_args(
    name: &str,
    mode: ColorMode,
    args: &[f64],
) -> HostResult<()> {
    let hex_exempt = mode == ColorMode::Rgb && args.len() == 1;
    let max = mode.upper_bound();

    for &value in args {
        if value.is_nan() || value < 0.0 || (!hex_exempt && value > max) {
            return Err(HostError::out_of_range(
                name,
                format!("expects color values between 0 and {}", max),
            ));
        }
    }

    Ok(())
}

/// Builds a color from 1 to 4 numeric components read with `mode`.
pub fn parse_color(
    name: &str,
    mode: ColorMode,
    args: &[f64],
) -> HostResult<Color> {
    if !(1..=4).contains(&args.len()) {
        return Err(HostError::arg_count(name, "1 to 4", args.len()));
    }
    check_color_args(name, mode, args)?;

    let color = match mode {
        ColorMode::Rgb => {
            let c = |v: f64| v as u8;
            match *args {
                // Packed triplet; bits above 0xFFFFFF are ignored.
                [v] if v > 255.0 => {
                    Color::from_hex((v as u64 & 0xFF_FFFF) as u32)
                }
                [v] => Color::gray(c(v)),
                [v, a] => Color::new(c(v), c(v), c(v), c(a)),
                [r, g, b] => Color::new(c(r), c(g), c(b), 255),
                [r, g, b, a] => Color::new(c(r), c(g), c(b), c(a)),
                _ => unreachable!(),
            }
        }
        ColorMode::Hsb => {
            let alpha = |a: f64| (a * 255.0) as u8;
            let hsb = |h: f64, s: f64, b: f64, a: u8| {
                Color::from_hsv((h * 360.0) as f32, s as f32, b as f32, a)
            };
            match *args {
                [v] => hsb(0.0, 0.0, v, 255),
                [v, a] => hsb(0.0, 0.0, v, alpha(a)),
                [h, s, b] => hsb(h, s, b, 255),
                [h, s, b, a] => hsb(h, s, b, alpha(a)),
                _ => unreachable!(),
            }
        }
    };

    Ok(color)
}

/// Endpoint accepted by [`lerp_color`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSource {
    Color(Color),
    Hex(f64),
}

impl ColorSource {
    fn resolve(self, name: &str, mode: ColorMode) -> HostResult<Color> {
        match self {
            Self::Color(color) => Ok(color),
            Self::Hex(value) => {
                if value.is_nan() || value < 0.0 || value > 16_777_215.0 {
                    return Err(HostError::out_of_range(
                        name,
                        "expects a packed hex color between 0x000000 and 0xFFFFFF",
                    ));
                }
                let packed = Color::from_hex(value as u32);
                Ok(match mode {
                    ColorMode::Rgb => packed,
                    ColorMode::Hsb => {
                        let unit = |v: u8| v as f32 / 255.0;
                        Color::from_hsv(
                            unit(packed.r) * 360.0,
                            unit(packed.g),
                            unit(packed.b),
                            255,
                        )
                    }
                })
            }
        }
    }
}

/// Per-channel linear interpolation. `t` is not clamped; channels saturate
/// at the ends of the byte range.
pub fn lerp_color(
    name: &str,
    mode: ColorMode,
    from: ColorSource,
    to: ColorSource,
    t: f64,
) -> HostResult<Color> {
    let from = from.resolve(name, mode)?;
    let to = to.resolve(name, mode)?;
    let t = t as f32;
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;

    Ok(Color::new(
        mix(from.r, to.r),
        mix(from.g, to.g),
        mix(from.b, to.b),
        mix(from.a, to.a),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(args: &[f64]) -> Color {
        parse_color("fill", ColorMode::Rgb, args).unwrap()
    }

    fn hsb(args: &[f64]) -> Color {
        parse_color("fill", ColorMode::Hsb, args).unwrap()
    }

    #[test]
    fn rgb_components_pass_through() {
        for v in [0.0, 1.0, 17.0, 128.0, 254.0, 255.0] {
            assert_eq!(
                rgb(&[v, 255.0 - v, v, 255.0 - v]),
                Color::new(v as u8, (255.0 - v) as u8, v as u8, (255.0 - v) as u8)
            );
        }
        assert_eq!(rgb(&[10.9, 20.2, 30.7]), Color::new(10, 20, 30, 255));
    }

    #[test]
    fn rgb_arity_forms() {
        assert_eq!(rgb(&[200.0]), Color::new(200, 200, 200, 255));
        assert_eq!(rgb(&[200.0, 100.0]), Color::new(200, 200, 200, 100));
        assert_eq!(rgb(&[1.0, 2.0, 3.0]), Color::new(1, 2, 3, 255));
    }

    #[test]
    fn single_large_rgb_argument_is_hex() {
        assert_eq!(
            rgb(&[0x112233 as f64]),
            Color::new(0x11, 0x22, 0x33, 255)
        );
        assert_eq!(rgb(&[256.0]), Color::new(0x00, 0x01, 0x00, 255));
    }

    #[test]
    fn hex_wider_than_32_bits_keeps_the_low_triplet() {
        assert_eq!(
            rgb(&[0x1_0011_2233_u64 as f64]),
            Color::new(0x11, 0x22, 0x33, 255)
        );
        assert_eq!(
            rgb(&[0xAB_FF11_2233_u64 as f64]),
            Color::new(0x11, 0x22, 0x33, 255)
        );
    }

    #[test]
    fn hex_exemption_only_applies_to_single_rgb_argument() {
        assert!(matches!(
            parse_color("fill", ColorMode::Rgb, &[256.0, 10.0]),
            Err(HostError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_color("fill", ColorMode::Rgb, &[-1.0]),
            Err(HostError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_color("fill", ColorMode::Hsb, &[2.0]),
            Err(HostError::OutOfRange { .. })
        ));
    }

    #[test]
    fn hsb_bounds_are_unit_interval() {
        assert!(parse_color("fill", ColorMode::Hsb, &[1.0, 1.0, 1.0, 1.0]).is_ok());
        assert!(matches!(
            parse_color("fill", ColorMode::Hsb, &[0.5, 1.0, 1.0, 255.0]),
            Err(HostError::OutOfRange { .. })
        ));
    }

    #[test]
    fn bad_arity_is_reported() {
        assert!(matches!(
            parse_color("fill", ColorMode::Rgb, &[]),
            Err(HostError::ArgCount { got: 0, .. })
        ));
        assert!(matches!(
            parse_color("fill", ColorMode::Rgb, &[1.0; 5]),
            Err(HostError::ArgCount { got: 5, .. })
        ));
    }

    #[test]
    fn hsb_cyan() {
        assert_eq!(hsb(&[0.5, 1.0, 1.0]), Color::new(0, 255, 255, 255));
        assert_eq!(hsb(&[0.0, 1.0, 1.0, 0.5]), Color::new(255, 0, 0, 127));
    }

    #[test]
    fn hsb_single_argument_is_brightness() {
        assert_eq!(hsb(&[1.0]), Color::new(255, 255, 255, 255));
        assert_eq!(hsb(&[0.0]), Color::new(0, 0, 0, 255));
        assert_eq!(hsb(&[1.0, 1.0]), Color::new(255, 255, 255, 255));
    }

    #[test]
    fn hsb_round_trip_stays_close() {
        let circular = |a: f32, b: f32| {
            let d = (a - b).abs();
            d.min(1.0 - d)
        };

        for hi in 0..20 {
            let h = hi as f64 / 20.0;
            for s in [0.5, 0.75, 1.0] {
                for v in [0.5, 0.75, 1.0] {
                    let (h2, s2, v2) = hsb(&[h, s, v]).to_hsb();
                    assert!(circular(h as f32, h2) < 0.01, "h {h} -> {h2}");
                    assert!((s as f32 - s2).abs() < 0.02, "s {s} -> {s2}");
                    assert!((v as f32 - v2).abs() < 0.01, "v {v} -> {v2}");
                }
            }
        }
    }

    #[test]
    fn lerp_is_per_channel_and_unclamped() {
        let black = ColorSource::Color(Color::new(0, 0, 0, 255));
        let white = ColorSource::Hex(0xFFFFFF as f64);

        assert_eq!(
            lerp_color("lerpColor", ColorMode::Rgb, black, white, 0.5).unwrap(),
            Color::new(127, 127, 127, 255)
        );
        assert_eq!(
            lerp_color("lerpColor", ColorMode::Rgb, black, white, 2.0).unwrap(),
            Color::new(255, 255, 255, 255)
        );
        assert_eq!(
            lerp_color("lerpColor", ColorMode::Rgb, black, white, -1.0).unwrap(),
            Color::new(0, 0, 0, 255)
        );
    }

    #[test]
    fn lerp_hex_follows_color_mode() {
        let red = ColorSource::Hex(0xFF0000 as f64);
        let endpoint =
            lerp_color("lerpColor", ColorMode::Hsb, red, red, 0.0).unwrap();
        // Bytes read as h = 1, s = 0, b = 0.
        assert_eq!(endpoint, Color::new(0, 0, 0, 255));
    }

    #[test]
    fn display_matches_script_output() {
        assert_eq!(Color::new(1, 2, 3, 4).to_string(), "Color(1, 2, 3, 4)");
    }
}
