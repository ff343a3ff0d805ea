// filepath: src/color.rs
//! Color values, parsed from `#hex` strings or X11 names.
//!
//! Name lookup ignores case and spaces, so "DeepSkyBlue" and
//! "deep sky blue" are the same color.

use crate::error::CanvasError;

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);

    /// An opaque color from red, green and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Parses a color specification: `#rgb`, `#rrggbb`, or a named color.
    pub fn parse(spec: &str) -> Result<Color, CanvasError> {
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| CanvasError::UnknownColor(spec.to_string()));
        }
        let key = normalize(spec);
        NAMED
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, color)| *color)
            .ok_or_else(|| CanvasError::UnknownColor(spec.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |c: u8| char::from(c).to_digit(16).map(|d| d as u8);
    match hex.len() {
        // #rgb expands each digit, Tk-style: 0xf becomes 0xff.
        3 => {
            let h = hex.as_bytes();
            let r = digit(h[0])?;
            let g = digit(h[1])?;
            let b = digit(h[2])?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            let h = hex.as_bytes();
            let byte = |i: usize| Some(digit(h[i])? * 16 + digit(h[i + 1])?);
            Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The subset of the X11 color list a Tk canvas user is likely to reach
/// for, keyed by normalized name.
static NAMED: &[(&str, Color)] = &[
    ("aquamarine", Color::rgb(0x7f, 0xff, 0xd4)),
    ("beige", Color::rgb(0xf5, 0xf5, 0xdc)),
    ("black", Color::BLACK),
    ("blue", Color::BLUE),
    ("brown", Color::rgb(0xa5, 0x2a, 0x2a)),
    ("chocolate", Color::rgb(0xd2, 0x69, 0x1e)),
    ("coral", Color::rgb(0xff, 0x7f, 0x50)),
    ("cornflowerblue", Color::rgb(0x64, 0x95, 0xed)),
    ("crimson", Color::rgb(0xdc, 0x14, 0x3c)),
    ("cyan", Color::rgb(0x00, 0xff, 0xff)),
    ("darkgray", Color::rgb(0xa9, 0xa9, 0xa9)),
    ("darkgreen", Color::rgb(0x00, 0x64, 0x00)),
    ("darkorange", Color::rgb(0xff, 0x8c, 0x00)),
    ("darkred", Color::rgb(0x8b, 0x00, 0x00)),
    ("deeppink", Color::rgb(0xff, 0x14, 0x93)),
    ("deepskyblue", Color::rgb(0x00, 0xbf, 0xff)),
    ("dimgray", Color::rgb(0x69, 0x69, 0x69)),
    ("dodgerblue", Color::rgb(0x1e, 0x90, 0xff)),
    ("forestgreen", Color::rgb(0x22, 0x8b, 0x22)),
    ("gold", Color::rgb(0xff, 0xd7, 0x00)),
    ("goldenrod", Color::rgb(0xda, 0xa5, 0x20)),
    ("goldenrod1", Color::rgb(0xff, 0xc1, 0x25)),
    ("gray", Color::rgb(0xbe, 0xbe, 0xbe)),
    ("green", Color::GREEN),
    ("grey", Color::rgb(0xbe, 0xbe, 0xbe)),
    ("hotpink", Color::rgb(0xff, 0x69, 0xb4)),
    ("ivory", Color::rgb(0xff, 0xff, 0xf0)),
    ("khaki", Color::rgb(0xf0, 0xe6, 0x8c)),
    ("lavender", Color::rgb(0xe6, 0xe6, 0xfa)),
    ("lightblue", Color::rgb(0xad, 0xd8, 0xe6)),
    ("lightcyan", Color::rgb(0xe0, 0xff, 0xff)),
    ("lightgray", Color::rgb(0xd3, 0xd3, 0xd3)),
    ("limegreen", Color::rgb(0x32, 0xcd, 0x32)),
    ("magenta", Color::rgb(0xff, 0x00, 0xff)),
    ("maroon", Color::rgb(0xb0, 0x30, 0x60)),
    ("midnightblue", Color::rgb(0x19, 0x19, 0x70)),
    ("navy", Color::rgb(0x00, 0x00, 0x80)),
    ("orange", Color::ORANGE),
    ("orangered", Color::rgb(0xff, 0x45, 0x00)),
    ("orchid", Color::rgb(0xda, 0x70, 0xd6)),
    ("peru", Color::rgb(0xcd, 0x85, 0x3f)),
    ("pink", Color::rgb(0xff, 0xc0, 0xcb)),
    ("plum", Color::rgb(0xdd, 0xa0, 0xdd)),
    ("purple", Color::rgb(0xa0, 0x20, 0xf0)),
    ("red", Color::RED),
    ("royalblue", Color::rgb(0x41, 0x69, 0xe1)),
    ("salmon", Color::rgb(0xfa, 0x80, 0x72)),
    ("seagreen", Color::rgb(0x2e, 0x8b, 0x57)),
    ("sienna", Color::rgb(0xa0, 0x52, 0x2d)),
    ("skyblue", Color::rgb(0x87, 0xce, 0xeb)),
    ("slategray", Color::rgb(0x70, 0x80, 0x90)),
    ("snow", Color::rgb(0xff, 0xfa, 0xfa)),
    ("springgreen", Color::rgb(0x00, 0xff, 0x7f)),
    ("steelblue", Color::rgb(0x46, 0x82, 0xb4)),
    ("tan", Color::rgb(0xd2, 0xb4, 0x8c)),
    ("tomato", Color::rgb(0xff, 0x63, 0x47)),
    ("turquoise", Color::rgb(0x40, 0xe0, 0xd0)),
    ("turquoise1", Color::rgb(0x00, 0xf5, 0xff)),
    ("turquoise2", Color::rgb(0x00, 0xe5, 0xee)),
    ("turquoise3", Color::rgb(0x00, 0xc5, 0xcd)),
    ("turquoise4", Color::rgb(0x00, 0x86, 0x8b)),
    ("violet", Color::rgb(0xee, 0x82, 0xee)),
    ("wheat", Color::rgb(0xf5, 0xde, 0xb3)),
    ("white", Color::WHITE),
    ("yellow", Color::YELLOW),
];
