//! Colors and background paint modes
//!
//! Colors are parsed from the CSS-style strings callers put in configuration
//! (`"red"`, `"#ff8800"`, `"rgba(0, 0, 0, 0.5)"`). Parsing is strict: anything
//! unrecognized yields `None` so callers can keep their previous value.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, map_res, opt, verify},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::PaintError;

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const LIME: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::rgba8(r, g, b, 255)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels rounded to 8 bits
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Parse a CSS-style color string
    ///
    /// Accepts a subset of named colors, `#rgb`, `#rgba`, `#rrggbb`,
    /// `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`. Matching is
    /// case-insensitive and ignores surrounding whitespace.
    pub fn parse(input: &str) -> Option<Color> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let parsed: IResult<&str, Color> =
            all_consuming(alt((parse_hex_color, parse_rgb_color)))(input);
        match parsed {
            Ok((_, color)) => Some(color),
            Err(_) => parse_named_color(input),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl FromStr for Color {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| PaintError::InvalidColor(s.to_string()))
    }
}

// ============================================================================
// Color Grammar
// ============================================================================

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), |hex| {
        u8::from_str_radix(hex, 16)
    })(input)
}

/// One hex digit, widened to a byte (`f` -> `ff`)
fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |hex| {
        u8::from_str_radix(hex, 16).map(|v| v * 17)
    })(input)
}

/// Parse hex color: #RGB, #RGBA, #RRGGBB or #RRGGBBAA
fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    preceded(
        char('#'),
        alt((
            map(
                tuple((hex_byte, hex_byte, hex_byte, hex_byte)),
                |(r, g, b, a)| Color::rgba8(r, g, b, a),
            ),
            map(tuple((hex_byte, hex_byte, hex_byte)), |(r, g, b)| {
                Color::rgba8(r, g, b, 255)
            }),
            map(
                tuple((hex_nibble, hex_nibble, hex_nibble, hex_nibble)),
                |(r, g, b, a)| Color::rgba8(r, g, b, a),
            ),
            map(tuple((hex_nibble, hex_nibble, hex_nibble)), |(r, g, b)| {
                Color::rgba8(r, g, b, 255)
            }),
        )),
    )(input)
}

/// A finite number with optional surrounding whitespace
fn channel(input: &str) -> IResult<&str, f32> {
    let (input, _) = multispace0(input)?;
    let (input, value) = verify(float, |v: &f32| v.is_finite())(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, value))
}

/// Parse rgb(r, g, b) or rgba(r, g, b, a); channels clamp to 0-255, alpha to 0-1
fn parse_rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = alt((tag_no_case("rgba"), tag_no_case("rgb")))(input)?;
    let (input, _) = char('(')(input)?;
    let (input, r) = channel(input)?;
    let (input, _) = char(',')(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = char(',')(input)?;
    let (input, b) = channel(input)?;
    let (input, a) = opt(preceded(char(','), channel))(input)?;
    let (input, _) = char(')')(input)?;

    let byte = |v: f32| v.clamp(0.0, 255.0) / 255.0;
    let alpha = a.map_or(1.0, |a| a.clamp(0.0, 1.0));
    Ok((input, Color::rgba(byte(r), byte(g), byte(b), alpha)))
}

/// Parse named colors
fn parse_named_color(name: &str) -> Option<Color> {
    let hex = match name.to_ascii_lowercase().as_str() {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "lime" => 0x00FF00,
        "green" => 0x008000,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "cyan" | "aqua" => 0x00FFFF,
        "magenta" | "fuchsia" => 0xFF00FF,
        "gray" | "grey" => 0x808080,
        "silver" => 0xC0C0C0,
        "maroon" => 0x800000,
        "olive" => 0x808000,
        "navy" => 0x000080,
        "teal" => 0x008080,
        "purple" => 0x800080,
        "orange" => 0xFFA500,
        "pink" => 0xFFC0CB,
        "brown" => 0xA52A2A,
        _ => return None,
    };
    Some(Color::from_hex(hex))
}

/// How the background is painted before each frame
///
/// An empty string selects [`Background::None`] and the literal
/// `"transparent"` selects [`Background::Transparent`]; neither fills.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Background {
    #[default]
    None,
    Transparent,
    Color(Color),
}

impl Background {
    /// Parse a background specification, `None` if it is malformed
    pub fn parse(input: &str) -> Option<Background> {
        let s = input.trim();
        if s.is_empty() {
            return Some(Background::None);
        }
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Background::Transparent);
        }
        Color::parse(s).map(Background::Color)
    }

    /// The color to fill the surface with, if any
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Background::Color(color) => Some(*color),
            Background::None | Background::Transparent => None,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::None => Ok(()),
            Background::Transparent => f.write_str("transparent"),
            Background::Color(color) => fmt::Display::fmt(color, f),
        }
    }
}

impl FromStr for Background {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Background::parse(s).ok_or_else(|| PaintError::InvalidColor(s.to_string()))
    }
}

impl From<Color> for Background {
    fn from(color: Color) -> Self {
        Background::Color(color)
    }
}
