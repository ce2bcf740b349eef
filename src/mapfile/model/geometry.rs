//! Colors, extents and points

use serde::Serialize;

/// An RGB color with optional alpha. A component of -1 means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub alpha: i32,
}

impl Color {
    pub const UNSET: Color = Color {
        red: -1,
        green: -1,
        blue: -1,
        alpha: 0,
    };
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: i32, green: i32, blue: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0,
        }
    }

    pub const fn rgba(red: i32, green: i32, blue: i32, alpha: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// All three channels are set.
    pub fn is_set(&self) -> bool {
        self.red != -1 && self.green != -1 && self.blue != -1
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(text: &str) -> Option<Color> {
        let digits = text.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| i32::from_str_radix(&digits[range], 16).ok();
        Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::UNSET
    }
}

/// An axis-aligned extent. Every bound is -1 while unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Rect {
    pub const UNSET: Rect = Rect {
        minx: -1.0,
        miny: -1.0,
        maxx: -1.0,
        maxy: -1.0,
    };

    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// Minimum strictly below maximum on both axes.
    pub fn is_valid(&self) -> bool {
        self.minx < self.maxx && self.miny < self.maxy
    }

    pub fn is_set(&self) -> bool {
        *self != Rect::UNSET
    }
}

impl Default for Rect {
    fn default() -> Self {
        Rect::UNSET
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
