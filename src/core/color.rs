//! Logical piece colors (separate from Bevy `Color`).
//! Ordinals are stable: tables index fixed arrays by `ColorType::ordinal`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorType {
    #[default]
    Yellow,
    Purple,
    Red,
    Blue,
    Green,
    Pink,
    /// Wildcard; matches any piece and never owns a sprite.
    Any,
}

impl ColorType {
    pub const COUNT: usize = 7;

    pub const ALL: [ColorType; Self::COUNT] = [
        ColorType::Yellow,
        ColorType::Purple,
        ColorType::Red,
        ColorType::Blue,
        ColorType::Green,
        ColorType::Pink,
        ColorType::Any,
    ];

    /// Every color that can be bound to a sprite.
    pub const CONCRETE: [ColorType; Self::COUNT - 1] = [
        ColorType::Yellow,
        ColorType::Purple,
        ColorType::Red,
        ColorType::Blue,
        ColorType::Green,
        ColorType::Pink,
    ];

    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, ColorType::Any)
    }

    /// Next concrete color, wrapping. The wildcard steps to the first concrete color.
    pub fn next_concrete(self) -> Self {
        if self.is_wildcard() {
            return Self::CONCRETE[0];
        }
        Self::CONCRETE[(self.ordinal() + 1) % Self::CONCRETE.len()]
    }

    /// Placeholder tint used when a piece sprite image is missing.
    pub fn tint(self) -> Color {
        match self {
            ColorType::Yellow => Color::srgb(0.95, 0.75, 0.15),
            ColorType::Purple => Color::srgb(0.65, 0.45, 0.95),
            ColorType::Red => Color::srgb(0.90, 0.20, 0.25),
            ColorType::Blue => Color::srgb(0.20, 0.55, 0.90),
            ColorType::Green => Color::srgb(0.20, 0.80, 0.45),
            ColorType::Pink => Color::srgb(0.95, 0.45, 0.70),
            ColorType::Any => Color::WHITE,
        }
    }
}
