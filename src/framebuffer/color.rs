//! Pixel colors and shift directions
use embedded_graphics::pixelcolor::BinaryColor;

/// Drawing color for a 1-bit pixel.
///
/// `Invert` flips whatever is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
    Invert = 2,
}

impl Color {
    pub const fn from_bit(on: bool) -> Self {
        if on {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Color::Black),
            1 => Ok(Color::White),
            2 => Ok(Color::Invert),
            other => Err(other),
        }
    }
}

impl From<BinaryColor> for Color {
    fn from(c: BinaryColor) -> Self {
        match c {
            BinaryColor::On => Color::White,
            BinaryColor::Off => Color::Black,
        }
    }
}

/// Direction for `FrameBuffer::shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_match_classic_macros() {
        assert_eq!(Color::Black as u8, 0);
        assert_eq!(Color::White as u8, 1);
        assert_eq!(Color::Invert as u8, 2);
        assert_eq!(Color::try_from(2), Ok(Color::Invert));
        assert_eq!(Color::try_from(7), Err(7));
        assert_eq!(Direction::Right as u8, 3);
    }

    #[test]
    fn binary_color_maps_to_black_and_white() {
        assert_eq!(Color::from(BinaryColor::On), Color::White);
        assert_eq!(Color::from(BinaryColor::Off), Color::Black);
    }
}
