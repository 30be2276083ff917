//! Style: The display attributes attached to every character.
//!
//! A [`Style`] is a small `Copy` bundle of foreground color, background
//! color and [`Modifiers`]. The buffer treats it as opaque: it is stored,
//! compared and handed back, never interpreted. Renderers can convert it to
//! a crossterm [`ContentStyle`].

use bitflags::bitflags;
use crossterm::style::{Attribute, Color, ContentStyle};

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default foreground (white)
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Default background (black)
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

impl From<Rgb> for Color {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use styled_rope::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Modifiers {
    /// Pairs each modifier with the crossterm attribute that renders it.
    const ATTRIBUTES: [(Self, Attribute); 8] = [
        (Self::BOLD, Attribute::Bold),
        (Self::DIM, Attribute::Dim),
        (Self::ITALIC, Attribute::Italic),
        (Self::UNDERLINE, Attribute::Underlined),
        (Self::BLINK, Attribute::SlowBlink),
        (Self::REVERSED, Attribute::Reverse),
        (Self::HIDDEN, Attribute::Hidden),
        (Self::STRIKETHROUGH, Attribute::CrossedOut),
    ];
}

/// Display attributes for a run of text.
///
/// Styles are compared by value; two spans with equal styles render the same.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Style {
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Text modifiers (bold, italic, etc.).
    pub modifiers: Modifiers,
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Style {
    /// Default colors, no modifiers.
    pub const DEFAULT: Self = Self {
        fg: Rgb::DEFAULT_FG,
        bg: Rgb::DEFAULT_BG,
        modifiers: Modifiers::empty(),
    };

    /// Create a style from its parts.
    #[inline]
    pub const fn new(fg: Rgb, bg: Rgb, modifiers: Modifiers) -> Self {
        Self { fg, bg, modifiers }
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<Style> for ContentStyle {
    fn from(style: Style) -> Self {
        let mut content = Self::new();
        content.foreground_color = Some(style.fg.into());
        content.background_color = Some(style.bg.into());
        for (flag, attribute) in Modifiers::ATTRIBUTES {
            if style.modifiers.contains(flag) {
                content.attributes.set(attribute);
            }
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_tuple() {
        let rgb: Rgb = (255, 128, 0).into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_from_hex() {
        let rgb: Rgb = 0x00FF_8000.into();
        assert_eq!(rgb.r, 255);
        assert_eq!(rgb.g, 128);
        assert_eq!(rgb.b, 0);
    }

    #[test]
    fn test_rgb_debug_is_hex() {
        assert_eq!(format!("{:?}", Rgb::new(255, 0, 16)), "#ff0010");
    }

    #[test]
    fn test_style_builder_pattern() {
        let style = Style::default()
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255))
            .with_modifiers(Modifiers::BOLD | Modifiers::ITALIC);

        assert_eq!(style.fg, Rgb::new(255, 0, 0));
        assert_eq!(style.bg, Rgb::new(0, 0, 255));
        assert!(style.modifiers.contains(Modifiers::BOLD));
        assert!(style.modifiers.contains(Modifiers::ITALIC));
        assert_ne!(style, Style::DEFAULT);
    }

    #[test]
    fn test_content_style_conversion() {
        let style = Style::default()
            .with_fg(Rgb::new(1, 2, 3))
            .with_modifiers(Modifiers::BOLD | Modifiers::UNDERLINE);
        let content: ContentStyle = style.into();

        assert_eq!(content.foreground_color, Some(Color::Rgb { r: 1, g: 2, b: 3 }));
        assert_eq!(content.background_color, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
        assert!(content.attributes.has(Attribute::Bold));
        assert!(content.attributes.has(Attribute::Underlined));
        assert!(!content.attributes.has(Attribute::Italic));
    }
}
