//! ANSI palette for the mint look.
//!
//! Coloring here is cosmetic: every code path that prints through this
//! module behaves identically with the escape sequences stripped.

/// The palette used across prompt, listings, and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Reset,
    Bold,
    MintGreen,
    BrightGreen,
    Cyan,
    Blue,
    Magenta,
    Orange,
    Yellow,
    Red,
    Gray,
}

impl Color {
    /// The raw escape sequence for this palette entry.
    pub fn code(self) -> &'static str {
        match self {
            Color::Reset => "\x1b[0m",
            Color::Bold => "\x1b[1m",
            Color::MintGreen => "\x1b[38;5;121m",
            Color::BrightGreen => "\x1b[92m",
            Color::Cyan => "\x1b[36m",
            Color::Blue => "\x1b[34m",
            Color::Magenta => "\x1b[35m",
            Color::Orange => "\x1b[38;5;214m",
            Color::Yellow => "\x1b[33m",
            Color::Red => "\x1b[31m",
            Color::Gray => "\x1b[90m",
        }
    }
}

/// Wrap `text` in a color code and a reset.
pub fn paint(color: Color, text: &str) -> String {
    format!("{}{}{}", color.code(), text, Color::Reset.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_wraps_and_resets() {
        let s = paint(Color::Red, "boom");
        assert!(s.starts_with("\x1b[31m"));
        assert!(s.ends_with("\x1b[0m"));
        assert!(s.contains("boom"));
    }
}
