use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IN_SCOPE: Color = Color::Green;
pub const UNSURE: Color = Color::Yellow;
