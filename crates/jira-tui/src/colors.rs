//! Default dark palette on a black background.

use ratatui::style::Color;

pub const BG: Color = Color::Black;
pub const SURFACE_HIGH: Color = Color::Rgb(0x2b, 0x2a, 0x2a);

pub const ON_SURFACE: Color = Color::Rgb(0xe6, 0xe1, 0xe1);
pub const SUBTEXT: Color = Color::Rgb(0xcb, 0xc5, 0xca);
pub const OUTLINE: Color = Color::DarkGray;

pub const PRIMARY: Color = Color::Rgb(0xcb, 0xc4, 0xcb);
