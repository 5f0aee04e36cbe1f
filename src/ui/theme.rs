//! Design System Theme Constants
//!
//! Colors, spacing and widget styles for the picker window. Dark surfaces,
//! one indigo accent, semantic colors for the status line.
//!
//! # Usage
//! ```rust,ignore
//! use crate::ui::theme;
//!
//! let bg = theme::color::SURFACE;
//! let padding = theme::spacing::MD;
//! ```

use iced::Color;

// =============================================================================
// COLORS
// =============================================================================

pub mod color {
    use super::*;

    /// Window background
    /// Hex: #121215
    pub const BASE: Color = Color::from_rgb(
        0x12 as f32 / 255.0,
        0x12 as f32 / 255.0,
        0x15 as f32 / 255.0,
    );

    /// Header bar, thumbnail tiles
    /// Hex: #1a1a1f
    pub const SURFACE: Color = Color::from_rgb(
        0x1a as f32 / 255.0,
        0x1a as f32 / 255.0,
        0x1f as f32 / 255.0,
    );

    /// Hovered tile
    /// Hex: #2a2a30
    pub const SURFACE_HOVER: Color = Color::from_rgb(
        0x2a as f32 / 255.0,
        0x2a as f32 / 255.0,
        0x30 as f32 / 255.0,
    );

    /// Hex: #3a3a42
    pub const BORDER: Color = Color::from_rgb(
        0x3a as f32 / 255.0,
        0x3a as f32 / 255.0,
        0x42 as f32 / 255.0,
    );

    /// Hex: #f4f4f5
    pub const TEXT_PRIMARY: Color = Color::from_rgb(
        0xf4 as f32 / 255.0,
        0xf4 as f32 / 255.0,
        0xf5 as f32 / 255.0,
    );

    /// Captions
    /// Hex: #a1a1aa
    pub const TEXT_SECONDARY: Color = Color::from_rgb(
        0xa1 as f32 / 255.0,
        0xa1 as f32 / 255.0,
        0xaa as f32 / 255.0,
    );

    /// Placeholders, "Loading..."
    /// Hex: #71717a
    pub const TEXT_MUTED: Color = Color::from_rgb(
        0x71 as f32 / 255.0,
        0x71 as f32 / 255.0,
        0x7a as f32 / 255.0,
    );

    /// Selection accent
    /// Hex: #6366f1
    pub const PRIMARY: Color = Color::from_rgb(
        0x63 as f32 / 255.0,
        0x66 as f32 / 255.0,
        0xf1 as f32 / 255.0,
    );

    /// Hex: #818cf8
    pub const PRIMARY_HOVER: Color = Color::from_rgb(
        0x81 as f32 / 255.0,
        0x8c as f32 / 255.0,
        0xf8 as f32 / 255.0,
    );

    /// Hex: #4f46e5
    pub const PRIMARY_PRESSED: Color = Color::from_rgb(
        0x4f as f32 / 255.0,
        0x46 as f32 / 255.0,
        0xe5 as f32 / 255.0,
    );

    /// Failed thumbnail placeholder
    /// Hex: #ef4444
    pub const ERROR: Color = Color::from_rgb(
        0xef as f32 / 255.0,
        0x44 as f32 / 255.0,
        0x44 as f32 / 255.0,
    );
}

// =============================================================================
// SPACING (4px base unit)
// =============================================================================

pub mod spacing {
    pub const XS: u16 = 4;
    pub const SM: u16 = 8;
    pub const MD: u16 = 12;
}

// =============================================================================
// LAYOUT
// =============================================================================

pub mod layout {
    /// Height taken by the query bar, excluded from the grid viewport
    pub const HEADER_HEIGHT: u32 = 56;

    /// Vertical room for a caption under each thumbnail (two lines of small text)
    pub const CAPTION_HEIGHT: u32 = 36;
}

// =============================================================================
// TYPOGRAPHY
// =============================================================================

pub mod typography {
    pub const SIZE_HEADING: u16 = 18;
    pub const SIZE_BODY: u16 = 14;
    pub const SIZE_SMALL: u16 = 12;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

// =============================================================================
// STYLE HELPERS
// =============================================================================

use iced::widget::{button, container, text_input};
use iced::{Border, Theme};

/// Header bar and placeholder tiles
pub fn container_style(bg: Color) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(bg)),
        border: Border::default(),
        ..Default::default()
    }
}

/// Thumbnail tile - flat until hovered, accent border while pressed
pub fn button_tile(_theme: &Theme, status: button::Status) -> button::Style {
    let (bg, border) = match status {
        button::Status::Active => (color::SURFACE, Color::TRANSPARENT),
        button::Status::Hovered => (color::SURFACE_HOVER, color::PRIMARY_HOVER),
        button::Status::Pressed => (color::SURFACE_HOVER, color::PRIMARY_PRESSED),
        button::Status::Disabled => (color::SURFACE, Color::TRANSPARENT),
    };

    button::Style {
        background: Some(iced::Background::Color(bg)),
        text_color: color::TEXT_SECONDARY,
        border: Border {
            color: border,
            width: 2.0,
            radius: radius::MD.into(),
        },
        ..Default::default()
    }
}

/// "Go" button
pub fn button_primary(_theme: &Theme, status: button::Status) -> button::Style {
    let (bg, text) = match status {
        button::Status::Active => (color::PRIMARY, color::TEXT_PRIMARY),
        button::Status::Hovered => (color::PRIMARY_HOVER, color::TEXT_PRIMARY),
        button::Status::Pressed => (color::PRIMARY_PRESSED, color::TEXT_PRIMARY),
        button::Status::Disabled => (color::SURFACE_HOVER, color::TEXT_MUTED),
    };

    button::Style {
        background: Some(iced::Background::Color(bg)),
        text_color: text,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Query / status field
pub fn text_input_style(_theme: &Theme, status: text_input::Status) -> text_input::Style {
    let (border, value) = match status {
        text_input::Status::Active => (color::BORDER, color::TEXT_PRIMARY),
        text_input::Status::Hovered => (color::TEXT_MUTED, color::TEXT_PRIMARY),
        text_input::Status::Focused => (color::PRIMARY, color::TEXT_PRIMARY),
        text_input::Status::Disabled => (color::BORDER, color::TEXT_MUTED),
    };

    text_input::Style {
        background: iced::Background::Color(color::SURFACE),
        border: Border {
            color: border,
            width: 1.0,
            radius: radius::SM.into(),
        },
        icon: color::TEXT_MUTED,
        placeholder: color::TEXT_MUTED,
        value,
        selection: color::PRIMARY,
    }
}
