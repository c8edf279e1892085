//! Theme and Colors
//!
//! The clinic's palette - soft greens and warm earth tones with a saffron
//! accent, matching the herbal branding of the site this replaces.

use ratatui::style::Color;

// ============================================================================
// Clinic Palette
// ============================================================================

/// Primary herbal green (headers, accents)
pub const HERBAL_GREEN: Color = Color::Rgb(76, 140, 87);

/// Deep leaf green (borders, selected tabs)
pub const LEAF_DARK: Color = Color::Rgb(46, 92, 56);

/// Pale leaf tint (highlights)
pub const LEAF_LIGHT: Color = Color::Rgb(168, 208, 158);

/// Saffron accent (call-to-action, carousel indicator)
pub const SAFFRON: Color = Color::Rgb(235, 166, 58);

/// Sandalwood background tint
pub const SANDALWOOD: Color = Color::Rgb(222, 202, 166);

// ============================================================================
// Role Colors
// ============================================================================

/// Patient portal accent
pub const PATIENT_TEAL: Color = Color::Rgb(80, 170, 170);

/// Doctor portal accent
pub const DOCTOR_BLUE: Color = Color::Rgb(100, 140, 220);

/// Admin panel accent
pub const ADMIN_MAROON: Color = Color::Rgb(170, 80, 90);

// ============================================================================
// UI Colors
// ============================================================================

/// Visitor chat text
pub const VISITOR_GREEN: Color = Color::Rgb(130, 220, 130);

/// Assistant chat text
pub const ASSISTANT_GOLD: Color = Color::Rgb(220, 190, 110);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(240, 200, 90);

/// Particle glyph color
pub const PARTICLE_GREEN: Color = Color::Rgb(90, 130, 95);
