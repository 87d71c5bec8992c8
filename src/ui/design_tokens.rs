// SPDX-License-Identifier: MPL-2.0
//! Design tokens: palette, spacing, sizing, typography, borders.
//!
//! ```
//! use orthoview::ui::design_tokens::{palette, spacing};
//!
//! let padding = spacing::MD; // 16px
//! let accent = palette::PRIMARY_500;
//! # let _ = (padding, accent);
//! ```

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    pub const PRIMARY_500: Color = Color::from_rgb(0.3, 0.6, 0.9);

    // Semantic colors
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

// ============================================================================
// Spacing Scale (8px baseline grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0; // 0.5 unit
    pub const XS: f32 = 8.0; // 1 unit
    pub const SM: f32 = 12.0; // 1.5 units
    pub const MD: f32 = 16.0; // 2 units
    pub const LG: f32 = 24.0; // 3 units
}

// ============================================================================
// Sizing Scale
// ============================================================================

pub mod sizing {
    pub const BUTTON_HEIGHT: f32 = 36.0;
    pub const PLAN_INPUT_WIDTH: f32 = 160.0;
    pub const SIDE_PANEL_WIDTH: f32 = 420.0;
    pub const TOAST_WIDTH: f32 = 320.0;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    /// Medium title - App name, prominent labels
    pub const TITLE_MD: f32 = 20.0;

    /// Small title - Section headers
    pub const TITLE_SM: f32 = 18.0;

    /// Standard body - Most UI text, labels, descriptions
    pub const BODY: f32 = 14.0;

    /// Caption - Status line, table headers
    pub const CAPTION: f32 = 12.0;
}

// ============================================================================
// Border Scale
// ============================================================================

pub mod border {
    pub const WIDTH_SM: f32 = 1.0;
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

// ============================================================================
// Compile-time Validation
// ============================================================================

const _: () = {
    assert!(spacing::XS > 0.0);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(typography::TITLE_MD > typography::TITLE_SM);
    assert!(typography::TITLE_SM > typography::BODY);
    assert!(typography::BODY > typography::CAPTION);

    assert!(border::WIDTH_MD > border::WIDTH_SM);
    assert!(sizing::SIDE_PANEL_WIDTH > sizing::PLAN_INPUT_WIDTH);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_scale_is_consistent() {
        assert_eq!(spacing::MD, spacing::XS * 2.0);
        assert_eq!(spacing::LG, spacing::MD * 1.5);
    }
}
