// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration for application navigation.

use std::str::FromStr;

/// Screens the user can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Operation plan scene views.
    #[default]
    Model,
    /// Bone positioning views with point status and error evaluation.
    Positioning,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Model, Screen::Positioning];

    /// Fluent key of the top bar label.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            Screen::Model => "screen-model",
            Screen::Positioning => "screen-positioning",
        }
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "model" => Ok(Screen::Model),
            "positioning" => Ok(Screen::Positioning),
            other => Err(format!("unknown screen '{other}' (expected model or positioning)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_names() {
        assert_eq!("model".parse::<Screen>(), Ok(Screen::Model));
        assert_eq!(" Positioning ".parse::<Screen>(), Ok(Screen::Positioning));
        assert!("editor".parse::<Screen>().is_err());
    }
}
