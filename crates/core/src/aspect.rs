//! Output aspect modes offered by the meme generator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Orientation of the generated image, sent to the service as
/// `selectedSize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectMode {
    /// 1024x1920 portrait.
    #[default]
    Vertical,
    /// 1920x1024 landscape.
    Horizontal,
    /// 1024x1024.
    Square,
}

impl AspectMode {
    /// All modes in the order they are offered to the user.
    pub const ALL: [AspectMode; 3] = [
        AspectMode::Vertical,
        AspectMode::Horizontal,
        AspectMode::Square,
    ];

    /// Wire name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectMode::Vertical => "vertical",
            AspectMode::Horizontal => "horizontal",
            AspectMode::Square => "square",
        }
    }

    /// Pixel dimensions `(width, height)` the service renders for this mode.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            AspectMode::Vertical => (1024, 1920),
            AspectMode::Horizontal => (1920, 1024),
            AspectMode::Square => (1024, 1024),
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{} ({w}x{h})", self.as_str())
    }
}

impl FromStr for AspectMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown aspect mode '{s}'. Must be one of: vertical, horizontal, square"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_vertical() {
        assert_eq!(AspectMode::default(), AspectMode::Vertical);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&AspectMode::Horizontal).unwrap();
        assert_eq!(json, "\"horizontal\"");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Square".parse::<AspectMode>().unwrap(), AspectMode::Square);
        assert_eq!(" vertical ".parse::<AspectMode>().unwrap(), AspectMode::Vertical);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!("panorama".parse::<AspectMode>().is_err());
    }

    #[test]
    fn dimensions_match_orientation() {
        assert_eq!(AspectMode::Vertical.dimensions(), (1024, 1920));
        assert_eq!(AspectMode::Horizontal.dimensions(), (1920, 1024));
        assert_eq!(AspectMode::Square.dimensions(), (1024, 1024));
    }

    #[test]
    fn display_includes_dimensions() {
        assert_eq!(AspectMode::Vertical.to_string(), "vertical (1024x1920)");
    }
}
