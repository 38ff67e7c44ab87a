//! Status markers printed in front of hook output

use owo_colors::OwoColorize;

/// Text markers
pub struct Icons;

impl Icons {
    /// Run or check succeeded
    pub const STATUS_SUCCESS: &'static str = "[OK]";
    /// Succeeded with reported problems
    pub const STATUS_WARNING: &'static str = "[!]";
    /// Failed
    pub const STATUS_ERROR: &'static str = "[X]";
    /// Informational
    pub const STATUS_INFO: &'static str = "[i]";
    /// A configured hook
    pub const STATUS_HOOK: &'static str = "[*]";
    /// Disabled or not executed
    pub const STATUS_SKIPPED: &'static str = "[-]";
}

/// Status of a line of CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    /// `[OK]`
    Success,
    /// `[!]`
    Warning,
    /// `[X]`
    Error,
    /// `[i]`
    Info,
    /// `[*]`
    Hook,
    /// `[-]`
    Skipped,
}

impl StatusIcon {
    /// Plain marker text
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => Icons::STATUS_SUCCESS,
            Self::Warning => Icons::STATUS_WARNING,
            Self::Error => Icons::STATUS_ERROR,
            Self::Info => Icons::STATUS_INFO,
            Self::Hook => Icons::STATUS_HOOK,
            Self::Skipped => Icons::STATUS_SKIPPED,
        }
    }

    /// Marker colored for a terminal
    #[must_use]
    pub fn colored(&self) -> String {
        let text = self.as_str();
        match self {
            Self::Success => text.green().to_string(),
            Self::Warning => text.yellow().to_string(),
            Self::Error => text.red().to_string(),
            Self::Info | Self::Hook => text.cyan().to_string(),
            Self::Skipped => text.dimmed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(StatusIcon::Success.as_str(), "[OK]");
        assert_eq!(StatusIcon::Error.as_str(), "[X]");
        assert_eq!(StatusIcon::Skipped.as_str(), "[-]");
    }

    #[test]
    fn test_colored_keeps_marker_text() {
        for icon in [
            StatusIcon::Success,
            StatusIcon::Warning,
            StatusIcon::Error,
            StatusIcon::Info,
            StatusIcon::Hook,
            StatusIcon::Skipped,
        ] {
            assert!(icon.colored().contains(icon.as_str()));
        }
    }
}
