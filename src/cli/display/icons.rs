//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Success icon (builder produced output / resource present)
    pub const SUCCESS: &'static str = "✓";

    /// Warning icon (builder ran but produced nothing)
    pub const WARNING: &'static str = "⚠";

    /// Error icon (resource missing)
    pub const ERROR: &'static str = "✗";

    /// Get icon for a builder based on the artifacts it returned
    pub fn get_builder_icon(artifacts: usize) -> &'static str {
        if artifacts > 0 {
            Self::SUCCESS
        } else {
            Self::WARNING
        }
    }

    /// Get icon for a cluster resource lookup
    pub fn get_presence_icon(exists: bool) -> &'static str {
        if exists {
            Self::SUCCESS
        } else {
            Self::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_builder_icon() {
        assert_eq!(StatusIcon::get_builder_icon(1), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_builder_icon(0), StatusIcon::WARNING);
    }

    #[test]
    fn test_get_presence_icon() {
        assert_eq!(StatusIcon::get_presence_icon(true), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_presence_icon(false), StatusIcon::ERROR);
    }
}
