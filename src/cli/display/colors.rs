//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
        }
    }
}

impl ColorTheme {
    /// Get color based on how many artifacts a builder returned
    pub fn get_builder_color(&self, artifacts: usize) -> TableColor {
        if artifacts > 0 {
            self.success
        } else {
            self.warning
        }
    }

    pub fn get_presence_color(&self, exists: bool) -> TableColor {
        if exists {
            self.success
        } else {
            self.error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_builder_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_builder_color(1), TableColor::Green);
        assert_eq!(theme.get_builder_color(0), TableColor::Yellow);
        assert_eq!(theme.get_presence_color(false), TableColor::Red);
    }
}
