//! Harness configuration.
//!
//! The defaults reproduce the fixed driver behavior. Nothing is read from
//! the environment; callers that want different limits build a config
//! explicitly.

/// Whether report lines carry ANSI color codes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Green for passes, yellow for object-handling problems and notices,
    /// red for failures.
    #[default]
    Always,
    /// Plain text.
    Never,
}

impl ColorMode {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "always" | "on" | "ansi" | "color" => Self::Always,
            "never" | "off" | "plain" | "none" => Self::Never,
            _ => Self::Always,
        }
    }

    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Limits and sizes used by the test bodies, plus report styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub color: ColorMode,
    /// Upper bound on insertions while waiting for a capacity or allocation
    /// change. Keeps arrays with a huge fixed capacity from hanging the run.
    pub growth_poll_limit: usize,
    /// Elements pushed by the "clean up (growth)" test.
    pub cleanup_growth_items: usize,
    /// Elements in containers that get copied or moved.
    pub copy_items: usize,
    /// Elements pushed by the size/index/clear tests.
    pub fill_items: usize,
    /// Elements present when `reserve` is called.
    pub reserve_held_items: usize,
    /// Capacity requested by the `reserve` test.
    pub reserve_capacity: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            growth_poll_limit: 65_536,
            cleanup_growth_items: 1024,
            copy_items: 8,
            fill_items: 100,
            reserve_held_items: 3,
            reserve_capacity: 42,
        }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_growth_poll_limit(mut self, limit: usize) -> Self {
        self.growth_poll_limit = limit.max(2);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_color_modes() {
        assert_eq!(ColorMode::from_str_loose("NEVER"), ColorMode::Never);
        assert_eq!(ColorMode::from_str_loose("plain"), ColorMode::Never);
        assert_eq!(ColorMode::from_str_loose("ansi"), ColorMode::Always);
        assert_eq!(ColorMode::from_str_loose("garbage"), ColorMode::Always);
    }

    #[test]
    fn defaults_match_fixed_driver() {
        let cfg = HarnessConfig::default();
        assert!(cfg.color.enabled());
        assert_eq!(cfg.cleanup_growth_items, 1024);
        assert_eq!(cfg.reserve_capacity, 42);
        assert!(cfg.reserve_held_items < cfg.reserve_capacity);
    }

    #[test]
    fn poll_limit_has_a_floor() {
        let cfg = HarnessConfig::new().with_growth_poll_limit(0);
        assert_eq!(cfg.growth_poll_limit, 2);
    }
}
