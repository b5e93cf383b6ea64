//! Engine Configuration

/// Tree-wide configuration. One config per tree, supplied at construction.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Pixel density for the rounding pass. Zero disables rounding entirely.
    pub point_scale_factor: f32,
    /// Row direction and stretched lines by default, shrink factor 1.
    pub use_web_defaults: bool,
    /// Keep the pre-2018 stretch sizing of content-sized containers.
    pub use_legacy_stretch_behaviour: bool,
    /// Reuse computed flex basis within a single layout generation.
    pub experimental_web_flex_basis: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            experimental_web_flex_basis: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_point_scale_factor(mut self, factor: f32) -> Self {
        self.point_scale_factor = factor;
        self
    }

    pub fn with_web_defaults(mut self, enabled: bool) -> Self {
        self.use_web_defaults = enabled;
        self
    }

    pub fn with_legacy_stretch_behaviour(mut self, enabled: bool) -> Self {
        self.use_legacy_stretch_behaviour = enabled;
        self
    }

    pub fn with_experimental_web_flex_basis(mut self, enabled: bool) -> Self {
        self.experimental_web_flex_basis = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.point_scale_factor, 1.0);
        assert!(!config.use_web_defaults);
        assert!(!config.use_legacy_stretch_behaviour);
        assert!(!config.experimental_web_flex_basis);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_point_scale_factor(2.0)
            .with_web_defaults(true)
            .with_experimental_web_flex_basis(true);
        assert_eq!(config.point_scale_factor, 2.0);
        assert!(config.use_web_defaults);
        assert!(config.experimental_web_flex_basis);
    }
}
