//! Engine-wide settings shared by every registry of a directory.

/// Default tolerance for comparing fractional chances: half a raw unit.
pub const DEFAULT_EPSILON: f32 = 0.0005;

/// Configuration for the chance engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Tolerance used when checking whether a value is still at its default.
    pub epsilon: f32,
    /// Filter flag a registry starts with and returns to on reset.
    pub allow_rare_by_default: bool,
    /// Skip registries and directories that hold nothing but defaults when saving.
    pub skip_default_on_save: bool,
    /// Write resolved built-in chances back to the owner category.
    pub propagate_builtin: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            allow_rare_by_default: true,
            skip_default_on_save: true,
            propagate_builtin: true,
        }
    }
}

impl EngineConfig {
    /// Set the default-comparison tolerance (negative values are treated as zero).
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    /// Set whether rare variants are allowed by default.
    pub fn with_allow_rare_by_default(mut self, allow: bool) -> Self {
        self.allow_rare_by_default = allow;
        self
    }

    /// Set whether all-default state is skipped when saving.
    pub fn with_skip_default_on_save(mut self, skip: bool) -> Self {
        self.skip_default_on_save = skip;
        self
    }

    /// Set whether built-in chances are written back to the owner category.
    pub fn with_propagate_builtin(mut self, propagate: bool) -> Self {
        self.propagate_builtin = propagate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert!((cfg.epsilon - 0.0005).abs() < f32::EPSILON);
        assert!(cfg.allow_rare_by_default);
        assert!(cfg.skip_default_on_save);
        assert!(cfg.propagate_builtin);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_epsilon(0.005)
            .with_allow_rare_by_default(false)
            .with_skip_default_on_save(false)
            .with_propagate_builtin(false);
        assert!((cfg.epsilon - 0.005).abs() < f32::EPSILON);
        assert!(!cfg.allow_rare_by_default);
        assert!(!cfg.skip_default_on_save);
        assert!(!cfg.propagate_builtin);
    }

    #[test]
    fn epsilon_clamped() {
        let cfg = EngineConfig::default().with_epsilon(-1.0);
        assert_eq!(cfg.epsilon, 0.0);
    }
}
