//! Derivation configuration.

/// Knobs for one derivation run.
#[derive(Debug, Clone)]
pub struct DeriveConfig {
    /// Stripped from component names to form display names.
    pub component_suffix: String,
    /// Stripped from command names to form constructor names, first match wins.
    pub command_suffixes: Vec<String>,
    /// Emit reactive systems for every component.
    pub emit_reactive: bool,
    /// Emit the end-of-tick clear system and event-systems manifest. When off,
    /// each dispatcher clears its own channel.
    pub emit_clear_system: bool,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            component_suffix: "Component".to_string(),
            command_suffixes: vec!["Cmd".to_string(), "Command".to_string()],
            emit_reactive: true,
            emit_clear_system: true,
        }
    }
}

impl DeriveConfig {
    #[must_use]
    pub fn with_component_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.component_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_command_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_reactive(mut self, emit: bool) -> Self {
        self.emit_reactive = emit;
        self
    }

    #[must_use]
    pub fn with_clear_system(mut self, emit: bool) -> Self {
        self.emit_clear_system = emit;
        self
    }

    /// Display name of a component.
    pub fn component_name<'a>(&self, name: &'a str) -> &'a str {
        crate::naming::strip_suffix(name, std::slice::from_ref(&self.component_suffix))
    }

    /// Constructor name of a command.
    pub fn command_name<'a>(&self, name: &'a str) -> &'a str {
        crate::naming::strip_suffix(name, &self.command_suffixes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DeriveConfig::default();
        assert_eq!(cfg.component_name("HealthComponent"), "Health");
        assert_eq!(cfg.command_name("MoveCmd"), "Move");
        assert!(cfg.emit_reactive);
        assert!(cfg.emit_clear_system);
    }

    #[test]
    fn test_builders() {
        let cfg = DeriveConfig::default()
            .with_component_suffix("Comp")
            .with_command_suffixes(["Request"])
            .with_reactive(false);
        assert_eq!(cfg.component_name("HealthComp"), "Health");
        assert_eq!(cfg.component_name("HealthComponent"), "HealthComponent");
        assert_eq!(cfg.command_name("MoveRequest"), "Move");
        assert_eq!(cfg.command_name("MoveCmd"), "MoveCmd");
        assert!(!cfg.emit_reactive);
    }
}
