//! Analysis configuration.

/// Builder-style configuration for an `Analysis` session.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub(crate) track_recursion: bool,
    pub(crate) assume_unannotated_functions_pure: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            track_recursion: true,
            assume_unannotated_functions_pure: true,
        }
    }

    /// Report `EndlessRecursion` for recursive call-graph nodes.
    pub fn track_recursion(mut self, value: bool) -> Self {
        self.track_recursion = value;
        self
    }

    /// Treat functions missing from the impurity table as pure. When off,
    /// they report `Other`.
    pub fn assume_unannotated_functions_pure(mut self, value: bool) -> Self {
        self.assume_unannotated_functions_pure = value;
        self
    }
}
