//! Analysis engine tying the parser, rules, and configuration together.

use tracing::debug;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::engine::EngineError;
use crate::engine::cancel::CancellationToken;
use crate::parser::ParsedFile;
use crate::rules::RuleRegistry;
use crate::rules::api_design::AsyncSuffix;
use crate::rules::reliability::NoBlockingInAsync;

pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(NoBlockingInAsync::new()));
        registry.register(Box::new(AsyncSuffix::new()));

        Self { registry }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut engine = Self::new();
        engine.registry.configure(&config.rules);
        engine
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, file: &ParsedFile) -> Result<Vec<Diagnostic>, EngineError> {
        self.analyze_cancellable(file, &CancellationToken::new())
    }

    pub fn analyze_cancellable(
        &self,
        file: &ParsedFile,
        token: &CancellationToken,
    ) -> Result<Vec<Diagnostic>, EngineError> {
        debug!(
            file = %file.metadata().filename,
            rules = self.registry.len(),
            "analyzing file"
        );

        let diagnostics = self.registry.run_all(file, token)?;

        debug!(
            file = %file.metadata().filename,
            count = diagnostics.len(),
            "analysis complete"
        );

        Ok(diagnostics)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
