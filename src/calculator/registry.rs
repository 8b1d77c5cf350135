use std::collections::HashMap;
use std::sync::Arc;

use crate::calculator::{AfCalculator, ExactModelConfig};
use crate::exact::{BruteForceDiploid, ReferenceDiploidExact};
use crate::AfCalcError;

/// Metadata describing a registered calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorInfo {
    /// Registry key.
    pub name: String,
    /// Human-readable description.
    pub description: String,
}

/// Registry of available allele-frequency calculators.
#[derive(Debug, Default)]
pub struct CalculatorRegistry {
    entries: HashMap<String, Arc<dyn AfCalculator>>,
}

impl CalculatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry holding every built-in calculator configured with `config`.
    pub fn with_defaults(config: ExactModelConfig) -> Self {
        let mut registry = Self::new();
        registry.register(ReferenceDiploidExact::new(config.clone()));
        registry.register(BruteForceDiploid::new(config));
        registry
    }

    /// Register a calculator under its name and return a shared handle.
    pub fn register<C>(&mut self, calculator: C) -> Arc<dyn AfCalculator>
    where
        C: AfCalculator + 'static,
    {
        let arc: Arc<dyn AfCalculator> = Arc::new(calculator);
        self.entries.insert(arc.name().to_string(), Arc::clone(&arc));
        arc
    }

    /// Retrieve a calculator by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn AfCalculator>, AfCalcError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AfCalcError::UnknownCalculator(name.to_string()))
    }

    /// List registered calculators, sorted by name.
    pub fn list(&self) -> Vec<CalculatorInfo> {
        let mut infos: Vec<CalculatorInfo> = self
            .entries
            .values()
            .map(|calculator| CalculatorInfo {
                name: calculator.name().to_string(),
                description: calculator.description().to_string(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}
