use std::sync::{PoisonError, RwLock};
use crate::config::BackendConfig;
use crate::errors::{HarnessError, HarnessResult};

/// Named backends the harness can target, plus the current selection.
pub struct BackendRegistry {
    backends: Vec<BackendConfig>,
    selected: RwLock<String>,
}

impl BackendRegistry {
    pub fn new(backends: Vec<BackendConfig>, selected: &str) -> Self {
        Self {
            backends,
            selected: RwLock::new(selected.to_string()),
        }
    }

    pub fn selected(&self) -> String {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switches the target backend. Takes effect at the next step of a running suite.
    pub fn select(&self, name: &str) -> HarnessResult<()> {
        if !self.backends.iter().any(|b| b.name == name) {
            return Err(HarnessError::UnknownBackend(name.to_string()));
        }
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = name.to_string();
        tracing::info!("Selected backend {}", name);
        Ok(())
    }

    /// Returns the selected backend's name and base URL.
    pub fn resolve(&self) -> HarnessResult<(String, String)> {
        let name = self.selected();
        let backend = self
            .backends
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| HarnessError::UnknownBackend(name.clone()))?;
        let base_url = backend
            .base_url()
            .ok_or_else(|| HarnessError::BackendUnresolved(name.clone()))?;
        Ok((name, base_url))
    }
}
