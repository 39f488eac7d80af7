use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::probe::Probe;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthError {
    #[error("Probe '{0}' is registered more than once")]
    DuplicateProbe(String),

    #[error("Probe name '{0}' is not a single URL path segment")]
    InvalidProbeName(String),
}

/// Immutable set of probes, finalized at startup and shared across requests.
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    probes: Arc<HashMap<String, Probe>>,
}

impl ProbeRegistry {
    pub fn builder() -> ProbeRegistryBuilder {
        ProbeRegistryBuilder::default()
    }

    /// `readiness` and `liveness`, neither with any checks.
    pub fn standard() -> Self {
        let probes = [Probe::new("readiness"), Probe::new("liveness")]
            .into_iter()
            .map(|probe| (probe.name().to_string(), probe))
            .collect();

        Self {
            probes: Arc::new(probes),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Probe> {
        self.probes.get(name)
    }

    /// Registered probe names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.probes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ProbeRegistryBuilder {
    probes: Vec<Probe>,
}

impl ProbeRegistryBuilder {
    pub fn probe(mut self, probe: Probe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn build(self) -> Result<ProbeRegistry, HealthError> {
        let mut probes = HashMap::with_capacity(self.probes.len());

        for probe in self.probes {
            let name = probe.name().to_string();
            if !is_path_segment(&name) {
                return Err(HealthError::InvalidProbeName(name));
            }
            if probes.contains_key(&name) {
                return Err(HealthError::DuplicateProbe(name));
            }
            probes.insert(name, probe);
        }

        Ok(ProbeRegistry {
            probes: Arc::new(probes),
        })
    }
}

fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name != "."
        && name != ".."
}
