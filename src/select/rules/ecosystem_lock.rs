use crate::select::candidate::Candidate;
use crate::select::ecosystem::EcosystemRegistry;
use std::sync::Arc;

/// Excludes lock files of ecosystems detected at the root
///
/// A lock file of an ecosystem with no manifest in the tree is left alone.
#[derive(Debug, Clone)]
pub struct EcosystemLockDetector {
    registry: Arc<EcosystemRegistry>,
}

impl EcosystemLockDetector {
    pub fn new(registry: Arc<EcosystemRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EcosystemRegistry {
        &self.registry
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        match self.registry.lock_owner(candidate.file_name()) {
            Some(ecosystem) => {
                tracing::trace!("{} is a {} lock file", candidate.relative_path(), ecosystem);
                true
            }
            None => false,
        }
    }
}
