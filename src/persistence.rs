use std::collections::HashSet;

/// Capability check consumed by the mapper: whether instances of a target
/// type are tracked by an external persistence layer. Only the boolean
/// answer crosses this seam; the persistence machinery itself stays
/// outside the crate.
pub trait PersistenceOracle: Send + Sync {
    fn is_managed(&self, type_id: &str) -> bool;
}

/// Set-backed oracle for wiring and tests.
pub struct StaticOracle {
    managed: HashSet<String>,
}

impl StaticOracle {
    pub fn new<I, S>(managed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            managed: managed.into_iter().map(Into::into).collect(),
        }
    }
}

impl PersistenceOracle for StaticOracle {
    fn is_managed(&self, type_id: &str) -> bool {
        self.managed.contains(type_id)
    }
}
