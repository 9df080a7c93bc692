//! Map error types

/// Which convention-derived entity kind a map is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Target environments derived from source names
    TargetEnvironment,
    /// Tenants derived from source names
    Tenant,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetEnvironment => write!(f, "target environment"),
            Self::Tenant => write!(f, "tenant"),
        }
    }
}

/// Errors raised by the convention maps
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    /// A lookup was attempted on a map that still has missing entities.
    ///
    /// This is a sequencing error: the caller skipped the "create missing
    /// entities, rebuild the map" step.
    #[error("{kind} entities missing, create them first: {}", missing.join(", "))]
    EntitiesMissing {
        /// Entity kind the map tracks
        kind: EntityKind,
        /// Names that have no existing entity yet, sorted
        missing: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_message_joins_names() {
        let err = MapError::EntitiesMissing {
            kind: EntityKind::TargetEnvironment,
            missing: vec!["Production".to_string(), "Staging".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "target environment entities missing, create them first: Production, Staging"
        );
    }
}
