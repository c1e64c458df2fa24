use crate::cron::CronError;
use crate::model::{EventId, Occurrence};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("invalid recurrence pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: CronError,
    },
}

/// Résultat du dépliage d'une seule définition.
#[derive(Debug, Clone)]
pub struct DefinitionExpansion {
    pub source_id: EventId,
    pub outcome: Result<Vec<Occurrence>, ExpandError>,
}

impl DefinitionExpansion {
    pub fn is_skipped(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        match &self.outcome {
            Ok(occ) => occ,
            Err(_) => &[],
        }
    }
}
