mod types;

pub use types::{DefinitionExpansion, ExpandError};

use crate::cron::CronExpr;
use crate::model::{EventDefinition, Occurrence};
use crate::timezone::TimezoneTable;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Expander : transforme des définitions cron en occurrences datées.
///
/// Pur et sans état partagé : une même instance peut servir plusieurs appels
/// concurrents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expander {
    table: TimezoneTable,
}

impl Expander {
    pub fn new(table: TimezoneTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TimezoneTable {
        &self.table
    }

    /// Zone d'affichage pour un décalage ; repli (journalisé) si inconnu.
    pub fn resolve_zone(&self, offset_minutes: i32) -> Tz {
        let resolution = self.table.resolve(offset_minutes);
        if resolution.fallback {
            warn!(
                offset_minutes,
                fallback = resolution.zone.name(),
                "unsupported timezone offset, using fallback zone"
            );
        }
        resolution.zone
    }

    /// Déplie chaque définition séparément, dans l'ordre d'entrée.
    pub fn expand_each(
        &self,
        definitions: &[EventDefinition],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset_minutes: i32,
    ) -> Vec<DefinitionExpansion> {
        let tz = self.resolve_zone(offset_minutes);
        self.expand_each_in(definitions, start, end, tz)
    }

    /// Variante de [`Expander::expand_each`] avec une zone déjà résolue.
    pub fn expand_each_in(
        &self,
        definitions: &[EventDefinition],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
    ) -> Vec<DefinitionExpansion> {
        if start > end {
            debug!(%start, %end, "window start after end, nothing to expand");
        }
        definitions
            .iter()
            .map(|def| self.expand_one(def, start, end, tz))
            .collect()
    }

    /// Occurrences de toutes les définitions, triées par instant (tri stable).
    pub fn expand(
        &self,
        definitions: &[EventDefinition],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset_minutes: i32,
    ) -> Vec<Occurrence> {
        let tz = self.resolve_zone(offset_minutes);
        self.expand_in(definitions, start, end, tz)
    }

    pub fn expand_in(
        &self,
        definitions: &[EventDefinition],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
    ) -> Vec<Occurrence> {
        let mut out: Vec<Occurrence> = self
            .expand_each_in(definitions, start, end, tz)
            .into_iter()
            .filter_map(|exp| exp.outcome.ok())
            .flatten()
            .collect();
        out.sort_by_key(|o| o.utc());
        out
    }

    fn expand_one(
        &self,
        def: &EventDefinition,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: Tz,
    ) -> DefinitionExpansion {
        let expr = match CronExpr::parse(&def.cron) {
            Ok(expr) => expr,
            Err(source) => {
                warn!(
                    event_id = %def.id,
                    pattern = %def.cron,
                    error = %source,
                    "skipping event with invalid recurrence pattern"
                );
                return DefinitionExpansion {
                    source_id: def.id,
                    outcome: Err(ExpandError::InvalidPattern {
                        pattern: def.cron.clone(),
                        source,
                    }),
                };
            }
        };

        // la fin de fenêtre borne l'itération : tout est tiré
        let occurrences = expr
            .iter_between(tz, start, end)
            .map(|instant| Occurrence::from_definition(def, instant))
            .collect();

        DefinitionExpansion {
            source_id: def.id,
            outcome: Ok(occurrences),
        }
    }
}

/// Dépliage avec la table livrée.
pub fn expand(
    definitions: &[EventDefinition],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset_minutes: i32,
) -> Vec<Occurrence> {
    Expander::default().expand(definitions, start, end, offset_minutes)
}
