//! Table figée des fuseaux proposés à l'utilisateur.
//!
//! La clé est le décalage en minutes enregistré côté API (`+180` pour Moscou).
//! Un décalage absent de la table retombe sur le fuseau de repli au lieu
//! d'échouer.

use chrono_tz::{America, Asia, Etc, Europe, Pacific, Tz};

/// Une entrée de la table : décalage saisi, zone IANA, libellé affiché.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneEntry {
    pub offset_minutes: i32,
    pub zone: Tz,
    pub label: &'static str,
}

const fn entry(offset_minutes: i32, zone: Tz, label: &'static str) -> TimezoneEntry {
    TimezoneEntry {
        offset_minutes,
        zone,
        label,
    }
}

/// Fuseaux pris en charge, triés par décalage croissant.
pub const SUPPORTED_TIMEZONES: &[TimezoneEntry] = &[
    entry(-720, Etc::GMTPlus12, "Îles Baker et Howland (États-Unis) −12:00"),
    entry(-660, Pacific::Pago_Pago, "Samoa américaines, Pago Pago −11:00"),
    entry(-600, Pacific::Honolulu, "Hawaï (États-Unis), Honolulu −10:00"),
    entry(-570, Pacific::Marquesas, "Îles Marquises (Polynésie française) −09:30"),
    entry(-540, America::Anchorage, "Alaska (États-Unis), Anchorage −09:00"),
    entry(-480, America::Los_Angeles, "Los Angeles, Seattle, Vancouver −08:00"),
    entry(-420, America::Denver, "Denver, Calgary, Edmonton −07:00"),
    entry(-360, America::Chicago, "Chicago, Mexico, San José (Costa Rica) −06:00"),
    entry(-300, America::New_York, "New York, Toronto, Lima, Bogota −05:00"),
    entry(-240, America::Santiago, "Santiago (Chili), Caracas, La Paz −04:00"),
    entry(-210, America::St_Johns, "Saint-Jean (Terre-Neuve, Canada) −03:30"),
    entry(-180, America::Argentina::Buenos_Aires, "Buenos Aires, Brasilia, Montevideo −03:00"),
    entry(0, Europe::London, "Londres, Dublin, Lisbonne ±00:00"),
    entry(60, Europe::Berlin, "Paris, Berlin, Rome, Madrid +01:00"),
    entry(120, Europe::Kaliningrad, "Kaliningrad +02:00"),
    entry(180, Europe::Moscow, "Moscou, Saint-Pétersbourg +03:00"),
    entry(300, Asia::Yekaterinburg, "Iekaterinbourg +05:00"),
];

/// Fuseau utilisé quand le décalage demandé n'est pas dans la table.
pub const DEFAULT_FALLBACK: Tz = Tz::UTC;

/// Résultat d'une résolution : la zone retenue et si c'est un repli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneResolution {
    pub zone: Tz,
    pub fallback: bool,
}

/// Table immuable décalage → zone, partageable sans verrou.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneTable {
    entries: &'static [TimezoneEntry],
    fallback: Tz,
}

impl Default for TimezoneTable {
    fn default() -> Self {
        Self::bundled()
    }
}

impl TimezoneTable {
    /// Table livrée avec l'application, repli sur UTC.
    pub const fn bundled() -> Self {
        Self {
            entries: SUPPORTED_TIMEZONES,
            fallback: DEFAULT_FALLBACK,
        }
    }

    pub const fn new(entries: &'static [TimezoneEntry], fallback: Tz) -> Self {
        Self { entries, fallback }
    }

    pub fn entries(&self) -> &'static [TimezoneEntry] {
        self.entries
    }

    pub fn fallback(&self) -> Tz {
        self.fallback
    }

    pub fn find(&self, offset_minutes: i32) -> Option<&'static TimezoneEntry> {
        self.entries
            .iter()
            .find(|e| e.offset_minutes == offset_minutes)
    }

    pub fn resolve(&self, offset_minutes: i32) -> ZoneResolution {
        match self.find(offset_minutes) {
            Some(e) => ZoneResolution {
                zone: e.zone,
                fallback: false,
            },
            None => ZoneResolution {
                zone: self.fallback,
                fallback: true,
            },
        }
    }
}
