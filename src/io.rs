use crate::model::{EventDefinition, EventKind, Occurrence};
use anyhow::{bail, Context};
use chrono::{DateTime, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Réponse de l'API (`{"events": [...]}`) ou simple tableau.
#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionsFile {
    Wrapped { events: Vec<EventDefinition> },
    Bare(Vec<EventDefinition>),
}

/// Charge des définitions depuis un fichier JSON.
pub fn load_definitions_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EventDefinition>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: DefinitionsFile = serde_json::from_slice(&data)
        .with_context(|| format!("parsing definitions from {}", path.display()))?;
    Ok(match file {
        DefinitionsFile::Wrapped { events } => events,
        DefinitionsFile::Bare(events) => events,
    })
}

/// Import CSV: header `id,title,cron,type[,duration]`
pub fn import_definitions_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EventDefinition>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let title = rec.get(1).context("missing title")?.trim();
        let cron = rec.get(2).context("missing cron")?.trim();
        if title.is_empty() {
            bail!("invalid definition row {id}: empty title");
        }
        let id: i64 = id.parse().with_context(|| format!("invalid id: {id}"))?;
        let mut def = EventDefinition::new(id, title, cron);
        if let Some(kind) = rec.get(3) {
            def.kind = EventKind::from(kind);
        }
        if let Some(duration) = rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            def.duration = Some(
                duration
                    .parse()
                    .with_context(|| format!("invalid duration for event {id}"))?,
            );
        }
        out.push(def);
    }
    Ok(out)
}

/// Charge selon l'extension (`.csv` sinon JSON).
pub fn load_definitions<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EventDefinition>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => import_definitions_csv(path),
        _ => load_definitions_json(path),
    }
}

/// Instant RFC3339, ou date `YYYY-MM-DD` prise à minuit dans `tz`.
pub fn parse_point(raw: &str, tz: Tz) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight conversion")?;
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => bail!("midnight does not exist on {date} in {}", tz.name()),
    }
}

/// Export CSV: header `source_id,title,instant,type`
pub fn export_occurrences_csv<P: AsRef<Path>>(
    path: P,
    occurrences: &[Occurrence],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    w.write_record(["source_id", "title", "instant", "type"])?;
    for o in occurrences {
        let id = o.source_id.to_string();
        let instant = o.instant.to_rfc3339();
        w.write_record([id.as_str(), o.title.as_str(), instant.as_str(), o.kind.as_str()])?;
    }
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv buffer: {e}"))?;
    write_atomic(path, &bytes)
}

/// Export JSON (jolie mise en forme)
pub fn export_occurrences_json<P: AsRef<Path>>(
    path: P,
    occurrences: &[Occurrence],
) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(occurrences)?;
    write_atomic(path, &json)
}

/// Écriture atomique : fichier temporaire voisin puis renommage.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
