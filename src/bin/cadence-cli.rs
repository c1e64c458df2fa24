#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use cadence::{
    agenda::{filter_by_title, group_by_day},
    expander::Expander,
    ics::{export_ics_in, IcsOptions},
    io,
    notification::{ReminderRenderer, TextReminder},
    rule::{RecurrenceRule, Repeat},
    timezone::TimezoneTable,
};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de dépliage d'événements récurrents (cron)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de définitions (JSON ou CSV)
    #[arg(long, global = true, default_value = "events.json")]
    events: String,

    /// Décalage du fuseau d'affichage, en minutes
    #[arg(long, global = true, default_value_t = 180, allow_hyphen_values = true)]
    offset: i32,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Déplier les occurrences sur une fenêtre
    Expand {
        /// Début (RFC3339 ou YYYY-MM-DD), maintenant par défaut
        #[arg(long)]
        from: Option<String>,
        /// Fin exclue ; sinon `from + days`
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = 7)]
        days: i64,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Agenda regroupé par jour
    Agenda {
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value_t = 30)]
        days: i64,
        /// Filtre sur le titre
        #[arg(long)]
        query: Option<String>,
    },

    /// Rappels à envoyer sur une fenêtre
    Reminders {
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value_t = 1)]
        days: i64,
    },

    /// Exporter un calendrier .ics
    Ics {
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value_t = 365)]
        days: i64,
        #[arg(long)]
        out: String,
        /// Nombre maximal de VEVENT par définition
        #[arg(long, default_value_t = 1000)]
        max_events: usize,
    },

    /// Lister les fuseaux pris en charge
    Timezones,

    /// Construire une expression cron depuis une date
    Rule {
        /// Première occurrence (RFC3339 avec décalage)
        #[arg(long)]
        date: String,
        /// day | week | month
        #[arg(long)]
        every: Option<Repeat>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let expander = Expander::new(TimezoneTable::bundled());

    let code = match cli.cmd {
        Commands::Expand {
            from,
            to,
            days,
            out_json,
            out_csv,
        } => {
            let tz = expander.resolve_zone(cli.offset);
            let defs = io::load_definitions(&cli.events)?;
            let start = start_point(from.as_deref(), tz)?;
            let end = match to {
                Some(raw) => io::parse_point(&raw, tz)?,
                None => start + Duration::days(days),
            };
            let expansions = expander.expand_each_in(&defs, start, end, tz);
            let skipped: Vec<_> = expansions.iter().filter(|e| e.is_skipped()).collect();
            let mut occurrences: Vec<_> = expansions
                .iter()
                .flat_map(|e| e.occurrences().iter().cloned())
                .collect();
            occurrences.sort_by_key(|o| o.utc());
            if let Some(path) = out_json {
                io::export_occurrences_json(path, &occurrences)?;
            }
            if let Some(path) = out_csv {
                io::export_occurrences_csv(path, &occurrences)?;
            }
            for o in &occurrences {
                println!(
                    "{} | {} | {} | {}",
                    o.source_id,
                    o.instant.to_rfc3339(),
                    o.kind,
                    o.title
                );
            }
            if skipped.is_empty() {
                0
            } else {
                for e in &skipped {
                    if let Err(err) = &e.outcome {
                        eprintln!("skipped event {}: {err}", e.source_id);
                    }
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Agenda { from, days, query } => {
            let tz = expander.resolve_zone(cli.offset);
            let defs = io::load_definitions(&cli.events)?;
            let start = start_point(from.as_deref(), tz)?;
            let occurrences = expander.expand_in(&defs, start, start + Duration::days(days), tz);
            let today = Utc::now().with_timezone(&tz).date_naive();
            let mut sections = group_by_day(&occurrences, tz, today);
            if let Some(q) = query {
                sections = filter_by_title(sections, &q);
            }
            for section in &sections {
                println!("{}", section.label());
                for o in &section.entries {
                    println!("  {} {}", o.instant.with_timezone(&tz).format("%H:%M"), o.title);
                }
            }
            0
        }
        Commands::Reminders { from, days } => {
            let tz = expander.resolve_zone(cli.offset);
            let defs = io::load_definitions(&cli.events)?;
            let start = start_point(from.as_deref(), tz)?;
            let reminders =
                expander.reminders_between_in(&defs, start, start + Duration::days(days), tz);
            let renderer = TextReminder;
            for r in &reminders {
                println!("{} | {}", r.notice_at.to_rfc3339(), renderer.render(r));
            }
            0
        }
        Commands::Ics {
            from,
            days,
            out,
            max_events,
        } => {
            let tz = expander.resolve_zone(cli.offset);
            let defs = io::load_definitions(&cli.events)?;
            let start = start_point(from.as_deref(), tz)?;
            let opts = IcsOptions {
                max_events_per_definition: max_events,
                ..IcsOptions::default()
            };
            let ics = export_ics_in(
                &expander,
                &defs,
                start,
                start + Duration::days(days),
                tz,
                &opts,
            );
            io::write_atomic(&out, ics.as_bytes())?;
            println!("Calendar written to {out}");
            0
        }
        Commands::Timezones => {
            for e in expander.table().entries() {
                println!("{:>5} | {} | {}", e.offset_minutes, e.zone.name(), e.label);
            }
            0
        }
        Commands::Rule { date, every } => {
            let date = DateTime::parse_from_rfc3339(&date)
                .with_context(|| format!("invalid RFC3339 date: {date}"))?;
            let rule = match every {
                Some(repeat) => RecurrenceRule::repeating(date, repeat),
                None => RecurrenceRule::once(date),
            };
            println!("{}", rule.expression());
            0
        }
    };

    std::process::exit(code);
}

fn start_point(raw: Option<&str>, tz: Tz) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => io::parse_point(raw, tz),
        None => Ok(Utc::now()),
    }
}
