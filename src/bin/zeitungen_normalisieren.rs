//! Erzeugt `public/zeitungen_by_ags.json` aus dem Rohregister.
//!
//! Ohne Argumente; alle Pfade sind relativ zum Arbeitsverzeichnis,
//! aufgerufen wird aus dem Projektverzeichnis.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use zeitungskarte::konfiguration::NormalisierungsKonfiguration;
use zeitungskarte::{konsole, normalisieren};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if std::env::args().len() > 1 {
        tracing::warn!("arguments are ignored, paths are relative to the working directory");
    }

    let konfiguration = NormalisierungsKonfiguration::default();
    let mut log = Vec::new();
    let ergebnis = normalisieren::ausfuehren(&konfiguration, Path::new("."), &mut log);
    konsole::log_alle(&log);

    match ergebnis {
        Ok(s) => tracing::info!(regionen = s.regionen, zeitungen = s.zeitungen_gesamt, "normalization complete"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        },
    }
}
