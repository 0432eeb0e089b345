//! Regionen, die im Grenzdatensatz mehrfach oder inkonsistent vorkommen.
//!
//! Berlin steht dort sowohl als Stadtstaat als auch als Menge von Bezirken.
//! Für die Karte bleibt genau ein Polygon mit dem kanonischen Schlüssel übrig,
//! alle Teilgebiete werden entfernt. Weitere Fälle sind reine Tabelleneinträge.

use serde_derive::{Serialize, Deserialize};

use crate::ags::Ags;
use crate::grenzen::{GrenzEigenschaften, Grenze};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZusammengesetzteRegion {
    /// kanonischer Schlüssel, z.B. "11000"
    pub ags: String,
    pub name: String,
    /// Typ, den das kanonische Polygon erhält (nie "bundesland")
    pub typ: String,
    pub ausschluss: Ausschluss,
}

/// Kriterien für Teilgebiete, die aus der Karte entfernt werden.
/// Jedes gesetzte Kriterium reicht allein für den Ausschluss.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ausschluss {
    #[serde(default)]
    pub name_enthaelt: Option<String>,
    #[serde(default)]
    pub partof_enthaelt: Option<String>,
    #[serde(default)]
    pub typen: Vec<String>,
    #[serde(default)]
    pub ags_praefix: Option<String>,
}

impl ZusammengesetzteRegion {

    pub fn berlin() -> Self {
        Self {
            ags: "11000".to_string(),
            name: "Berlin".to_string(),
            typ: "kreisfreie Stadt".to_string(),
            ausschluss: Ausschluss {
                name_enthaelt: Some("Berlin".to_string()),
                partof_enthaelt: Some("Berlin".to_string()),
                typen: vec!["bezirk".to_string(), "stadtteil".to_string()],
                ags_praefix: Some("11".to_string()),
            },
        }
    }

    pub fn schluessel(&self) -> Option<Ags> {
        Ags::parse(&self.ags)
    }

    pub fn ist_kanonisch(&self, e: &GrenzEigenschaften) -> bool {
        e.name() == self.name && e.ags() == self.ags
    }

    pub fn ist_ausgeschlossen(&self, e: &GrenzEigenschaften) -> bool {
        if self.ist_kanonisch(e) {
            return false;
        }
        let a = &self.ausschluss;
        let enthaelt = |feld: &str, muster: &Option<String>| {
            muster.as_deref().map_or(false, |m| !m.is_empty() && feld.contains(m))
        };
        enthaelt(e.name(), &a.name_enthaelt)
            || enthaelt(e.partof(), &a.partof_enthaelt)
            || a.typen.iter().any(|t| t == e.typ())
            || a.ags_praefix.as_deref().map_or(false, |p| {
                !p.is_empty() && e.ags().starts_with(p) && e.ags() != self.ags
            })
    }
}

/// Sucht zu einem Polygon die zugehörige Sonderregel anhand des Namens.
/// Der Schlüssel auf der Geometrie selbst ist für diese Regionen unzuverlässig.
pub fn regel_fuer<'a>(e: &GrenzEigenschaften, regeln: &'a [ZusammengesetzteRegion]) -> Option<&'a ZusammengesetzteRegion> {
    regeln.iter().find(|r| e.name() == r.name)
}

/// Wendet alle Sonderregeln an: das erste kanonische Polygon jeder Regel wird
/// auf Typ und Schlüssel der Regel gesetzt, alle Teilgebiete und Duplikate fallen weg.
pub fn sonderfaelle_anwenden(
    grenzen: Vec<Grenze>,
    regeln: &[ZusammengesetzteRegion],
    log: &mut Vec<String>,
) -> Vec<Grenze> {

    let anzahl_vorher = grenzen.len();
    let mut gefunden = vec![false; regeln.len()];

    let ergebnis = grenzen.into_iter().filter_map(|mut g| {
        if let Some(i) = regeln.iter().position(|r| r.ist_kanonisch(&g.properties)) {
            if gefunden[i] {
                log.push(format!("removing duplicate {} feature (ags {})", regeln[i].name, regeln[i].ags));
                return None;
            }
            gefunden[i] = true;
            g.properties.typ = Some(regeln[i].typ.clone());
            g.properties.ags = Some(regeln[i].ags.clone());
            return Some(g);
        }
        if regeln.iter().any(|r| r.ist_ausgeschlossen(&g.properties)) {
            return None;
        }
        Some(g)
    }).collect::<Vec<_>>();

    for (r, ok) in regeln.iter().zip(gefunden.iter()) {
        if !ok {
            log.push(format!("ERROR: no feature named {:?} with ags {} found", r.name, r.ags));
        }
    }

    log.push(format!(
        "special regions: {anzahl_vorher} features -> {} (removed {})",
        ergebnis.len(),
        anzahl_vorher - ergebnis.len(),
    ));

    ergebnis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grenze(ags: &str, name: &str, typ: &str, partof: Option<&str>) -> Grenze {
        Grenze {
            typ: "Feature".to_string(),
            properties: GrenzEigenschaften {
                ags: Some(ags.to_string()),
                name: Some(name.to_string()),
                typ: Some(typ.to_string()),
                partof: partof.map(String::from),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn berliner_daten() -> Vec<Grenze> {
        vec![
            grenze("11", "Berlin", "bundesland", None),
            grenze("11000", "Berlin", "bundesland", None),
            grenze("11001", "Mitte", "bezirk", Some("Berlin")),
            grenze("11002", "Friedrichshain-Kreuzberg", "bezirk", None),
            grenze("", "Berlin-Spandau", "stadtteil", None),
            grenze("11011", "Lichtenberg", "kreisfreie Stadt", None),
            grenze("12", "Brandenburg", "bundesland", None),
            grenze("12051", "Brandenburg an der Havel", "kreisfreie Stadt", None),
            grenze("1001", "Flensburg", "kreisfreie Stadt", None),
        ]
    }

    #[test]
    fn berlin_wird_zusammengefasst() {
        let mut log = Vec::new();
        let regeln = vec![ZusammengesetzteRegion::berlin()];
        let g = sonderfaelle_anwenden(berliner_daten(), &regeln, &mut log);

        let namen = g.iter().map(|g| g.properties.name()).collect::<Vec<_>>();
        assert_eq!(namen, vec!["Berlin", "Brandenburg", "Brandenburg an der Havel", "Flensburg"]);

        let berlin = &g[0];
        assert_eq!(berlin.properties.typ(), "kreisfreie Stadt");
        assert_eq!(berlin.properties.ags(), "11000");
        assert!(!berlin.ist_bundesland());

        // kein Schlüssel mit Berliner Präfix außer dem kanonischen
        assert!(g.iter().all(|g| !g.properties.ags().starts_with("11") || g.properties.ags() == "11000"));
    }

    #[test]
    fn doppeltes_berlin_wird_entfernt() {
        let mut log = Vec::new();
        let regeln = vec![ZusammengesetzteRegion::berlin()];
        let mut daten = berliner_daten();
        daten.push(grenze("11000", "Berlin", "kreisfreie Stadt", None));
        let g = sonderfaelle_anwenden(daten, &regeln, &mut log);
        assert_eq!(g.iter().filter(|g| g.properties.name() == "Berlin").count(), 1);
        assert!(log.iter().any(|l| l.contains("duplicate")));
    }

    #[test]
    fn fehlendes_berlin_wird_gemeldet() {
        let mut log = Vec::new();
        let regeln = vec![ZusammengesetzteRegion::berlin()];
        let daten = vec![grenze("11001", "Mitte", "bezirk", None), grenze("1001", "Flensburg", "kreisfreie Stadt", None)];
        let g = sonderfaelle_anwenden(daten, &regeln, &mut log);
        assert_eq!(g.len(), 1);
        assert!(log.iter().any(|l| l.starts_with("ERROR")));
    }

    #[test]
    fn regel_ueber_namen() {
        let regeln = vec![ZusammengesetzteRegion::berlin()];
        let g = grenze("", "Berlin", "kreisfreie Stadt", None);
        assert_eq!(regel_fuer(&g.properties, &regeln).and_then(|r| r.schluessel()), Some(Ags::from(11000)));
        let g = grenze("1001", "Flensburg", "kreisfreie Stadt", None);
        assert!(regel_fuer(&g.properties, &regeln).is_none());
    }
}
