//! Aufbereitung des Zeitungsregisters für die Karte.
//!
//! Schlüssel werden auf die Form der Grenzdaten gebracht ("01001" -> "1001"),
//! bekannte Recherchenotizen im Verlagsfeld durch saubere Namen ersetzt und
//! leere Verlage optional aus einer Zweitquelle ergänzt. Anzahl, Reihenfolge
//! und Inhalt der Zeitungslisten bleiben ansonsten unverändert.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_derive::{Serialize, Deserialize};
use thiserror::Error;

use crate::ags::Ags;
use crate::konfiguration::{Bereinigungstabelle, NormalisierungsKonfiguration};
use crate::zeitungen::{null_als_default, string_oder_zahl, RohRegister, Zeitung, Zeitungstabelle};

#[derive(Debug, Error)]
pub enum NormalisierungsFehler {
    #[error("{pfad}: Datei nicht lesbar: {quelle}")]
    Lesen { pfad: String, #[source] quelle: std::io::Error },
    #[error("{pfad}: kein gültiges JSON: {quelle}")]
    Json { pfad: String, #[source] quelle: serde_json::Error },
    #[error("ungültiger AGS-Schlüssel {0:?}")]
    UngueltigerSchluessel(String),
    #[error("AGS-Kollision: {erster:?} und {zweiter:?} ergeben beide {ags}")]
    Kollision { ags: Ags, erster: String, zweiter: String },
    #[error("{pfad}: Datei nicht schreibbar: {quelle}")]
    Schreiben { pfad: String, #[source] quelle: std::io::Error },
}

/// Eintrag der Zweitquelle (`newspaper_data_fixed.json`)
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnreicherungsDatensatz {
    #[serde(rename = "AGS", default, deserialize_with = "string_oder_zahl")]
    pub ags: Option<String>,
    #[serde(rename = "Titel", default, deserialize_with = "null_als_default")]
    pub titel: String,
    #[serde(rename = "Besitz/Verlag/Anmerkungen (wenn neu recherchiert)", default, deserialize_with = "null_als_default")]
    pub verlag: String,
}

/// Verlagskandidaten nach (AGS, Zeitungsname)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Anreicherung {
    kandidaten: BTreeMap<(Ags, String), String>,
}

impl Anreicherung {

    /// Bei mehrfachen Einträgen gewinnt der letzte
    pub fn aus_datensaetzen(datensaetze: Vec<AnreicherungsDatensatz>, log: &mut Vec<String>) -> Self {
        let mut kandidaten = BTreeMap::new();
        let mut ohne_ags = 0;
        for d in datensaetze {
            let ags = match d.ags.as_deref().and_then(Ags::parse) {
                Some(s) => s,
                None => { ohne_ags += 1; continue; },
            };
            kandidaten.insert((ags, d.titel), d.verlag);
        }
        if ohne_ags > 0 {
            log.push(format!("WARNING: skipped {ohne_ags} enrichment records without valid AGS"));
        }
        Self { kandidaten }
    }

    pub fn kandidat(&self, ags: Ags, name: &str) -> Option<&str> {
        self.kandidaten.get(&(ags, name.to_string())).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kandidaten.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kandidaten.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistik {
    pub regionen: usize,
    /// Summe der `count`-Felder
    pub zeitungen_gesamt: u64,
    pub eindeutige_namen: usize,
    pub mit_verlag: usize,
    pub ohne_verlag: usize,
    pub mit_website: usize,
    pub ohne_website: usize,
    pub mit_erscheinungsort: usize,
    pub mit_bundesland: usize,
    pub bereinigt: usize,
    pub angereichert: usize,
}

impl Statistik {

    pub fn erheben(tabelle: &Zeitungstabelle) -> Self {
        let alle = || tabelle.values().flat_map(|r| r.zeitungen.iter());
        let mit = |f: fn(&Zeitung) -> Option<&str>| alle().filter(|z| f(z).is_some()).count();
        let mit_verlag = mit(Zeitung::verlag);
        let mit_website = mit(Zeitung::website);
        let eintraege = alle().count();
        Statistik {
            regionen: tabelle.len(),
            zeitungen_gesamt: tabelle.values().map(|r| r.count as u64).sum(),
            eindeutige_namen: alle().map(|z| z.name.as_str()).collect::<BTreeSet<_>>().len(),
            mit_verlag,
            ohne_verlag: eintraege - mit_verlag,
            mit_website,
            ohne_website: eintraege - mit_website,
            mit_erscheinungsort: mit(Zeitung::erscheinungsort),
            mit_bundesland: mit(Zeitung::bundesland),
            bereinigt: 0,
            angereichert: 0,
        }
    }

    pub fn zeilen(&self) -> Vec<String> {
        let p = |n: usize| anteil(n, self.zeitungen_gesamt);
        vec![
            format!("regions: {}", self.regionen),
            format!("total newspaper entries: {}", self.zeitungen_gesamt),
            format!("unique newspapers: {}", self.eindeutige_namen),
            format!("publisher cleaned up: {}", self.bereinigt),
            format!("publisher enriched: {}", self.angereichert),
            format!("with publisher data: {} ({}%)", self.mit_verlag, p(self.mit_verlag)),
            format!("without publisher data: {} ({}%)", self.ohne_verlag, p(self.ohne_verlag)),
            format!("with website: {} ({}%)", self.mit_website, p(self.mit_website)),
            format!("without website: {} ({}%)", self.ohne_website, p(self.ohne_website)),
            format!("with erscheinungsort: {} ({}%)", self.mit_erscheinungsort, p(self.mit_erscheinungsort)),
            format!("with bundesland: {} ({}%)", self.mit_bundesland, p(self.mit_bundesland)),
        ]
    }
}

fn anteil(n: usize, gesamt: u64) -> String {
    if gesamt == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", n as f64 / gesamt as f64 * 100.0)
}

pub fn lese_json<T: DeserializeOwned>(pfad: &Path) -> Result<T, NormalisierungsFehler> {
    let bytes = fs::read(pfad).map_err(|quelle| NormalisierungsFehler::Lesen {
        pfad: pfad.display().to_string(),
        quelle,
    })?;
    let text = crate::decode(bytes);
    serde_json::from_str::<T>(&text).map_err(|quelle| NormalisierungsFehler::Json {
        pfad: pfad.display().to_string(),
        quelle,
    })
}

/// Schreibt erst in eine temporäre Datei und benennt dann um,
/// damit nie eine halbe Tabelle liegen bleibt
pub fn tabelle_schreiben(pfad: &Path, tabelle: &Zeitungstabelle) -> Result<(), NormalisierungsFehler> {
    let fehler = |quelle| NormalisierungsFehler::Schreiben { pfad: pfad.display().to_string(), quelle };
    let json = serde_json::to_string_pretty(tabelle).map_err(|quelle| NormalisierungsFehler::Json {
        pfad: pfad.display().to_string(),
        quelle,
    })?;
    if let Some(dir) = pfad.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(fehler)?;
    }
    let tmp = pfad.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(fehler)?;
    if let Err(quelle) = fs::rename(&tmp, pfad) {
        let _ = fs::remove_file(&tmp);
        return Err(fehler(quelle));
    }
    Ok(())
}

/// "01001" -> 1001; zwei Rohschlüssel mit gleichem Ergebnis sind ein Fehler
pub fn schluessel_normalisieren(roh: RohRegister) -> Result<Zeitungstabelle, NormalisierungsFehler> {
    let mut herkunft = BTreeMap::<Ags, String>::new();
    let mut tabelle = Zeitungstabelle::new();
    for (schluessel, region) in roh {
        let ags = Ags::parse(&schluessel)
            .ok_or_else(|| NormalisierungsFehler::UngueltigerSchluessel(schluessel.clone()))?;
        if let Some(erster) = herkunft.get(&ags) {
            return Err(NormalisierungsFehler::Kollision {
                ags,
                erster: erster.clone(),
                zweiter: schluessel,
            });
        }
        herkunft.insert(ags, schluessel);
        tabelle.insert(ags, region);
    }
    Ok(tabelle)
}

/// Ersetzt den Verlag, wenn der Zeitungsname in der Bereinigungstabelle steht
pub fn verlag_bereinigen(mut zeitung: Zeitung, bereinigung: &Bereinigungstabelle) -> (Zeitung, bool) {
    match bereinigung.get(&zeitung.name).filter(|v| !v.is_empty()) {
        Some(v) => {
            zeitung.verlag = v.clone();
            (zeitung, true)
        },
        None => (zeitung, false),
    }
}

/// Schlüssel normalisieren und Verlage bereinigen. Gibt die Tabelle und
/// die Anzahl bereinigter Einträge zurück.
pub fn normalisieren(
    roh: RohRegister,
    bereinigung: &Bereinigungstabelle,
    log: &mut Vec<String>,
) -> Result<(Zeitungstabelle, usize), NormalisierungsFehler> {

    let mut tabelle = schluessel_normalisieren(roh)?;
    let mut bereinigt = 0;

    for (ags, region) in tabelle.iter_mut() {
        if region.count as usize != region.zeitungen.len() {
            log.push(format!(
                "WARNING: region {ags} ({}) has count {} but {} newspapers",
                region.name, region.count, region.zeitungen.len(),
            ));
        }
        region.zeitungen = std::mem::take(&mut region.zeitungen)
            .into_iter()
            .map(|z| {
                let (z, ersetzt) = verlag_bereinigen(z, bereinigung);
                if ersetzt { bereinigt += 1; }
                z
            })
            .collect();
    }

    log.push(format!("normalized {} region keys, cleaned publisher for {bereinigt} newspapers", tabelle.len()));
    Ok((tabelle, bereinigt))
}

/// Füllt leere Verlage aus der Zweitquelle, sofern der Kandidat kürzer als
/// `max_zeichen` ist. Vorhandene Verlage werden nie überschrieben.
pub fn anreichern(tabelle: &mut Zeitungstabelle, anreicherung: &Anreicherung, max_zeichen: usize) -> usize {
    let mut angereichert = 0;
    for (ags, region) in tabelle.iter_mut() {
        for z in region.zeitungen.iter_mut() {
            if !z.verlag.trim().is_empty() {
                continue;
            }
            let kandidat = match anreicherung.kandidat(*ags, &z.name) {
                Some(k) if !k.is_empty() && k.chars().count() < max_zeichen => k,
                _ => continue,
            };
            z.verlag = kandidat.to_string();
            angereichert += 1;
        }
    }
    angereichert
}

/// Kompletter Lauf: lesen, normalisieren, anreichern, schreiben.
/// Pfade der Konfiguration sind relativ zu `basis`.
pub fn ausfuehren(
    konfiguration: &NormalisierungsKonfiguration,
    basis: &Path,
    log: &mut Vec<String>,
) -> Result<Statistik, NormalisierungsFehler> {

    let eingabe = basis.join(&konfiguration.eingabe);
    log.push(format!("loading {}", eingabe.display()));
    let roh = lese_json::<RohRegister>(&eingabe)?;
    log.push(format!("loaded {} regions", roh.len()));

    let (mut tabelle, bereinigt) = normalisieren(roh, &konfiguration.bereinigung, log)?;

    let anreicherung = basis.join(&konfiguration.anreicherung);
    let angereichert = if anreicherung.is_file() {
        log.push(format!("enriching verlag data from {}", anreicherung.display()));
        let datensaetze = lese_json::<Vec<AnreicherungsDatensatz>>(&anreicherung)?;
        let a = Anreicherung::aus_datensaetzen(datensaetze, log);
        let n = anreichern(&mut tabelle, &a, konfiguration.verlag_max_zeichen);
        log.push(format!("enriched verlag for {n} newspapers ({} candidates)", a.len()));
        n
    } else {
        log.push(format!("{} not found, skipping verlag enrichment", anreicherung.display()));
        0
    };

    let mut statistik = Statistik::erheben(&tabelle);
    statistik.bereinigt = bereinigt;
    statistik.angereichert = angereichert;
    log.extend(statistik.zeilen());

    let ausgabe = basis.join(&konfiguration.ausgabe);
    tabelle_schreiben(&ausgabe, &tabelle)?;
    log.push(format!("written to {}", ausgabe.display()));

    Ok(statistik)
}
