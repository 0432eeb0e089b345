use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_derive::{Serialize, Deserialize};

use crate::karte::Farbskala;
use crate::sonderfaelle::ZusammengesetzteRegion;

/// Wurzel der veröffentlichten Seite
pub const SITE: &str = "https://tifa365.github.io";
/// Pfad-Präfix, unter dem die Datendateien ausgeliefert werden
pub const BASE_PATH: &str = "/papertrail";

pub const GRENZEN_DATEI: &str = "geodata.js";
pub const ZEITUNGEN_DATEI: &str = "zeitungen_by_ags.json";

pub fn daten_url(datei: &str) -> String {
    format!("{SITE}{}/{datei}", BASE_PATH.trim_end_matches('/'))
}

/// Zeitungsname -> bereinigter Verlagsname
pub type Bereinigungstabelle = BTreeMap<String, String>;

/// Tabelle aus `data/verlag_bereinigung.json`, beim Build eingebettet
pub fn verlag_bereinigungstabelle() -> Bereinigungstabelle {
    include!(concat!(env!("OUT_DIR"), "/verlag_bereinigung.rs"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalisierungsKonfiguration {
    /// Rohregister, relativ zum Basisverzeichnis des Laufs
    pub eingabe: PathBuf,
    /// Optionale Zweitquelle für fehlende Verlage
    pub anreicherung: PathBuf,
    pub ausgabe: PathBuf,
    /// Kandidaten ab dieser Länge sind Recherchenotizen, keine Verlagsnamen
    pub verlag_max_zeichen: usize,
    pub bereinigung: Bereinigungstabelle,
}

impl Default for NormalisierungsKonfiguration {
    fn default() -> Self {
        Self {
            eingabe: PathBuf::from("archive/zeitungen_by_ags_original.json"),
            anreicherung: PathBuf::from("public/newspaper_data_fixed.json"),
            ausgabe: PathBuf::from("public").join(ZEITUNGEN_DATEI),
            verlag_max_zeichen: 150,
            bereinigung: verlag_bereinigungstabelle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ansicht {
    /// [lat, lon]
    pub zentrum: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// [[süd, west], [nord, ost]], falls keine Geometrie vorhanden ist
    pub grenzen_fallback: [[f64; 2]; 2],
}

impl Default for Ansicht {
    fn default() -> Self {
        Self {
            zentrum: [51.1657, 10.4515],
            zoom: 6.0,
            min_zoom: 1.0,
            max_zoom: 11.0,
            grenzen_fallback: [[47.27, 5.87], [54.94, 15.02]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupKonfiguration {
    pub max_breite: u32,
    /// Teilstrings (ohne Groß-/Kleinschreibung) für Regionen am Nordrand der Karte
    pub noerdliche_muster: Vec<String>,
    pub noerdlicher_versatz: [f64; 2],
}

impl Default for PopupKonfiguration {
    fn default() -> Self {
        Self {
            max_breite: 320,
            noerdliche_muster: ["Nord", "friesland", "schleswig", "holstein", "hamburg", "kiel", "flensburg", "lübeck"]
                .iter().map(|s| s.to_string()).collect(),
            noerdlicher_versatz: [0.0, -25.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KartenKonfiguration {
    pub farbskala: Farbskala,
    pub kreis_rand_farbe: String,
    pub kreis_rand_breite: f64,
    pub land_rand_farbe: String,
    pub land_rand_breite: f64,
    pub land_rand_deckkraft: f64,
    pub hover_deckkraft: f64,
    pub ansicht: Ansicht,
    pub popup: PopupKonfiguration,
    pub sonderfaelle: Vec<ZusammengesetzteRegion>,
}

impl Default for KartenKonfiguration {
    fn default() -> Self {
        Self {
            farbskala: Farbskala::default(),
            kreis_rand_farbe: "#ffffff".to_string(),
            kreis_rand_breite: 0.7,
            land_rand_farbe: "#CCC".to_string(),
            land_rand_breite: 1.0,
            land_rand_deckkraft: 0.5,
            hover_deckkraft: 0.8,
            ansicht: Ansicht::default(),
            popup: PopupKonfiguration::default(),
            sonderfaelle: vec![ZusammengesetzteRegion::berlin()],
        }
    }
}

#[test]
fn bereinigungstabelle_eingebettet() {
    let t = verlag_bereinigungstabelle();
    assert_eq!(t.get("Südkurier").map(String::as_str), Some("Südkurier GmbH"));
    assert_eq!(t.get("Kölnische Rundschau").map(String::as_str), Some("M. DuMont Schauberg"));
    assert!(t.len() >= 40);
}

#[test]
fn daten_url_mit_base_path() {
    assert_eq!(daten_url(ZEITUNGEN_DATEI), "https://tifa365.github.io/papertrail/zeitungen_by_ags.json");
}

#[test]
fn teilweise_konfiguration() {
    let k = serde_json::from_str::<KartenKonfiguration>(
        r##"{ "farbskala": { "keine_daten": "#000000" }, "ansicht": { "zoom": 7 } }"##
    ).unwrap();
    assert_eq!(k.farbskala.keine_daten, "#000000");
    assert_eq!(k.farbskala.grenzen, Farbskala::default().grenzen);
    assert_eq!(k.ansicht.zoom, 7.0);
    assert_eq!(k.ansicht.max_zoom, 11.0);
    assert_eq!(k.kreis_rand_farbe, "#ffffff");
    assert_eq!(k.sonderfaelle, vec![ZusammengesetzteRegion::berlin()]);

    let n = serde_json::from_str::<NormalisierungsKonfiguration>(r#"{ "verlag_max_zeichen": 80 }"#).unwrap();
    assert_eq!(n.verlag_max_zeichen, 80);
    assert_eq!(n.bereinigung, verlag_bereinigungstabelle());
    assert_eq!(n.ausgabe, PathBuf::from("public/zeitungen_by_ags.json"));
}
