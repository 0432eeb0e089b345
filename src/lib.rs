use wasm_bindgen::prelude::*;
use serde_derive::{Serialize, Deserialize};

use crate::karte::KartenDaten;
use crate::konfiguration::KartenKonfiguration;

pub mod ags;
pub mod zeitungen;
pub mod konfiguration;
pub mod normalisieren;
pub mod grenzen;
pub mod sonderfaelle;
pub mod karte;
pub mod ui;
pub mod konsole;
pub mod laden;

/// Antwort an die Seite: entweder die fertige Karte oder eine Fehlermeldung,
/// die anstelle der Karte eingesetzt wird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LadeErgebnis {
    Karte(KartenDaten),
    Fehler { html: String },
}

impl LadeErgebnis {
    fn fehler(meldung: &str) -> Self {
        crate::konsole::log_fehler(meldung);
        LadeErgebnis::Fehler { html: crate::ui::render_fehler(meldung) }
    }
}

/// Fehlende Felder kommen aus `Default`, ungültiges JSON ergibt die Standardkonfiguration
fn konfiguration_lesen(konfiguration: Option<String>) -> KartenKonfiguration {
    let s = match konfiguration.filter(|s| !s.trim().is_empty()) {
        Some(s) => s,
        None => return KartenKonfiguration::default(),
    };
    match serde_json::from_str::<KartenKonfiguration>(&s) {
        Ok(o) => o,
        Err(e) => {
            crate::konsole::log_warnung(&format!("WARNING: invalid map configuration, using defaults: {e}"));
            KartenKonfiguration::default()
        },
    }
}

pub fn karte_ergebnis(geodaten: &str, zeitungen: &str, k: &KartenKonfiguration) -> LadeErgebnis {
    match crate::laden::karte_aus_texten(geodaten, zeitungen, k) {
        Ok(karte) => {
            crate::konsole::log_alle(&karte.log);
            LadeErgebnis::Karte(karte)
        },
        Err(e) => LadeErgebnis::fehler(&e),
    }
}

/// Baut die Karte aus bereits geladenem Inhalt von `geodata.js`
/// und `zeitungen_by_ags.json`
#[wasm_bindgen]
pub fn karte_berechnen(geodaten: String, zeitungen: String, konfiguration: Option<String>) -> String {
    let k = konfiguration_lesen(konfiguration);
    serde_json::to_string(&karte_ergebnis(&geodaten, &zeitungen, &k)).unwrap_or_default()
}

/// Lädt beide Datendateien vom Server und baut die Karte
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn karte_laden(konfiguration: Option<String>) -> String {
    let k = konfiguration_lesen(konfiguration);
    let ergebnis = match crate::laden::karte_laden(&k).await {
        Ok(karte) => {
            crate::konsole::log_alle(&karte.log);
            LadeErgebnis::Karte(karte)
        },
        Err(e) => LadeErgebnis::fehler(&e),
    };
    serde_json::to_string(&ergebnis).unwrap_or_default()
}

#[wasm_bindgen]
pub fn ui_detail_hinweis() -> String {
    crate::ui::DETAIL_HINWEIS.to_string()
}

#[wasm_bindgen]
pub fn ui_farbe(anzahl: u32, konfiguration: Option<String>) -> String {
    konfiguration_lesen(konfiguration).farbskala.farbe(anzahl).to_string()
}

#[wasm_bindgen]
pub fn ui_legende(konfiguration: Option<String>) -> String {
    crate::ui::render_legende(&konfiguration_lesen(konfiguration).farbskala)
}

pub fn decode(bytes: Vec<u8>) -> String {
    let mut text_decoder = chardetng::EncodingDetector::new();
    let _ = text_decoder.feed(&bytes[..], true);
    let text_decoder = text_decoder.guess(None, true);
    let mut text_decoder = text_decoder.new_decoder();
    let mut decoded = String::with_capacity(bytes.len() * 2);
    let _ = text_decoder.decode_to_string(&bytes[..], &mut decoded, true);
    decoded
}

#[test]
fn decode_utf8() {
    let s = "{ \"Südkurier\": \"Südkurier GmbH\" }";
    assert_eq!(decode(s.as_bytes().to_vec()), s);
}

#[test]
fn karte_aus_skript_und_tabelle() {
    let geodaten = r#"window.geoData = { "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "ags": "1001", "name": "Flensburg", "type": "kreisfreie Stadt" },
          "geometry": { "type": "Polygon", "coordinates": [[[9.4, 54.7], [9.5, 54.7], [9.5, 54.8], [9.4, 54.7]]] } }
    ] };"#;
    let zeitungen = r#"{ "1001": { "name": "Flensburg", "count": 1, "zeitungen": [{ "name": "Flensburger Tageblatt" }] } }"#;

    let json = karte_berechnen(geodaten.to_string(), zeitungen.to_string(), None);
    let v = serde_json::from_str::<serde_json::Value>(&json).unwrap();
    let f = &v["karte"]["landkreise"]["features"][0]["properties"];
    assert_eq!(f["newspaperCount"], 1);
    assert_eq!(f["style"]["fillColor"], "#FFC7C7");
    assert_eq!(v["karte"]["bounds"][0][0], 54.7);
}

#[test]
fn fehler_statt_karte() {
    match karte_ergebnis("kein json", "{}", &KartenKonfiguration::default()) {
        LadeErgebnis::Fehler { html } => assert!(html.contains("Fehler beim Laden der Kartendaten")),
        LadeErgebnis::Karte(_) => panic!("Fehler erwartet"),
    }
    match karte_ergebnis(r#"{ "type": "FeatureCollection", "features": [] }"#, "[1, 2]", &KartenKonfiguration::default()) {
        LadeErgebnis::Fehler { html } => assert!(html.contains("zeitungen_by_ags.json")),
        LadeErgebnis::Karte(_) => panic!("Fehler erwartet"),
    }
}

#[test]
fn farbe_mit_eigener_skala() {
    assert_eq!(ui_farbe(0, None), "#F8F8F8");
    let mut k = KartenKonfiguration::default();
    k.farbskala.keine_daten = "#000000".to_string();
    assert_eq!(ui_farbe(0, Some(serde_json::to_string(&k).unwrap())), "#000000");
    // kaputte Konfiguration fällt auf den Standard zurück
    assert_eq!(ui_farbe(5, Some("{".to_string())), "#5C0000");
}

#[test]
fn teilweise_konfiguration_wird_ergaenzt() {
    let k = r##"{ "farbskala": { "keine_daten": "#000000" } }"##.to_string();
    assert_eq!(ui_farbe(0, Some(k.clone())), "#000000");
    assert_eq!(ui_farbe(3, Some(k.clone())), "#B22222");
    assert!(ui_legende(Some(k)).contains("#000000"));
}
