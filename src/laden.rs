//! Laden der Datendateien: Abruf im Browser, Prüfen und Parsen überall.

use crate::grenzen::parse_grenzen;
use crate::karte::{karte_aufbauen, KartenDaten};
use crate::konfiguration::{KartenKonfiguration, ZEITUNGEN_DATEI};
use crate::zeitungen::Zeitungstabelle;

/// Nur 2xx-Antworten werden weiterverarbeitet
pub fn status_pruefen(url: &str, status: u16) -> Result<(), String> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(format!("HTTP {status} für {url}"))
    }
}

/// Baut die Karte aus dem Inhalt von `geodata.js` und `zeitungen_by_ags.json`
pub fn karte_aus_texten(geodaten: &str, zeitungen: &str, k: &KartenKonfiguration) -> Result<KartenDaten, String> {
    let grenzen = parse_grenzen(geodaten)?;
    let tabelle = serde_json::from_str::<Zeitungstabelle>(zeitungen)
        .map_err(|e| format!("{ZEITUNGEN_DATEI}: {e}"))?;
    Ok(karte_aufbauen(grenzen, &tabelle, k))
}

#[cfg(target_arch = "wasm32")]
pub async fn abrufen(url: &str) -> Result<String, String> {

    web_sys::console::log_1(&format!("reqwest fetching url {url}").into());

    let antwort = reqwest::get(url).await.map_err(|e| format!("{url}: {e}"))?;
    status_pruefen(url, antwort.status().as_u16())?;

    let bytes = antwort.bytes().await.map_err(|e| format!("{url}: {e}"))?;
    Ok(crate::decode(bytes.to_vec()))
}

/// Erst die Grenzen, dann die Tabelle. Schlägt einer der Abrufe fehl,
/// wird keine Karte gebaut.
#[cfg(target_arch = "wasm32")]
pub async fn karte_laden(k: &KartenKonfiguration) -> Result<KartenDaten, String> {
    use crate::konfiguration::{daten_url, GRENZEN_DATEI};
    let grenzen = abrufen(&daten_url(GRENZEN_DATEI)).await?;
    let tabelle = abrufen(&daten_url(ZEITUNGEN_DATEI)).await?;
    karte_aus_texten(&grenzen, &tabelle, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::konfiguration::{daten_url, GRENZEN_DATEI};

    #[test]
    fn nur_erfolgreiche_antworten() {
        let url = daten_url(ZEITUNGEN_DATEI);
        assert!(status_pruefen(&url, 200).is_ok());
        assert!(status_pruefen(&url, 204).is_ok());
        let e = status_pruefen(&url, 404).unwrap_err();
        assert_eq!(e, "HTTP 404 für https://tifa365.github.io/papertrail/zeitungen_by_ags.json");
        assert!(status_pruefen(&daten_url(GRENZEN_DATEI), 500).unwrap_err().starts_with("HTTP 500"));
        assert!(status_pruefen(&url, 304).is_err());
    }

    #[test]
    fn kaputte_tabelle_ergibt_keine_karte() {
        let geodaten = r#"{ "type": "FeatureCollection", "features": [] }"#;
        let e = karte_aus_texten(geodaten, "<html>404</html>", &KartenKonfiguration::default()).unwrap_err();
        assert!(e.starts_with("zeitungen_by_ags.json: "));
        assert!(karte_aus_texten("", "{}", &KartenKonfiguration::default()).is_err());
        assert!(karte_aus_texten(geodaten, "{}", &KartenKonfiguration::default()).is_ok());
    }
}
