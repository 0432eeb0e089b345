use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::karte::Farbskala;
use crate::zeitungen::{Region, Zeitung};

pub const DETAIL_HINWEIS: &str = "Fahre mit der Maus auf eine Region, um Details anzuzeigen";
pub const UNBEKANNTE_REGION: &str = "Unbekannte Region";
pub const KEINE_DATEN: &str = "Keine Zeitungsdaten verfügbar";

pub fn einheit(anzahl: u32) -> &'static str {
    if anzahl == 1 { "Zeitung" } else { "Zeitungen" }
}

/// "1 Zeitung", "3 Zeitungen"
pub fn anzahl_text(anzahl: u32) -> String {
    format!("{anzahl} {}", einheit(anzahl))
}

pub fn render_tooltip(name: Option<&str>) -> String {
    encode_text(name.unwrap_or(UNBEKANNTE_REGION)).to_string()
}

/// Titel der Detailleiste, reiner Text (wird per textContent gesetzt)
pub fn render_detail_titel(name: Option<&str>, region: Option<&Region>) -> String {
    let name = name.unwrap_or(UNBEKANNTE_REGION);
    match region {
        Some(r) => format!("{name} ({})", anzahl_text(r.count)),
        None => name.to_string(),
    }
}

fn render_zeitung(z: &Zeitung) -> String {

    let website = z.website().map(|w| format!(
        "<a href=\"{}\" target='_blank' rel='noopener' class='newspaper-link'>🔗 Website</a>",
        encode_double_quoted_attribute(w),
    ));
    let verlag = z.verlag().map(|v| encode_text(v).to_string());
    let ort = z.erscheinungsort().map(|o| format!("({})", encode_text(o)));

    // nur vorhandene Teile, sonst keine Detailzeile
    let details = [verlag, ort, website].into_iter().flatten().collect::<Vec<_>>().join(" ");
    let details = if details.is_empty() {
        String::new()
    } else {
        format!("<div class='newspaper-details'>{details}</div>")
    };

    format!("
        <div class='newspaper-item'>
            <div class='newspaper-name'>{name}</div>
            {details}
        </div>",
        name = encode_text(&z.name),
    )
}

pub fn render_popup(name: Option<&str>, region: Option<&Region>) -> String {

    let name = encode_text(name.unwrap_or(UNBEKANNTE_REGION));

    let region = match region {
        Some(r) => r,
        None => return normalize_for_js(format!("
            <div class='region-popup'>
                <h3>{name}</h3>
                <p>{KEINE_DATEN}</p>
            </div>
        ")),
    };

    let liste = if region.zeitungen.is_empty() {
        String::new()
    } else {
        format!(
            "<div class='newspaper-list'>{}</div>",
            region.zeitungen.iter().map(render_zeitung).collect::<Vec<_>>().join(""),
        )
    };

    normalize_for_js(format!("
        <div class='region-popup'>
            <h3>{name}</h3>
            <div class='count-badge'>{anzahl}</div>
            {liste}
        </div>
    ", anzahl = anzahl_text(region.count)))
}

/// Meldung, die anstelle der Karte angezeigt wird
pub fn render_fehler(meldung: &str) -> String {
    format!(
        "<p style=\"color: red; padding: 20px;\">Fehler beim Laden der Kartendaten: {}</p>",
        encode_text(meldung),
    )
}

pub fn render_legende(skala: &Farbskala) -> String {

    let mut stufen = skala.grenzen.iter()
    .zip(skala.farben.iter())
    .enumerate()
    .filter(|(_, (grenze, _))| **grenze > 0)
    .map(|(i, (grenze, farbe))| {
        let text = if i == 0 { format!("{grenze}+") } else { grenze.to_string() };
        render_legenden_eintrag(farbe, &text)
    })
    .collect::<Vec<_>>();

    stufen.push(render_legenden_eintrag(&skala.keine_daten, "keine Daten"));

    normalize_for_js(format!("
        <div class='legend'>
            <div class='legend-title'>Zeitungen pro Kreis</div>
            {}
        </div>
    ", stufen.join("")))
}

fn render_legenden_eintrag(farbe: &str, text: &str) -> String {
    format!("
        <div class='legend-item'>
            <span class='legend-color' style=\"background:{farbe};\"></span>
            <span class='legend-label'>{text}</span>
        </div>",
        farbe = encode_double_quoted_attribute(farbe),
        text = encode_text(text),
    )
}

pub fn normalize_for_js(s: String) -> String {
    s.lines()
        .map(|s| s.trim().replace('`', "'"))
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeitung(name: &str, verlag: &str, ort: Option<&str>, website: Option<&str>) -> Zeitung {
        Zeitung {
            name: name.to_string(),
            verlag: verlag.to_string(),
            erscheinungsort: ort.map(String::from),
            website: website.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn einzahl_und_mehrzahl() {
        assert_eq!(anzahl_text(0), "0 Zeitungen");
        assert_eq!(anzahl_text(1), "1 Zeitung");
        assert_eq!(anzahl_text(2), "2 Zeitungen");
    }

    #[test]
    fn detail_titel() {
        let r = Region { name: "Flensburg".to_string(), count: 1, zeitungen: Vec::new() };
        assert_eq!(render_detail_titel(Some("Flensburg"), Some(&r)), "Flensburg (1 Zeitung)");
        assert_eq!(render_detail_titel(Some("Flensburg"), None), "Flensburg");
        assert_eq!(render_detail_titel(None, None), UNBEKANNTE_REGION);
    }

    #[test]
    fn leere_felder_ohne_detailzeile() {
        let html = render_zeitung(&zeitung("Südkurier", " ", Some(""), None));
        assert!(!html.contains("newspaper-details"));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("()"));
    }

    #[test]
    fn alle_felder() {
        let html = render_zeitung(&zeitung("A & B", "Verlag", Some("Ort"), Some("https://example.org/?a=1&b=\"2\"")));
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("<div class='newspaper-details'>Verlag (Ort) <a href=\"https://example.org/?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains("🔗 Website</a></div>"));
    }

    #[test]
    fn nur_website() {
        let html = render_zeitung(&zeitung("A", "", None, Some("https://a.de")));
        assert!(html.contains("<div class='newspaper-details'><a href=\"https://a.de\""));
    }

    #[test]
    fn popup_ohne_daten() {
        let html = render_popup(Some("<Kreis>"), None);
        assert!(html.contains("<h3>&lt;Kreis&gt;</h3>"));
        assert!(html.contains(KEINE_DATEN));
        assert!(!html.contains("count-badge"));
    }

    #[test]
    fn popup_mit_zeitungen() {
        let r = Region {
            name: "Flensburg".to_string(),
            count: 2,
            zeitungen: vec![zeitung("A", "", None, None), zeitung("B", "V", None, None)],
        };
        let html = render_popup(Some("Flensburg"), Some(&r));
        assert!(html.contains("<div class='count-badge'>2 Zeitungen</div>"));
        assert_eq!(html.matches("class='newspaper-item'").count(), 2);
        assert!(!html.contains('\n'));
    }

    #[test]
    fn legende() {
        let html = render_legende(&Farbskala::default());
        assert_eq!(html.matches("legend-item").count(), 6);
        assert!(html.contains("5+"));
        assert!(html.contains("keine Daten"));
        assert!(!html.contains("#EFEFEF"));
    }

    #[test]
    fn fehlermeldung() {
        let html = render_fehler("HTTP 404 <x>");
        assert!(html.starts_with("<p style=\"color: red; padding: 20px;\">"));
        assert!(html.contains("HTTP 404 &lt;x&gt;"));
    }
}
