use serde_derive::{Serialize, Deserialize};
use serde_json::Value;

use crate::ags::Ags;
use crate::grenzen::{get_fit_bounds, GrenzEigenschaften, Grenze, GrenzenDatensatz};
use crate::konfiguration::{Ansicht, KartenKonfiguration, PopupKonfiguration};
use crate::sonderfaelle::{regel_fuer, sonderfaelle_anwenden, ZusammengesetzteRegion};
use crate::zeitungen::{Region, Zeitung, Zeitungstabelle};

/// Stufenfunktion Anzahl -> Farbe. `grenzen` absteigend, `farben` parallel dazu
/// von dunkel nach hell. Anzahl 0 ergibt immer `keine_daten`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Farbskala {
    pub grenzen: Vec<u32>,
    pub farben: Vec<String>,
    pub keine_daten: String,
}

impl Default for Farbskala {
    fn default() -> Self {
        Self {
            grenzen: vec![5, 4, 3, 2, 1, 0],
            farben: ["#5C0000", "#8B0000", "#B22222", "#FF8A8A", "#FFC7C7", "#EFEFEF"]
                .iter().map(|s| s.to_string()).collect(),
            keine_daten: "#F8F8F8".to_string(),
        }
    }
}

impl Farbskala {

    /// Index der ersten Grenze mit `anzahl >= grenze`, None bei 0
    pub fn stufe(&self, anzahl: u32) -> Option<usize> {
        if anzahl == 0 {
            return None;
        }
        self.grenzen.iter()
        .zip(self.farben.iter())
        .position(|(grenze, _)| anzahl >= *grenze)
    }

    /// Unlesbare Palettenfarben werden durch `keine_daten` ersetzt
    pub fn farbe(&self, anzahl: u32) -> &str {
        self.stufe(anzahl)
        .and_then(|i| self.farben.get(i))
        .filter(|f| csscolorparser::parse(f).is_ok())
        .unwrap_or(&self.keine_daten)
    }

    /// Prüft Ordnung der Grenzen und Parsbarkeit der Farben
    pub fn pruefen(&self) -> Result<(), String> {
        if self.grenzen.len() != self.farben.len() {
            return Err(format!("{} Grenzen, aber {} Farben", self.grenzen.len(), self.farben.len()));
        }
        if self.grenzen.windows(2).any(|w| w[0] <= w[1]) {
            return Err(format!("Grenzen nicht streng absteigend: {:?}", self.grenzen));
        }
        for f in self.farben.iter().chain(std::iter::once(&self.keine_daten)) {
            csscolorparser::parse(f).map_err(|e| format!("ungültige Farbe {f:?}: {e}"))?;
        }
        Ok(())
    }
}

/// Relative Helligkeit 0.0 (schwarz) .. 1.0 (weiß)
pub fn helligkeit(farbe: &str) -> Option<f64> {
    let c = csscolorparser::parse(farbe).ok()?;
    Some(0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b)
}

/// Leaflet-Pfadstil
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stil {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

pub fn stil_bundesland(k: &KartenKonfiguration) -> Stil {
    Stil {
        fill_color: "transparent".to_string(),
        fill_opacity: 0.0,
        color: k.land_rand_farbe.clone(),
        weight: k.land_rand_breite,
        opacity: k.land_rand_deckkraft,
    }
}

pub fn stil_kreis(anzahl: u32, k: &KartenKonfiguration) -> Stil {
    Stil {
        fill_color: k.farbskala.farbe(anzahl).to_string(),
        fill_opacity: 1.0,
        color: k.kreis_rand_farbe.clone(),
        weight: k.kreis_rand_breite,
        opacity: 1.0,
    }
}

/// Optionen für `bindPopup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptionen {
    pub class_name: String,
    pub offset: [f64; 2],
    pub max_width: u32,
    pub auto_pan: bool,
}

/// Regionen, deren Name eines der nördlichen Muster enthält, bekommen
/// zusätzlich die Klasse `northern-popup` und einen Versatz nach oben
pub fn popup_optionen(name: &str, k: &PopupKonfiguration) -> PopupOptionen {
    let name = name.to_lowercase();
    let noerdlich = k.noerdliche_muster.iter()
        .any(|m| !m.is_empty() && name.contains(&m.to_lowercase()));
    PopupOptionen {
        class_name: if noerdlich { "newspaper-popup northern-popup" } else { "newspaper-popup" }.to_string(),
        offset: if noerdlich { k.noerdlicher_versatz } else { [0.0, 0.0] },
        max_width: k.max_breite,
        auto_pan: false,
    }
}

/// Ergebnis der Zuordnung eines Polygons zur Zeitungstabelle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zuordnung<'a> {
    pub schluessel: Option<Ags>,
    pub anzahl: u32,
    pub region: Option<&'a Region>,
}

pub fn zuordnen<'a>(
    e: &GrenzEigenschaften,
    tabelle: &'a Zeitungstabelle,
    regeln: &[ZusammengesetzteRegion],
) -> Zuordnung<'a> {
    let schluessel = match regel_fuer(e, regeln) {
        Some(r) => r.schluessel(),
        None => e.schluessel(),
    };
    let region = schluessel.and_then(|s| tabelle.get(&s));
    Zuordnung {
        schluessel,
        anzahl: region.map(|r| r.count).unwrap_or(0),
        region,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KartenEigenschaften {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ags: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partof: Option<String>,
    pub newspaper_count: u32,
    pub style: Stil,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zeitungen: Vec<Zeitung>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tooltip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub popup: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_optionen: Option<PopupOptionen>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KartenFeature {
    #[serde(rename = "type")]
    pub typ: String,
    pub properties: KartenEigenschaften,
    pub geometry: Value,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub typ: String,
    pub features: Vec<KartenFeature>,
}

impl FeatureCollection {
    fn neu(features: Vec<KartenFeature>) -> Self {
        Self { typ: "FeatureCollection".to_string(), features }
    }
}

/// Alles, was die Seite zum Zeichnen braucht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KartenDaten {
    /// nur Umrisse, nicht interaktiv
    pub bundeslaender: FeatureCollection,
    /// gefüllt, mit Hover/Klick
    pub landkreise: FeatureCollection,
    pub hover_fill_opacity: f64,
    pub detail_hinweis: String,
    pub legende: String,
    pub ansicht: Ansicht,
    pub bounds: [[f64; 2]; 2],
    pub log: Vec<String>,
}

/// Trennt Bundesländer (Hintergrund) von Kreisen (Vordergrund)
pub fn ebenen_trennen(grenzen: Vec<Grenze>) -> (Vec<Grenze>, Vec<Grenze>) {
    grenzen.into_iter().partition(|g| g.ist_bundesland())
}

fn bundesland_feature(g: Grenze, k: &KartenKonfiguration) -> KartenFeature {
    let Grenze { properties: e, geometry, .. } = g;
    KartenFeature {
        typ: "Feature".to_string(),
        properties: KartenEigenschaften {
            name: e.name().to_string(),
            typ: e.typ().to_string(),
            ags: e.ags,
            partof: e.partof,
            newspaper_count: 0,
            style: stil_bundesland(k),
            zeitungen: Vec::new(),
            tooltip: String::new(),
            detail: String::new(),
            popup: String::new(),
            popup_optionen: None,
        },
        geometry,
    }
}

fn kreis_feature(g: Grenze, tabelle: &Zeitungstabelle, k: &KartenKonfiguration) -> KartenFeature {
    let z = zuordnen(&g.properties, tabelle, &k.sonderfaelle);
    let Grenze { properties: e, geometry, .. } = g;
    let name = e.name.as_deref().filter(|s| !s.is_empty());
    KartenFeature {
        typ: "Feature".to_string(),
        properties: KartenEigenschaften {
            name: e.name().to_string(),
            typ: e.typ().to_string(),
            ags: z.schluessel.map(|s| s.to_string()).or(e.ags),
            partof: e.partof,
            newspaper_count: z.anzahl,
            style: stil_kreis(z.anzahl, k),
            zeitungen: z.region.map(|r| r.zeitungen.clone()).unwrap_or_default(),
            tooltip: crate::ui::render_tooltip(name),
            detail: crate::ui::render_detail_titel(name, z.region),
            popup: crate::ui::render_popup(name, z.region),
            popup_optionen: Some(popup_optionen(name.unwrap_or_default(), &k.popup)),
        },
        geometry,
    }
}

/// Verknüpft Grenzdaten und Zeitungstabelle zur fertigen Karte.
/// Die Tabelle wird nur gelesen.
pub fn karte_aufbauen(
    grenzen: GrenzenDatensatz,
    tabelle: &Zeitungstabelle,
    k: &KartenKonfiguration,
) -> KartenDaten {

    let mut log = Vec::new();

    if let Err(e) = k.farbskala.pruefen() {
        log.push(format!("WARNING: colour scale: {e}"));
    }

    log.push(format!("{} boundary features, {} regions with newspaper data", grenzen.features.len(), tabelle.len()));

    let grenzen = sonderfaelle_anwenden(grenzen.features, &k.sonderfaelle, &mut log);
    let (bundeslaender, kreise) = ebenen_trennen(grenzen);

    let bounds = get_fit_bounds(&kreise).unwrap_or(k.ansicht.grenzen_fallback);

    let kreise = kreise.into_iter().map(|g| kreis_feature(g, tabelle, k)).collect::<Vec<_>>();
    let ohne_daten = kreise.iter().filter(|f| f.properties.newspaper_count == 0).count();
    log.push(format!("{} states, {} districts ({ohne_daten} without data)", bundeslaender.len(), kreise.len()));

    KartenDaten {
        bundeslaender: FeatureCollection::neu(bundeslaender.into_iter().map(|g| bundesland_feature(g, k)).collect()),
        landkreise: FeatureCollection::neu(kreise),
        hover_fill_opacity: k.hover_deckkraft,
        detail_hinweis: crate::ui::DETAIL_HINWEIS.to_string(),
        legende: crate::ui::render_legende(&k.farbskala),
        ansicht: k.ansicht.clone(),
        bounds,
        log,
    }
}
