use std::collections::BTreeMap;

use geo::BoundingRect;
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_derive::{Serialize, Deserialize};
use serde_json::Value;

use crate::ags::Ags;
use crate::zeitungen::{null_als_default, string_oder_zahl};

pub const TYP_BUNDESLAND: &str = "bundesland";

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrenzenDatensatz {
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default, deserialize_with = "null_als_default")]
    pub features: Vec<Grenze>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grenze {
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default, deserialize_with = "null_als_default")]
    pub properties: GrenzEigenschaften,
    #[serde(default)]
    pub geometry: Value,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrenzEigenschaften {
    #[serde(default, deserialize_with = "string_oder_zahl", skip_serializing_if = "Option::is_none")]
    pub ags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partof: Option<String>,
    #[serde(flatten)]
    pub weitere: BTreeMap<String, Value>,
}

impl GrenzEigenschaften {

    pub fn ags(&self) -> &str {
        self.ags.as_deref().unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn typ(&self) -> &str {
        self.typ.as_deref().unwrap_or("")
    }

    pub fn partof(&self) -> &str {
        self.partof.as_deref().unwrap_or("")
    }

    pub fn schluessel(&self) -> Option<Ags> {
        self.ags.as_deref().and_then(Ags::parse)
    }
}

impl Grenze {

    pub fn ist_bundesland(&self) -> bool {
        self.properties.typ() == TYP_BUNDESLAND
    }

    pub fn als_multipolygon(&self) -> Option<MultiPolygon<f64>> {
        geometrie_als_multipolygon(&self.geometry)
    }
}

/// Liest den Grenzdatensatz. Akzeptiert reines GeoJSON oder ein Skript
/// der Form `window.geoData = { ... };`
pub fn parse_grenzen(s: &str) -> Result<GrenzenDatensatz, String> {
    let json = json_aus_skript(s).ok_or_else(|| "Grenzdaten enthalten kein JSON-Objekt".to_string())?;
    serde_json::from_str::<GrenzenDatensatz>(json).map_err(|e| format!("Grenzdaten fehlerhaft: {e}"))
}

fn json_aus_skript(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.starts_with('{') {
        return Some(s);
    }
    let start = s.find('{')?;
    let ende = s.rfind('}')?;
    if ende < start {
        return None;
    }
    Some(&s[start..=ende])
}

fn ring(v: &Value) -> Option<LineString<f64>> {
    let punkte = v.as_array()?.iter().filter_map(|p| {
        let p = p.as_array()?;
        Some(Coord { x: p.first()?.as_f64()?, y: p.get(1)?.as_f64()? })
    }).collect::<Vec<_>>();
    if punkte.is_empty() { None } else { Some(LineString::from(punkte)) }
}

fn polygon(v: &Value) -> Option<Polygon<f64>> {
    let mut ringe = v.as_array()?.iter().filter_map(ring);
    let aussen = ringe.next()?;
    Some(Polygon::new(aussen, ringe.collect()))
}

pub fn geometrie_als_multipolygon(geometrie: &Value) -> Option<MultiPolygon<f64>> {
    let koordinaten = geometrie.get("coordinates")?;
    match geometrie.get("type")?.as_str()? {
        "Polygon" => Some(MultiPolygon::new(vec![polygon(koordinaten)?])),
        "MultiPolygon" => {
            let polys = koordinaten.as_array()?.iter().filter_map(polygon).collect::<Vec<_>>();
            if polys.is_empty() { None } else { Some(MultiPolygon::new(polys)) }
        },
        _ => None,
    }
}

/// Leaflet-Bounds [[süd, west], [nord, ost]] über alle Grenzen
pub fn get_fit_bounds(grenzen: &[Grenze]) -> Option<[[f64; 2]; 2]> {
    grenzen.iter()
    .filter_map(|g| g.als_multipolygon()?.bounding_rect())
    .fold(None, |acc: Option<[[f64; 2]; 2]>, r| {
        let [[s, w], [n, o]] = acc.unwrap_or([[r.min().y, r.min().x], [r.max().y, r.max().x]]);
        Some([
            [s.min(r.min().y), w.min(r.min().x)],
            [n.max(r.max().y), o.max(r.max().x)],
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEODATEN: &str = r#"window.geoData = {
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "ags": "1001", "name": "Flensburg", "type": "kreisfreie Stadt" },
              "geometry": { "type": "Polygon", "coordinates": [[[9.4, 54.8], [9.5, 54.8], [9.5, 54.7], [9.4, 54.8]]] } },
            { "type": "Feature", "properties": { "ags": 11000, "name": "Berlin", "type": "bundesland", "einwohner": 3850000 },
              "geometry": { "type": "MultiPolygon", "coordinates": [[[[13.1, 52.3], [13.7, 52.3], [13.7, 52.7], [13.1, 52.3]]]] } },
            { "type": "Feature", "properties": null, "geometry": null }
        ]
    };"#;

    #[test]
    fn skript_und_zahlen_ags() {
        let d = parse_grenzen(GEODATEN).unwrap();
        assert_eq!(d.features.len(), 3);
        assert_eq!(d.features[0].properties.schluessel(), Some(Ags::from(1001)));
        assert_eq!(d.features[1].properties.ags(), "11000");
        assert!(d.features[1].ist_bundesland());
        assert_eq!(d.features[1].properties.weitere.get("einwohner"), Some(&Value::from(3850000)));
        assert_eq!(d.features[2].properties.name(), "");
        assert_eq!(d.features[2].properties.schluessel(), None);
    }

    #[test]
    fn bounds_ueber_alle_geometrien() {
        let d = parse_grenzen(GEODATEN).unwrap();
        let [[s, w], [n, o]] = get_fit_bounds(&d.features).unwrap();
        assert_eq!((s, w, n, o), (52.3, 9.4, 54.8, 13.7));
        assert_eq!(get_fit_bounds(&[]), None);
    }

    #[test]
    fn kaputte_grenzdaten() {
        assert!(parse_grenzen("window.geoData = undefined;").is_err());
        assert!(parse_grenzen("{ \"features\": 5 }").is_err());
    }
}
