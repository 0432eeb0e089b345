use std::collections::BTreeMap;

use serde::Deserializer;
use serde_derive::{Serialize, Deserialize};
use serde_json::Value;

use crate::ags::Ags;

/// Rohes Register, Schlüssel noch mit führenden Nullen ("01001")
pub type RohRegister = BTreeMap<String, Region>;

/// Normalisierte Nachschlagetabelle, wie sie von der Karte geladen wird
pub type Zeitungstabelle = BTreeMap<Ags, Region>;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, deserialize_with = "null_als_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_als_default")]
    pub count: u32,
    #[serde(default, deserialize_with = "null_als_default")]
    pub zeitungen: Vec<Zeitung>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zeitung {
    #[serde(default, deserialize_with = "null_als_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_als_default")]
    pub verlag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erscheinungsort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundesland: Option<String>,
    // alle weiteren Felder des Registers werden unverändert durchgereicht
    #[serde(flatten)]
    pub weitere: BTreeMap<String, Value>,
}

impl Zeitung {

    pub fn verlag(&self) -> Option<&str> {
        nicht_leer(Some(self.verlag.as_str()))
    }

    pub fn erscheinungsort(&self) -> Option<&str> {
        nicht_leer(self.erscheinungsort.as_deref())
    }

    pub fn website(&self) -> Option<&str> {
        nicht_leer(self.website.as_deref())
    }

    pub fn bundesland(&self) -> Option<&str> {
        nicht_leer(self.bundesland.as_deref())
    }
}

/// Getrimmter Inhalt, None wenn leer
pub fn nicht_leer(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// `null` im JSON wird wie ein fehlendes Feld behandelt
pub(crate) fn null_als_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    let v: Option<T> = serde::Deserialize::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}

/// Akzeptiert "01001" ebenso wie 1001
pub(crate) fn string_oder_zahl<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<Value> = serde::Deserialize::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehlende_felder_und_null() {
        let r = serde_json::from_str::<Region>(r#"{ "name": null, "zeitungen": [{ "name": "A", "verlag": null }] }"#).unwrap();
        assert_eq!(r.name, "");
        assert_eq!(r.count, 0);
        assert_eq!(r.zeitungen.len(), 1);
        assert_eq!(r.zeitungen[0].verlag, "");
        assert_eq!(r.zeitungen[0].verlag(), None);
    }

    #[test]
    fn unbekannte_felder_bleiben_erhalten() {
        let json = r#"{ "name": "A", "verlag": "V", "auflage": 12000, "website": " " }"#;
        let z = serde_json::from_str::<Zeitung>(json).unwrap();
        assert_eq!(z.weitere.get("auflage"), Some(&Value::from(12000)));
        assert_eq!(z.website(), None);
        let zurueck = serde_json::to_value(&z).unwrap();
        assert_eq!(zurueck["auflage"], Value::from(12000));
        assert_eq!(zurueck["verlag"], Value::from("V"));
        assert!(zurueck.get("erscheinungsort").is_none());
    }
}
