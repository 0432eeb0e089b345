use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Amtlicher Gemeindeschlüssel in kanonischer Form (ohne führende Nullen).
///
/// Der Schlüssel wird numerisch gehalten, damit "01001" und "1001" auf
/// denselben Wert fallen und Tabellen nach Zahlenwert sortiert werden
/// ("1001" vor "10041"), nicht lexikographisch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ags(u64);

impl Ags {

    /// Parst einen AGS-Schlüssel, z.B. "01001" -> 1001.
    /// Leere Strings oder Strings mit Nicht-Ziffern ergeben None.
    pub fn parse(s: &str) -> Option<Ags> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u64>().ok().map(Ags)
    }

    /// "01001" -> "1001", "11000" -> "11000"
    pub fn normalisieren(s: &str) -> Option<String> {
        Ags::parse(s).map(|a| a.to_string())
    }

    pub fn wert(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Ags {
    fn from(v: u64) -> Self {
        Ags(v)
    }
}

impl fmt::Display for Ags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ags::parse(s).ok_or_else(|| format!("ungültiger AGS-Schlüssel {s:?}"))
    }
}

impl Serialize for Ags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Ags>().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fuehrende_nullen_entfernen() {
        assert_eq!(Ags::normalisieren("01001").as_deref(), Some("1001"));
        assert_eq!(Ags::normalisieren("11000").as_deref(), Some("11000"));
        assert_eq!(Ags::normalisieren(" 09162 ").as_deref(), Some("9162"));
        assert_eq!(Ags::normalisieren("000").as_deref(), Some("0"));
    }

    #[test]
    fn ungueltige_schluessel() {
        assert_eq!(Ags::parse(""), None);
        assert_eq!(Ags::parse("11a00"), None);
        assert_eq!(Ags::parse("-1001"), None);
        assert!("abc".parse::<Ags>().is_err());
    }

    #[test]
    fn sortierung_nach_zahlenwert() {
        let mut v = vec![Ags::from(10041), Ags::from(1001), Ags::from(9162)];
        v.sort();
        assert_eq!(v, vec![Ags::from(1001), Ags::from(9162), Ags::from(10041)]);
    }

    #[test]
    fn json_als_string() {
        let a = serde_json::from_str::<Ags>("\"05315\"").unwrap();
        assert_eq!(a, Ags::from(5315));
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"5315\"");
        assert!(serde_json::from_str::<Ags>("\"Berlin\"").is_err());
    }

    proptest! {
        #[test]
        fn normalisieren_ist_idempotent(n in 0u64..100_000_000, nullen in 0usize..4) {
            let roh = format!("{}{}", "0".repeat(nullen), n);
            let einmal = Ags::normalisieren(&roh).unwrap();
            let zweimal = Ags::normalisieren(&einmal).unwrap();
            prop_assert_eq!(&einmal, &zweimal);
            prop_assert!(einmal == "0" || !einmal.starts_with('0'));
        }
    }
}
