use std::collections::BTreeMap;

pub type Bereinigungstabelle = BTreeMap<String, String>;

fn main() {
    println!("cargo:rerun-if-changed=data/verlag_bereinigung.json");
    let s = include_str!("./data/verlag_bereinigung.json");
    let s = serde_json::from_str::<Bereinigungstabelle>(&s).unwrap();
    uneval::to_out_dir(&s, "verlag_bereinigung.rs").unwrap();
}
