use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOCALE: &str = "es";

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
    let locales_dir = manifest_dir.join("locales");
    println!("cargo:rerun-if-changed={}", locales_dir.display());

    let mut locales = Vec::new();
    let mut paths = fs::read_dir(&locales_dir)
        .unwrap_or_else(|error| panic!("reading {}: {error}", locales_dir.display()))
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect::<Vec<_>>();
    paths.sort();

    for path in paths {
        println!("cargo:rerun-if-changed={}", path.display());
        let locale = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_else(|| panic!("locale file name is not utf-8: {}", path.display()))
            .to_string();
        let mut entries = Vec::new();
        flatten(&load_table(&path), "", &mut entries);
        entries.sort();
        locales.push((locale, entries));
    }

    assert!(
        locales.iter().any(|(locale, _)| locale == DEFAULT_LOCALE),
        "default locale `{DEFAULT_LOCALE}` has no catalog file"
    );

    let mut out = String::new();
    writeln!(out, "pub const DEFAULT_LOCALE: &str = {DEFAULT_LOCALE:?};").unwrap();
    writeln!(out, "pub static LOCALES: &[(&str, &[(&str, &str)])] = &[").unwrap();
    for (locale, entries) in &locales {
        writeln!(out, "    ({locale:?}, &[").unwrap();
        for (key, value) in entries {
            writeln!(out, "        ({key:?}, {value:?}),").unwrap();
        }
        writeln!(out, "    ]),").unwrap();
    }
    writeln!(out, "];").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out_dir.join("starkmind_i18n_generated.rs"), out)
        .expect("writing generated locale catalog");
}

fn load_table(path: &Path) -> toml::Table {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|error| panic!("reading {}: {error}", path.display()));
    toml::from_str(&source).unwrap_or_else(|error| panic!("parsing {}: {error}", path.display()))
}

fn flatten(table: &toml::Table, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten(nested, &full_key, out),
            toml::Value::String(text) => out.push((full_key, text.clone())),
            other => out.push((full_key, other.to_string())),
        }
    }
}
