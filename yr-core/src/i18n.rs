//! Static translations for the strings used in rendered output.
//!
//! Keys are the English strings themselves, so English needs no table.

use crate::location::Language;

const NB: &[(&str, &str)] = &[
    ("m/s", "m/s"),
    ("from", "fra"),
    ("Time", "Tid"),
    ("Forecast", "Varsel"),
    ("Temp.", "Temp."),
    ("Precipitation", "Nedbør"),
    ("Wind", "Vind"),
    ("Monday", "Mandag"),
    ("Tuesday", "Tirsdag"),
    ("Wednesday", "Onsdag"),
    ("Thursday", "Torsdag"),
    ("Friday", "Fredag"),
    ("Saturday", "Lørdag"),
    ("Sunday", "Søndag"),
    ("Today", "Idag"),
    ("Tomorrow", "I morgen"),
];

const NN: &[(&str, &str)] = &[
    ("m/s", "m/s"),
    ("from", "frå"),
    ("Time", "Tid"),
    ("Forecast", "Varsel"),
    ("Temp.", "Temp."),
    ("Precipitation", "Nedbør"),
    ("Wind", "Vind"),
    ("Monday", "Måndag"),
    ("Tuesday", "Tysdag"),
    ("Wednesday", "Onsdag"),
    ("Thursday", "Torsdag"),
    ("Friday", "Fredag"),
    ("Saturday", "Laurdag"),
    ("Sunday", "Sundag"),
    ("Today", "Idag"),
    ("Tomorrow", "I morgon"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::Nb => NB,
        Language::Nn => NN,
        Language::En => &[],
    }
}

/// Translate `key` into `language`. Unknown keys come back unchanged.
pub fn translate(key: &str, language: Language) -> &str {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}
