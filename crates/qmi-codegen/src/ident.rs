//! Identifier derivation from schema names.
//!
//! Schema names are free text ("Allocate CID", "Max Tx Channel Rate"); the
//! generated code needs UpperCamelCase types and snake_case members. Words
//! split on any non-alphanumeric byte, and letter runs are folded to the
//! target case, so "CID" becomes "Cid"/"cid".

/// `"Allocate CID"` → `"AllocateCid"`.
#[must_use]
pub fn upper_camel(name: &str) -> String {
    let mut out = String::new();
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

/// `"Allocate CID"` → `"allocate_cid"`.
#[must_use]
pub fn snake(name: &str) -> String {
    let mut out = String::new();
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('_');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}
