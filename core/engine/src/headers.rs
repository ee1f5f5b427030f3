//! FILENAME: core/engine/src/headers.rs
//! PURPOSE: Header normalization for loaded sheets.
//! CONTEXT: Sheets often repeat a header (e.g. several "NAMA" columns). At load
//! time repeats get a numeric suffix so names are unique; for display the
//! suffix is stripped again.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_\d+$").unwrap());

/// Trims headers and makes repeats unique in first-seen order.
/// The first occurrence keeps its name, the second becomes `name_1`,
/// the third `name_2`, and so on.
pub fn dedupe_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let name = header.as_ref().trim().to_string();
        match seen.get_mut(&name) {
            Some(count) => {
                *count += 1;
                result.push(format!("{}_{}", name, count));
            }
            None => {
                seen.insert(name.clone(), 0);
                result.push(name);
            }
        }
    }

    result
}

/// Strips a trailing `_<digits>` suffix for display.
pub fn clean_header(name: &str) -> String {
    SUFFIX.replace(name, "").into_owned()
}
