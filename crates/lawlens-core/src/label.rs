//! Label normalisation across jurisdictions.
//!
//! Each country writes its article markers differently ("제3조",
//! "Article 3", "§ 3", "第3條") but matching results coming back from the
//! AI service reference articles in whatever form the model chose. Reducing
//! a marker to its bare number gives a stable comparison key.
//!
//! Amendment-insertion suffixes survive normalisation: "제2조의2" → "2의2",
//! "Article 52a" → "52a", "§ 16a" → "16a".

/// Reduce a native article marker to its bare number.
///
/// Strips the jurisdiction prefix ("제", "Article", "Rule", "Section",
/// "Regulation", "§", "第") and suffix ("조", "條"), then removes interior
/// whitespace. Unrecognised input is returned trimmed rather than rejected;
/// the caller compares keys, it does not validate them.
pub fn normalize_label(label: &str) -> String {
    let mut s = label.trim();

    for prefix in ["Article", "Rule", "Regulation", "Section", "article", "rule"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    for prefix in ["제", "第", "§"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }

    let mut s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    while s.ends_with('.') || s.ends_with(':') {
        s.pop();
    }
    // The unit marker also appears before insertion suffixes ("제2조의2",
    // "第22條之1"); drop it there as well as at the end.
    let s = s.replacen("조의", "의", 1).replacen("條之", "之", 1);
    let s = s.strip_suffix('조').or_else(|| s.strip_suffix('條')).unwrap_or(&s);

    s.to_string()
}

/// True when two markers refer to the same article once normalised.
pub fn labels_match(a: &str, b: &str) -> bool {
    let a = normalize_label(a);
    let b = normalize_label(b);
    !a.is_empty() && a == b
}
