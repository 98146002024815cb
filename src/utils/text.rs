// src/utils/text.rs

/// Title-cases a string word by word.
///
/// A letter is uppercased when the character before it is not a letter and
/// lowercased otherwise, so "management's" becomes "Management'S".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Short single-line preview of a text for log output.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if flat.chars().count() > max_chars {
        flat.chars().take(max_chars).collect::<String>() + "..."
    } else {
        flat
    }
}
