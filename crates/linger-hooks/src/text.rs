/// Upper-cases the first character and leaves the rest untouched.
///
/// Works per `char`, not per grapheme; a first character whose upper case is
/// several characters (`ß` → `SS`) expands.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns a capitalizing function, for passing where a formatter is expected.
pub fn capitalizer() -> impl Fn(&str) -> String + Clone {
    capitalize
}
