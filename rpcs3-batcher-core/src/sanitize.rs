//! Display-name sanitizer for generated launcher scripts.
//!
//! Turns a raw SFO title (or title ID, or folder name) into a string
//! that is safe to use as a Windows file name and reads like a shelf
//! label: decorative glyphs dropped, letter/digit runs spaced apart,
//! words title-cased, Roman numerals uppercased.
//!
//! The whole pipeline is pure and total — the worst malformed input
//! degrades to an empty string, never an error. Casing uses Rust's
//! locale-independent Unicode rules, so the output is identical across
//! environments.

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Decorative glyphs replaced before tokenization. A colon becomes
/// " -" so subtitles keep a visual break; trademark symbols vanish.
/// Extend this table rather than the algorithm for new glyphs.
const GLYPH_SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2122}', ""), // ™
    ('\u{00AE}', ""), // ®
    (':', " -"),
    ('\u{03A3}', "Sigma"), // Σ, seen in "Project Sylpheed: Arc of Deception" rips
];

/// Token separators (step 3 of the pipeline).
const SEPARATORS: &[char] = &[' ', '.', '-', '_', ':'];

/// Characters Windows refuses in file names. Control characters below
/// 0x20 are also stripped.
const ILLEGAL_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Sanitize a raw display name into a safe, tidy file name stem.
///
/// The output never contains a character from the Windows filename
/// denylist, and re-running the function on its own output changes
/// nothing.
pub fn sanitize_file_name(raw: &str) -> String {
    let substituted = substitute_glyphs(raw);
    let spaced = space_letter_digit_boundaries(&substituted);

    let words: Vec<String> = spaced
        .split(SEPARATORS)
        .filter(|token| !token.is_empty())
        .map(recase_token)
        .collect();

    strip_illegal_chars(&words.join(" "))
}

fn substitute_glyphs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match GLYPH_SUBSTITUTIONS.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

/// Insert a space between a letter immediately followed by a digit and
/// vice versa ("ironman2" -> "ironman 2"). Uses Unicode categories,
/// not ASCII ranges.
fn space_letter_digit_boundaries(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if let Some(&next) = chars.peek() {
            let boundary = (ch.is_alphabetic() && next.is_numeric())
                || (ch.is_numeric() && next.is_alphabetic());
            if boundary {
                out.push(' ');
            }
        }
    }
    out
}

/// Re-case one token: Roman numerals go uppercase, all-caps acronyms
/// stay as they are, everything else is lowercased with the first
/// letter raised.
fn recase_token(token: &str) -> String {
    if is_roman_numeral(token) {
        return token.to_uppercase();
    }
    if is_acronym(token) {
        return token.to_string();
    }
    title_case(token)
}

/// Fully uppercase ASCII tokens of two or more letters ("FFX", "DLC")
/// read as intentional and keep their casing.
fn is_acronym(token: &str) -> bool {
    token.len() >= 2 && token.chars().all(|c| c.is_ascii_uppercase())
}

fn title_case(token: &str) -> String {
    let lowered = token.to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.extend(chars);
            out
        }
        None => String::new(),
    }
}

fn strip_illegal_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect()
}

// ---------------------------------------------------------------------------
// Roman numerals
// ---------------------------------------------------------------------------

/// Matches `M{0,4}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})`,
/// case-insensitively, against the whole token. The empty string
/// technically fits that shape and is rejected explicitly.
fn is_roman_numeral(token: &str) -> bool {
    if token.is_empty() || !token.is_ascii() {
        return false;
    }
    let upper = token.to_ascii_uppercase();
    let mut rest = upper.as_str();

    rest = consume_repeats(rest, 'M', 4);
    rest = consume_place(rest, "CM", "CD", 'D', 'C');
    rest = consume_place(rest, "XC", "XL", 'L', 'X');
    rest = consume_place(rest, "IX", "IV", 'V', 'I');

    rest.is_empty()
}

/// Consume up to `max` repetitions of `ch` from the front.
fn consume_repeats(s: &str, ch: char, max: usize) -> &str {
    let count = s.chars().take_while(|&c| c == ch).count().min(max);
    &s[count..]
}

/// Consume one decimal place of a Roman numeral: either a subtractive
/// pair (`nine`/`four`), or an optional `five` glyph followed by up to
/// three `one` glyphs.
fn consume_place<'a>(s: &'a str, nine: &str, four: &str, five: char, one: char) -> &'a str {
    if let Some(rest) = s.strip_prefix(nine) {
        return rest;
    }
    if let Some(rest) = s.strip_prefix(four) {
        return rest;
    }
    let rest = s.strip_prefix(five).unwrap_or(s);
    consume_repeats(rest, one, 3)
}

#[cfg(test)]
#[path = "tests/sanitize_tests.rs"]
mod tests;
