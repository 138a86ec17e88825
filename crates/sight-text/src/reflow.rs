//! Paragraph reflow for hard-wrapped page text.
//!
//! A heuristic, not a grammar: a line is treated as a wrapped sentence when it
//! lacks terminal punctuation and the next line starts in lowercase. Anything
//! else is kept as a real line break.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scanner watermarks and page counters stamped onto scanned pages.
static SCANNER_ARTIFACTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[ \t]*(?:digitalizado com camscanner|scanned with camscanner|camscanner|\b(?:page|página)[ \t]*\d+\b)",
    )
    .unwrap()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

const TERMINAL_PUNCTUATION: [char; 5] = ['.', '!', '?', ':', ';'];

/// Rejoin wrapped lines into paragraphs.
pub fn reflow(text: &str) -> String {
    let cleaned = SCANNER_ARTIFACTS.replace_all(text, "");
    let lines: Vec<&str> = cleaned.split('\n').map(str::trim).collect();

    let mut out = String::with_capacity(cleaned.len());
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            out.push_str("\n\n");
            continue;
        }

        // Hyphenated word: glue the stem directly onto the next line.
        if let Some(stem) = line.strip_suffix('-') {
            out.push_str(stem);
            continue;
        }

        out.push_str(line);

        let next = lines.get(i + 1).copied().unwrap_or("");
        if continues_sentence(line, next) {
            out.push(' ');
        } else {
            out.push('\n');
        }
    }

    EXCESS_NEWLINES
        .replace_all(&out, "\n\n")
        .trim()
        .to_string()
}

fn continues_sentence(line: &str, next: &str) -> bool {
    if line.ends_with(&TERMINAL_PUNCTUATION[..]) {
        return false;
    }
    match next.chars().next() {
        None => false,
        Some(c) => !(c.is_uppercase() || c.is_ascii_digit()),
    }
}
