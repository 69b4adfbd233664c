use once_cell::sync::Lazy;
use regex::Regex;

use super::amount;
use crate::model::ParsedIngredient;

/// A parenthetical at the very end of the line, optionally followed by a
/// comma. Parentheses anywhere else stay part of the ingredient.
static TRAILING_NOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\(([^()]*)\)\s*,?\s*$").unwrap());

static LEADING_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*•▪→>]+\s*").unwrap());

static LEADING_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());

fn vulgar_fraction(c: char) -> Option<&'static str> {
    Some(match c {
        '½' => "1/2",
        '⅓' => "1/3",
        '⅔' => "2/3",
        '¼' => "1/4",
        '¾' => "3/4",
        '⅕' => "1/5",
        '⅖' => "2/5",
        '⅗' => "3/5",
        '⅘' => "4/5",
        '⅙' => "1/6",
        '⅚' => "5/6",
        '⅛' => "1/8",
        '⅜' => "3/8",
        '⅝' => "5/8",
        '⅞' => "7/8",
        _ => return None,
    })
}

/// Rewrites unicode vulgar fractions as "n/d". A fraction glued to a whole
/// number ("1½") becomes a mixed fraction ("1 1/2").
pub fn normalize_fractions(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if let Some(fraction) = vulgar_fraction(c) {
            if out.ends_with(|prev: char| prev.is_ascii_digit()) {
                out.push(' ');
            }
            out.push_str(fraction);
        } else if c == '⁄' {
            // fraction slash, as in "1⁄2"
            out.push('/');
        } else {
            out.push(c);
        }
    }
    out
}

fn split_notes(text: &str) -> (&str, Option<String>) {
    match TRAILING_NOTES.captures(text) {
        Some(caps) => {
            let rest = caps.get(1).map_or("", |m| m.as_str());
            let notes = caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|notes| !notes.is_empty());
            (rest, notes)
        }
        None => (text, None),
    }
}

fn strip_list_marker(text: &str) -> &str {
    let text = text.trim_start();
    let text = LEADING_BULLET
        .find(text)
        .map_or(text, |found| &text[found.end()..]);
    LEADING_ORDINAL
        .find(text)
        .map_or(text, |found| &text[found.end()..])
}

/// Parses one free-text ingredient line. Never fails: unrecognised input
/// ends up in `ingredient` as-is.
pub fn parse_ingredient_line(line: &str) -> ParsedIngredient {
    if line.trim().is_empty() {
        return ParsedIngredient::default();
    }

    let normalized = normalize_fractions(line.trim());
    let (body, notes) = split_notes(&normalized);
    let body = strip_list_marker(body);
    let found = amount::extract(body);

    ParsedIngredient {
        amount: found.amount,
        unit: found.unit,
        ingredient: found.remainder.trim().to_string(),
        notes,
    }
}

pub fn parse_ingredient_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedIngredient> {
    lines
        .iter()
        .map(|line| parse_ingredient_line(line.as_ref()))
        .collect()
}

/// Renders a parsed ingredient for display: amount, unit and ingredient
/// joined by single spaces, notes appended in parentheses.
pub fn format_ingredient(parsed: &ParsedIngredient) -> String {
    let mut out = [
        parsed.amount.as_deref(),
        parsed.unit.as_deref(),
        Some(parsed.ingredient.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    if let Some(notes) = parsed.notes.as_deref().map(str::trim) {
        if !notes.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push('(');
            out.push_str(notes);
            out.push(')');
        }
    }
    out
}
