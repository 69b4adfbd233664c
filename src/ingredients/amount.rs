//! Splits a leading amount and unit off an ingredient line.
//!
//! The grammar is an ordered list of rules; the first one that matches
//! wins. Amount shapes are ordered the same way, most specific first, so
//! "1 1/2" is never read as amount "1" followed by a stray "1/2", and
//! "1 1/2-2" is never cut down to "1 1/2".

use once_cell::sync::Lazy;
use regex::Regex;

use super::units::{self, MULTI_WORD_ALIASES, SINGLE_WORD_ALIASES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    /// "1 1/2"
    MixedFraction,
    /// "1.5"
    Decimal,
    /// "2-3", "2 to 3", "1/2-1", "1 1/2-2"
    Range,
    /// "1/2"
    Fraction,
    /// "2"
    Whole,
}

/// Which rule of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    AmountWithUnit,
    AmountWithMultiWordUnit,
    AmountOnly,
    UnitOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AmountUnit {
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub remainder: String,
    /// `None` when nothing was recognised and the whole text is the remainder
    pub rule: Option<MatchRule>,
}

static AMOUNT_PATTERNS: Lazy<Vec<(AmountKind, Regex)>> = Lazy::new(|| {
    const NUMBER: &str = r"\d+(?:\s+\d+/\d+|\.\d+|/\d+)?";
    [
        // a range spans two amounts, so it goes first: "2 1/2 to 3"
        (
            AmountKind::Range,
            format!(r"^{NUMBER}(?:\s*[-–—]\s*|\s+to\s+){NUMBER}"),
        ),
        (AmountKind::MixedFraction, r"^\d+\s+\d+/\d+".to_string()),
        (AmountKind::Decimal, r"^\d+\.\d+".to_string()),
        (AmountKind::Fraction, r"^\d+/\d+".to_string()),
        (AmountKind::Whole, r"^\d+".to_string()),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(&pattern).unwrap()))
    .collect()
});

fn alternation(aliases: &[&str]) -> String {
    aliases
        .iter()
        .map(|alias| regex::escape(alias).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|")
}

/// Unit token directly after an amount, closed by a separator or the end.
static UNIT_AFTER_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^({})\.?(?:[\s,]+|$)",
        alternation(&SINGLE_WORD_ALIASES)
    ))
    .unwrap()
});

static MULTI_WORD_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^({})\.?(?:[\s,]+|$)",
        alternation(&MULTI_WORD_ALIASES)
    ))
    .unwrap()
});

/// Unit with no amount in front, e.g. "pinch of cinnamon".
static LEADING_UNIT: Lazy<Regex> = Lazy::new(|| {
    let mut aliases: Vec<&str> = MULTI_WORD_ALIASES.to_vec();
    aliases.extend(SINGLE_WORD_ALIASES.iter());
    Regex::new(&format!(
        r"(?i)^({})\.?\s+(?:of\s+)?",
        alternation(&aliases)
    ))
    .unwrap()
});

static LEADING_OF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^of\s+").unwrap());

type Rule = fn(&str) -> Option<AmountUnit>;

/// The cascade, in priority order.
const RULES: &[(MatchRule, Rule)] = &[
    (MatchRule::AmountWithUnit, amount_with_unit),
    (MatchRule::AmountWithMultiWordUnit, amount_with_multi_word_unit),
    (MatchRule::AmountOnly, amount_only),
    (MatchRule::UnitOnly, unit_only),
];

/// Splits `text` into amount, unit and the remaining ingredient text.
pub fn extract(text: &str) -> AmountUnit {
    let text = text.trim();
    for (rule, apply) in RULES {
        if let Some(mut found) = apply(text) {
            found.rule = Some(*rule);
            return found;
        }
    }
    AmountUnit {
        remainder: text.to_string(),
        ..Default::default()
    }
}

/// Matches the leading amount, returning it with its shape and the text
/// after it.
pub fn match_amount(text: &str) -> Option<(AmountKind, &str, &str)> {
    AMOUNT_PATTERNS.iter().find_map(|(kind, pattern)| {
        let found = pattern.find(text)?;
        let rest = &text[found.end()..];
        // "1.5-2" must not stop at "1.5", "1/2" must not stop at "1"
        match rest.chars().next() {
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | '–' | '—') => None,
            _ => Some((*kind, found.as_str(), rest)),
        }
    })
}

fn split_unit(pattern: &Regex, text: &str) -> Option<(String, String)> {
    let caps = pattern.captures(text)?;
    let surface = caps.get(1)?.as_str();
    let unit = units::normalize(surface)?;
    let rest = &text[caps.get(0)?.end()..];
    let remainder = LEADING_OF.replace(rest.trim(), "").trim().to_string();
    Some((unit, remainder))
}

fn amount_with_unit(text: &str) -> Option<AmountUnit> {
    let (_, amount, rest) = match_amount(text)?;
    let (unit, remainder) = split_unit(&UNIT_AFTER_AMOUNT, rest.trim_start())?;
    Some(AmountUnit {
        amount: Some(amount.to_string()),
        unit: Some(unit),
        remainder,
        rule: None,
    })
}

fn amount_with_multi_word_unit(text: &str) -> Option<AmountUnit> {
    let (_, amount, rest) = match_amount(text)?;
    let (unit, remainder) = split_unit(&MULTI_WORD_UNIT, rest.trim_start())?;
    Some(AmountUnit {
        amount: Some(amount.to_string()),
        unit: Some(unit),
        remainder,
        rule: None,
    })
}

fn amount_only(text: &str) -> Option<AmountUnit> {
    let (_, amount, rest) = match_amount(text)?;
    Some(AmountUnit {
        amount: Some(amount.to_string()),
        unit: None,
        remainder: rest.trim().to_string(),
        rule: None,
    })
}

fn unit_only(text: &str) -> Option<AmountUnit> {
    let (unit, remainder) = split_unit(&LEADING_UNIT, text)?;
    if remainder.is_empty() {
        return None;
    }
    Some(AmountUnit {
        amount: None,
        unit: Some(unit),
        remainder,
        rule: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(text: &str) -> (Option<String>, Option<String>, String) {
        let found = extract(text);
        (found.amount, found.unit, found.remainder)
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_amount_shapes() {
        assert_eq!(
            match_amount("1 1/2 cups").map(|(k, a, _)| (k, a)),
            Some((AmountKind::MixedFraction, "1 1/2"))
        );
        assert_eq!(
            match_amount("1.5 cups").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Decimal, "1.5"))
        );
        assert_eq!(
            match_amount("2-3 cloves").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Range, "2-3"))
        );
        assert_eq!(
            match_amount("2 to 3 cloves").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Range, "2 to 3"))
        );
        assert_eq!(
            match_amount("1.5-2 cups").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Range, "1.5-2"))
        );
        assert_eq!(
            match_amount("1/2 cup").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Fraction, "1/2"))
        );
        assert_eq!(
            match_amount("12 eggs").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Whole, "12"))
        );
        assert_eq!(match_amount("salt"), None);
    }

    #[test]
    fn test_ranges_with_mixed_fractions() {
        assert_eq!(
            match_amount("1 1/2-2 cups").map(|(k, a, _)| (k, a)),
            Some((AmountKind::Range, "1 1/2-2"))
        );
        assert_eq!(
            parts("1 1/2-2 cups flour"),
            (some("1 1/2-2"), some("cup"), "flour".into())
        );
        assert_eq!(
            parts("2 1/2 to 3 cups stock"),
            (some("2 1/2 to 3"), some("cup"), "stock".into())
        );
        assert_eq!(
            parts("1 - 1 1/2 tsp salt"),
            (some("1 - 1 1/2"), some("teaspoon"), "salt".into())
        );
    }

    #[test]
    fn test_amount_and_unit() {
        assert_eq!(parts("2 tbsp sugar"), (some("2"), some("tablespoon"), "sugar".into()));
        assert_eq!(parts("2 Tbsp. sugar"), (some("2"), some("tablespoon"), "sugar".into()));
        assert_eq!(parts("200g flour"), (some("200"), some("gram"), "flour".into()));
        assert_eq!(parts("1 1/2 cups milk"), (some("1 1/2"), some("cup"), "milk".into()));
        assert_eq!(parts("2 cups of flour"), (some("2"), some("cup"), "flour".into()));
        assert_eq!(parts("3 large eggs"), (some("3"), some("large"), "eggs".into()));
        assert_eq!(parts("1 cup"), (some("1"), some("cup"), "".into()));
    }

    #[test]
    fn test_multi_word_units() {
        let found = extract("8 fl oz cream");
        assert_eq!(found.rule, Some(MatchRule::AmountWithMultiWordUnit));
        assert_eq!(found.unit.as_deref(), Some("fluid ounce"));
        assert_eq!(found.remainder, "cream");

        assert_eq!(
            parts("2 fluid ounces whiskey"),
            (some("2"), some("fluid ounce"), "whiskey".into())
        );
    }

    #[test]
    fn test_amount_without_unit() {
        let found = extract("2 eggs");
        assert_eq!(found.rule, Some(MatchRule::AmountOnly));
        assert_eq!(found.amount.as_deref(), Some("2"));
        assert_eq!(found.unit, None);
        assert_eq!(found.remainder, "eggs");
    }

    #[test]
    fn test_unit_prefix_is_not_a_unit() {
        // "g" must not be read out of "garlic"
        assert_eq!(parts("2 garlic cloves"), (some("2"), None, "garlic cloves".into()));
        assert_eq!(parts("4 cans tomatoes"), (some("4"), some("can"), "tomatoes".into()));
    }

    #[test]
    fn test_unit_without_amount() {
        let found = extract("pinch of cinnamon");
        assert_eq!(found.rule, Some(MatchRule::UnitOnly));
        assert_eq!(found.amount, None);
        assert_eq!(found.unit.as_deref(), Some("pinch"));
        assert_eq!(found.remainder, "cinnamon");

        assert_eq!(parts("Dash of salt"), (None, some("dash"), "salt".into()));
        // a bare unit word is just an ingredient
        assert_eq!(parts("pinch"), (None, None, "pinch".into()));
    }

    #[test]
    fn test_nothing_recognised() {
        let found = extract("  salt to taste ");
        assert_eq!(found.rule, None);
        assert_eq!(found.remainder, "salt to taste");
    }
}
