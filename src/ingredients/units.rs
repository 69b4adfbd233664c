//! Static table of measurement units and the spellings accepted for them.

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Volume,
    Weight,
    Count,
    /// "small", "medium", "large": qualifies a countable item rather than
    /// measuring it
    Size,
}

#[derive(Debug)]
pub struct Unit {
    /// Singular name emitted in parsed output
    pub canonical: &'static str,
    pub kind: UnitKind,
    /// Accepted surface forms, matched case-insensitively
    pub aliases: &'static [&'static str],
}

impl Unit {
    /// Output spelling for a matched surface form. Size descriptors keep
    /// the lowercased surface form instead of a fixed canonical name.
    pub fn normalize(&self, surface: &str) -> String {
        match self.kind {
            UnitKind::Size => surface.to_lowercase(),
            _ => self.canonical.to_string(),
        }
    }

    fn matches(&self, surface: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(surface))
    }
}

pub static UNITS: &[Unit] = &[
    // volume
    Unit {
        canonical: "cup",
        kind: UnitKind::Volume,
        aliases: &["c", "cup", "cups"],
    },
    Unit {
        canonical: "tablespoon",
        kind: UnitKind::Volume,
        aliases: &["tbsp", "tablespoon", "tablespoons", "tbsps", "tbs", "tbl", "tbls"],
    },
    Unit {
        canonical: "teaspoon",
        kind: UnitKind::Volume,
        aliases: &["tsp", "teaspoon", "teaspoons", "tsps"],
    },
    Unit {
        canonical: "fluid ounce",
        kind: UnitKind::Volume,
        aliases: &["fl oz", "fluid ounce", "fluid ounces", "fl. oz"],
    },
    Unit {
        canonical: "milliliter",
        kind: UnitKind::Volume,
        aliases: &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
    },
    Unit {
        canonical: "liter",
        kind: UnitKind::Volume,
        aliases: &["l", "liter", "liters", "litre", "litres"],
    },
    Unit {
        canonical: "pint",
        kind: UnitKind::Volume,
        aliases: &["pt", "pint", "pints"],
    },
    Unit {
        canonical: "quart",
        kind: UnitKind::Volume,
        aliases: &["qt", "quart", "quarts"],
    },
    Unit {
        canonical: "gallon",
        kind: UnitKind::Volume,
        aliases: &["gal", "gallon", "gallons"],
    },
    // weight
    Unit {
        canonical: "ounce",
        kind: UnitKind::Weight,
        aliases: &["oz", "ounce", "ounces"],
    },
    Unit {
        canonical: "pound",
        kind: UnitKind::Weight,
        aliases: &["lb", "pound", "pounds", "lbs"],
    },
    Unit {
        canonical: "gram",
        kind: UnitKind::Weight,
        aliases: &["g", "gram", "grams", "gr", "gramme", "grammes"],
    },
    Unit {
        canonical: "kilogram",
        kind: UnitKind::Weight,
        aliases: &["kg", "kilogram", "kilograms", "kilo", "kilos"],
    },
    // count
    Unit {
        canonical: "pinch",
        kind: UnitKind::Count,
        aliases: &["pinch", "pinches"],
    },
    Unit {
        canonical: "dash",
        kind: UnitKind::Count,
        aliases: &["dash", "dashes"],
    },
    Unit {
        canonical: "clove",
        kind: UnitKind::Count,
        aliases: &["clove", "cloves"],
    },
    Unit {
        canonical: "can",
        kind: UnitKind::Count,
        aliases: &["can", "cans"],
    },
    Unit {
        canonical: "package",
        kind: UnitKind::Count,
        aliases: &["package", "packages", "pkg", "packet", "packets"],
    },
    Unit {
        canonical: "slice",
        kind: UnitKind::Count,
        aliases: &["slice", "slices"],
    },
    Unit {
        canonical: "piece",
        kind: UnitKind::Count,
        aliases: &["piece", "pieces"],
    },
    Unit {
        canonical: "stick",
        kind: UnitKind::Count,
        aliases: &["stick", "sticks"],
    },
    Unit {
        canonical: "bunch",
        kind: UnitKind::Count,
        aliases: &["bunch", "bunches"],
    },
    Unit {
        canonical: "sprig",
        kind: UnitKind::Count,
        aliases: &["sprig", "sprigs"],
    },
    Unit {
        canonical: "handful",
        kind: UnitKind::Count,
        aliases: &["handful", "handfuls"],
    },
    // size descriptors
    Unit {
        canonical: "small",
        kind: UnitKind::Size,
        aliases: &["small"],
    },
    Unit {
        canonical: "medium",
        kind: UnitKind::Size,
        aliases: &["medium"],
    },
    Unit {
        canonical: "large",
        kind: UnitKind::Size,
        aliases: &["large"],
    },
];

/// Every single-word alias, longest first so the regex alternation prefers
/// "tablespoons" over "tablespoon".
pub static SINGLE_WORD_ALIASES: Lazy<Vec<&'static str>> =
    Lazy::new(|| sorted_aliases(|alias| !alias.contains(' ')));

/// Aliases spanning a space ("fl oz", "fluid ounces").
pub static MULTI_WORD_ALIASES: Lazy<Vec<&'static str>> =
    Lazy::new(|| sorted_aliases(|alias| alias.contains(' ')));

fn sorted_aliases(keep: impl Fn(&str) -> bool) -> Vec<&'static str> {
    let mut aliases: Vec<&'static str> = UNITS
        .iter()
        .flat_map(|unit| unit.aliases.iter().copied())
        .filter(|alias| keep(alias))
        .collect();
    aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    aliases
}

/// Looks up the unit a surface form belongs to. Whitespace runs and a
/// trailing period are ignored ("Tbsp.", "fl  oz").
pub fn lookup(surface: &str) -> Option<&'static Unit> {
    let cleaned = surface
        .trim()
        .trim_end_matches('.')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    UNITS.iter().find(|unit| unit.matches(&cleaned))
}

/// Canonical output spelling for a surface form, if it is a known unit.
pub fn normalize(surface: &str) -> Option<String> {
    let cleaned = surface.trim().trim_end_matches('.');
    lookup(cleaned).map(|unit| unit.normalize(cleaned))
}
