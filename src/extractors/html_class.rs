use super::{element_text, first_integer, ExtractionMethod, Extractor, ParsingContext};
use crate::duration::{parse_duration, parse_duration_text};
use crate::model::ExtractedRecipe;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub struct HtmlClassExtractor;

/// Where a field value is read from on a matched element.
#[derive(Clone, Copy)]
enum Source {
    Text,
    Attr(&'static str),
    /// Attribute when present, text content otherwise (microdata tags)
    AttrOrText(&'static str),
}

/// A selector compiled once, kept with its source text for logging.
struct Candidate {
    css: &'static str,
    selector: Selector,
    source: Source,
}

fn candidates(raw: &[(&'static str, Source)]) -> Vec<Candidate> {
    raw.iter()
        .map(|&(css, source)| Candidate {
            css,
            selector: Selector::parse(css).unwrap(),
            source,
        })
        .collect()
}

fn text_candidates(raw: &[&'static str]) -> Vec<Candidate> {
    raw.iter()
        .map(|&css| Candidate {
            css,
            selector: Selector::parse(css).unwrap(),
            source: Source::Text,
        })
        .collect()
}

static TITLE: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[
        (".wprm-recipe-name", Source::Text),
        (".tasty-recipes-title", Source::Text),
        (".mv-create-title", Source::Text),
        (".wpzoom-recipe-card-title", Source::Text),
        (".recipe-card-title", Source::Text),
        (".recipe-title", Source::Text),
        (".recipe-name", Source::Text),
        ("[itemtype*='Recipe'] > [itemprop='name']", Source::AttrOrText("content")),
        ("[itemprop='name']", Source::AttrOrText("content")),
        ("h1", Source::Text),
        ("meta[property='og:title']", Source::Attr("content")),
        ("title", Source::Text),
    ])
});

static DESCRIPTION: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[
        (".wprm-recipe-summary", Source::Text),
        (".tasty-recipes-description", Source::Text),
        (".mv-create-description", Source::Text),
        (".recipe-summary", Source::Text),
        (".recipe-description", Source::Text),
        ("[itemprop='description']", Source::AttrOrText("content")),
        ("meta[name='description']", Source::Attr("content")),
        ("meta[property='og:description']", Source::Attr("content")),
    ])
});

static IMAGE: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[
        ("img[itemprop='image']", Source::Attr("src")),
        ("[itemprop='image']", Source::Attr("content")),
        (".wprm-recipe-image img", Source::Attr("src")),
        (".tasty-recipes-image img", Source::Attr("src")),
        (".mv-create-image img", Source::Attr("src")),
        ("meta[property='og:image']", Source::Attr("content")),
        ("meta[name='twitter:image']", Source::Attr("content")),
    ])
});

static CATEGORY: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[("[itemprop='recipeCategory']", Source::AttrOrText("content"))])
});

static CUISINE: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[("[itemprop='recipeCuisine']", Source::AttrOrText("content"))])
});

static SITE_NAME: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[("meta[property='og:site_name']", Source::Attr("content"))])
});

/// Item selectors in priority order. The first one that matches anything
/// supplies the whole list.
static INGREDIENT_ITEMS: Lazy<Vec<Candidate>> = Lazy::new(|| {
    text_candidates(&[
        "[itemprop='recipeIngredient']",
        "[itemprop='ingredients']",
        ".wprm-recipe-ingredient",
        ".tasty-recipes-ingredients li",
        ".mv-create-ingredients li",
        ".wpzoom-recipe-ingredients li",
        ".recipe-ingredients li",
        ".ingredients-list li",
        ".ingredient-list li",
        ".ingredients li",
    ])
});

static INSTRUCTION_ITEMS: Lazy<Vec<Candidate>> = Lazy::new(|| {
    text_candidates(&[
        ".wprm-recipe-instruction-text",
        ".wprm-recipe-instruction",
        "[itemprop='recipeInstructions'] li",
        "[itemprop='recipeInstructions']",
        ".tasty-recipes-instructions li",
        ".mv-create-instructions li",
        ".wpzoom-recipe-instructions li",
        ".recipe-instructions li",
        ".recipe-directions li",
        ".instructions li",
        ".directions li",
        ".recipe-method li",
    ])
});

static PREP_TIME: Lazy<Vec<Candidate>> = Lazy::new(|| {
    text_candidates(&[
        "[itemprop='prepTime']",
        ".wprm-recipe-prep_time-container",
        ".wprm-recipe-prep-time",
        ".tasty-recipes-prep-time",
        ".mv-create-time-prep",
        ".recipe-prep-time",
        ".prep-time",
    ])
});

static COOK_TIME: Lazy<Vec<Candidate>> = Lazy::new(|| {
    text_candidates(&[
        "[itemprop='cookTime']",
        ".wprm-recipe-cook_time-container",
        ".wprm-recipe-cook-time",
        ".tasty-recipes-cook-time",
        ".mv-create-time-active",
        ".recipe-cook-time",
        ".cook-time",
    ])
});

static TOTAL_TIME: Lazy<Vec<Candidate>> = Lazy::new(|| {
    text_candidates(&[
        "[itemprop='totalTime']",
        ".wprm-recipe-total_time-container",
        ".wprm-recipe-total-time",
        ".tasty-recipes-total-time",
        ".mv-create-time-total",
        ".recipe-total-time",
        ".total-time",
    ])
});

static SERVINGS: Lazy<Vec<Candidate>> = Lazy::new(|| {
    candidates(&[
        ("[itemprop='recipeYield']", Source::AttrOrText("content")),
        (".wprm-recipe-servings", Source::Text),
        (".tasty-recipes-yield", Source::Text),
        (".mv-create-yield", Source::Text),
        (".recipe-servings", Source::Text),
        (".recipe-yield", Source::Text),
    ])
});

static PREP_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bprep[^0-9]{0,20}?(\d+)\s*(hours?|hrs?|minutes?|mins?)\b").unwrap()
});

static COOK_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bcook[^0-9]{0,20}?(\d+)\s*(hours?|hrs?|minutes?|mins?)\b").unwrap()
});

static SERVINGS_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:serves|servings|yield)\s*:?\s*(\d+)").unwrap());

fn read_value(element: ElementRef, source: Source) -> Option<String> {
    let value = match source {
        Source::Text => element_text(element),
        Source::Attr(attr) => element.value().attr(attr)?.trim().to_string(),
        Source::AttrOrText(attr) => match element.value().attr(attr) {
            Some(value) => value.trim().to_string(),
            None => element_text(element),
        },
    };
    (!value.is_empty()).then_some(value)
}

/// First non-empty value over the candidates, tried in order.
fn first_value(document: &Html, candidates: &[Candidate]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let value = document
            .select(&candidate.selector)
            .find_map(|element| read_value(element, candidate.source))?;
        debug!("HtmlClassExtractor: Matched {}", candidate.css);
        Some(value)
    })
}

fn collect_items(document: &Html, item_selectors: &[Candidate], field: &str) -> Option<Vec<String>> {
    for candidate in item_selectors {
        let items: Vec<String> = document
            .select(&candidate.selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !items.is_empty() {
            debug!(
                "HtmlClassExtractor: Found {} {} using {}",
                items.len(),
                field,
                candidate.css
            );
            return Some(items);
        }
    }
    None
}

/// Duration from a dedicated time element: machine-readable `datetime`
/// or `content` first, then the visible text.
fn marked_duration(document: &Html, candidates: &[Candidate]) -> Option<u32> {
    candidates.iter().find_map(|candidate| {
        document.select(&candidate.selector).find_map(|element| {
            let attr = element.value().attr("datetime").or(element.value().attr("content"));
            let from_attr = attr.and_then(parse_duration);
            from_attr.or_else(|| {
                let text = element_text(element);
                parse_duration(&text).or_else(|| parse_duration_text(&text))
            })
        })
    })
}

/// Visible page text, skipping script and style contents.
fn page_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent()?;
            match parent.value().as_element().map(|el| el.name()) {
                Some("script" | "style" | "noscript") => None,
                _ => Some(&**text),
            }
        })
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn scan_minutes(pattern: &Regex, text: &str) -> Option<u32> {
    let caps = pattern.captures(text)?;
    let value: u32 = caps[1].parse().ok()?;
    if caps[2].to_ascii_lowercase().starts_with('h') {
        value.checked_mul(60)
    } else {
        Some(value)
    }
}

fn scan_servings(text: &str) -> Option<u32> {
    SERVINGS_TEXT.captures(text)?[1].parse().ok()
}

fn resolve_image(src: &str, page_url: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    match base.join(src) {
        Ok(resolved) => Some(resolved.to_string()),
        Err(e) => {
            debug!("HtmlClassExtractor: Dropping unresolvable image {src}: {e}");
            None
        }
    }
}

impl Extractor for HtmlClassExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::HtmlHeuristic
    }

    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe> {
        debug!("HtmlClassExtractor: Starting parse for URL: {}", context.url);
        let document = &context.document;

        let mut prep_time = marked_duration(document, &PREP_TIME);
        let mut cook_time = marked_duration(document, &COOK_TIME);
        let total_time = marked_duration(document, &TOTAL_TIME);

        let yield_text = first_value(document, &SERVINGS);
        let mut servings = yield_text.as_deref().and_then(first_integer);

        if prep_time.is_none() || cook_time.is_none() || servings.is_none() {
            // lower confidence than any dedicated marker
            let text = page_text(document);
            if prep_time.is_none() {
                prep_time = scan_minutes(&PREP_TEXT, &text);
            }
            if cook_time.is_none() {
                cook_time = scan_minutes(&COOK_TEXT, &text);
            }
            if servings.is_none() {
                servings = scan_servings(&text);
            }
            debug!(
                "HtmlClassExtractor: Free-text scan gave prep={prep_time:?} cook={cook_time:?} servings={servings:?}"
            );
        }

        Some(ExtractedRecipe {
            title: first_value(document, &TITLE),
            description: first_value(document, &DESCRIPTION),
            ingredients: collect_items(document, &INGREDIENT_ITEMS, "ingredients"),
            instructions: collect_items(document, &INSTRUCTION_ITEMS, "instructions"),
            prep_time,
            cook_time,
            total_time,
            servings,
            recipe_yield: yield_text,
            image: first_value(document, &IMAGE).and_then(|src| resolve_image(&src, &context.url)),
            source_name: first_value(document, &SITE_NAME),
            source_url: context.url.clone(),
            category: first_value(document, &CATEGORY),
            cuisine: first_value(document, &CUISINE),
            keywords: None,
            nutrition: None,
        })
    }
}
