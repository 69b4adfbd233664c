use super::{first_integer, ExtractionMethod, Extractor, ParsingContext};
use crate::duration::parse_duration;
use crate::model::{ExtractedRecipe, Nutrition};
use html_escape::decode_html_entities;
use log::debug;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

pub struct JsonLdExtractor;

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

// Every field is optional and every union has an `Other` arm, so an odd
// shape in one field drops that field instead of the whole recipe. Arrays
// are tried before objects: serde also reads structs from sequences.

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<StringOrList>,
    headline: Option<StringOrList>,
    description: Option<DescriptionType>,
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    ingredients: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime")]
    prep_time: Option<StringOrList>,
    #[serde(rename = "cookTime")]
    cook_time: Option<StringOrList>,
    #[serde(rename = "totalTime")]
    total_time: Option<StringOrList>,
    #[serde(rename = "recipeCategory")]
    recipe_category: Option<StringOrList>,
    #[serde(rename = "recipeCuisine")]
    recipe_cuisine: Option<StringOrList>,
    keywords: Option<StringOrList>,
    author: Option<Person>,
    publisher: Option<Person>,
    nutrition: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    String(String),
    Multiple(Vec<String>),
    Other(Value),
}

impl StringOrList {
    fn items(&self) -> Vec<&str> {
        match self {
            StringOrList::String(s) => vec![s.as_str()],
            StringOrList::Multiple(v) => v.iter().map(String::as_str).collect(),
            StringOrList::Other(_) => Vec::new(),
        }
    }

    fn first(&self) -> Option<&str> {
        self.items().into_iter().map(str::trim).find(|s| !s.is_empty())
    }

    fn joined(&self) -> Option<String> {
        let items: Vec<String> = self
            .items()
            .into_iter()
            .map(decode_html_symbols)
            .filter(|s| !s.is_empty())
            .collect();
        (!items.is_empty()).then(|| items.join(", "))
    }
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "@id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Multiple(Vec<ImageType>),
    Object(ImageObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    String(String),
    Object(IngredientObject),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    String(String),
    Multiple(Vec<IngredientEntry>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionItem>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    String(String),
    Nested(Vec<InstructionItem>),
    Section(HowToSection),
    Step(HowToStep),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<InstructionItem>,
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    text: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Number(f64),
    String(String),
    Multiple(Vec<RecipeYield>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct PersonObject {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Person {
    Name(String),
    Multiple(Vec<Person>),
    Object(PersonObject),
    Other(Value),
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn decode_html_symbols(text: &str) -> String {
    // entities arrive double-encoded often enough ("&amp;amp;") to decode twice
    decode_html_entities(&decode_html_entities(text))
        .trim()
        .to_string()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn non_empty_list(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resolve_image(image: &ImageType) -> Option<String> {
    match image {
        ImageType::String(url) => non_empty(decode_html_symbols(url)),
        ImageType::Object(obj) => obj
            .url
            .as_deref()
            .or(obj.id.as_deref())
            .map(decode_html_symbols)
            .and_then(non_empty),
        ImageType::Multiple(images) => images.iter().find_map(resolve_image),
        ImageType::Other(_) => None,
    }
}

fn person_name(person: &Person) -> Option<String> {
    match person {
        Person::Name(name) => non_empty(decode_html_symbols(name)),
        Person::Object(obj) => obj
            .name
            .as_deref()
            .map(decode_html_symbols)
            .and_then(non_empty),
        Person::Multiple(people) => {
            let names: Vec<String> = people.iter().filter_map(person_name).collect();
            non_empty(names.join(", "))
        }
        Person::Other(_) => None,
    }
}

fn ingredient_lines(ingredients: RecipeIngredients) -> Vec<String> {
    match ingredients {
        RecipeIngredients::String(block) => block.lines().map(decode_html_symbols).collect(),
        RecipeIngredients::Multiple(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                IngredientEntry::String(line) => Some(decode_html_symbols(&line)),
                IngredientEntry::Object(obj) => {
                    let name = decode_html_symbols(&obj.name);
                    match obj.amount.as_ref().and_then(value_to_text) {
                        Some(amount) if !name.is_empty() => Some(format!("{amount} {name}")),
                        _ => Some(name),
                    }
                }
                IngredientEntry::Other(_) => None,
            })
            .collect(),
        RecipeIngredients::Other(_) => Vec::new(),
    }
    .into_iter()
    .filter(|line| !line.is_empty())
    .collect()
}

fn collect_steps(item: InstructionItem, steps: &mut Vec<String>) {
    match item {
        InstructionItem::String(text) => steps.push(decode_html_symbols(&text)),
        InstructionItem::Section(section) => {
            for step in section.item_list_element {
                collect_steps(step, steps);
            }
        }
        InstructionItem::Step(step) => {
            // text wins over name; a step with neither is dropped
            if let Some(text) = step
                .text
                .as_deref()
                .map(decode_html_symbols)
                .and_then(non_empty)
                .or_else(|| step.name.as_deref().map(decode_html_symbols))
            {
                steps.push(text);
            }
        }
        InstructionItem::Nested(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        InstructionItem::Other(_) => {}
    }
}

fn instruction_lines(instructions: RecipeInstructions) -> Vec<String> {
    let mut steps = Vec::new();
    match instructions {
        RecipeInstructions::String(block) => {
            steps.extend(block.lines().map(decode_html_symbols));
        }
        RecipeInstructions::Multiple(items) => {
            for item in items {
                collect_steps(item, &mut steps);
            }
        }
        RecipeInstructions::Other(_) => {}
    }
    steps.retain(|step| !step.is_empty());
    steps
}

/// Returns `(servings, yield)`.
fn map_yield(recipe_yield: &RecipeYield) -> (Option<u32>, Option<String>) {
    match recipe_yield {
        RecipeYield::Number(n) if n.is_finite() && *n > 0.0 => (Some(n.round() as u32), None),
        RecipeYield::Number(_) => (None, None),
        RecipeYield::String(s) => {
            let text = decode_html_symbols(s);
            (first_integer(&text), non_empty(text))
        }
        RecipeYield::Multiple(items) => {
            let mapped: Vec<_> = items.iter().map(map_yield).collect();
            let servings = mapped.iter().find_map(|(servings, _)| *servings);
            // prefer the descriptive form ("15 Stück") over a bare number
            let texts: Vec<&String> = mapped.iter().filter_map(|(_, y)| y.as_ref()).collect();
            let text = texts
                .iter()
                .find(|t| t.contains(char::is_alphabetic))
                .or_else(|| texts.first())
                .map(|t| t.to_string());
            (servings, text)
        }
        RecipeYield::Other(_) => (None, None),
    }
}

fn map_keywords(keywords: &StringOrList) -> Option<Vec<String>> {
    let list: Vec<String> = match keywords {
        StringOrList::String(s) => s.split(',').map(decode_html_symbols).collect(),
        StringOrList::Multiple(v) => v.iter().map(|k| decode_html_symbols(k)).collect(),
        StringOrList::Other(_) => Vec::new(),
    };
    non_empty_list(list.into_iter().filter(|k| !k.is_empty()).collect())
}

fn map_nutrition(nutrition: &Value) -> Option<Nutrition> {
    let field = |key: &str| nutrition.get(key).and_then(value_to_text);
    let mapped = Nutrition {
        calories: field("calories"),
        protein: field("proteinContent"),
        fat: field("fatContent"),
        carbohydrates: field("carbohydrateContent"),
    };
    (!mapped.is_empty()).then_some(mapped)
}

fn map_duration(duration: Option<&StringOrList>) -> Option<u32> {
    duration.and_then(StringOrList::first).and_then(parse_duration)
}

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe, url: &str) -> ExtractedRecipe {
        let title = json_ld_recipe
            .name
            .as_ref()
            .or(json_ld_recipe.headline.as_ref())
            .and_then(StringOrList::first)
            .map(decode_html_symbols)
            .and_then(non_empty);

        let description = json_ld_recipe.description.and_then(|desc| match desc {
            DescriptionType::String(d) => non_empty(decode_html_symbols(&d)),
            DescriptionType::Object(d) => non_empty(decode_html_symbols(&d.text)),
            DescriptionType::Other(_) => None,
        });

        let ingredients = json_ld_recipe
            .recipe_ingredient
            .or(json_ld_recipe.ingredients)
            .map(ingredient_lines)
            .and_then(non_empty_list);

        let instructions = json_ld_recipe
            .recipe_instructions
            .map(instruction_lines)
            .and_then(non_empty_list);

        let (servings, recipe_yield) = json_ld_recipe
            .recipe_yield
            .as_ref()
            .map(map_yield)
            .unwrap_or((None, None));

        let source_name = json_ld_recipe
            .author
            .as_ref()
            .and_then(person_name)
            .or_else(|| json_ld_recipe.publisher.as_ref().and_then(person_name));

        ExtractedRecipe {
            title,
            description,
            ingredients,
            instructions,
            prep_time: map_duration(json_ld_recipe.prep_time.as_ref()),
            cook_time: map_duration(json_ld_recipe.cook_time.as_ref()),
            total_time: map_duration(json_ld_recipe.total_time.as_ref()),
            servings,
            recipe_yield,
            image: json_ld_recipe.image.as_ref().and_then(resolve_image),
            source_name,
            source_url: url.to_string(),
            category: json_ld_recipe
                .recipe_category
                .as_ref()
                .and_then(StringOrList::joined),
            cuisine: json_ld_recipe
                .recipe_cuisine
                .as_ref()
                .and_then(StringOrList::joined),
            keywords: json_ld_recipe.keywords.as_ref().and_then(map_keywords),
            nutrition: json_ld_recipe.nutrition.as_ref().and_then(map_nutrition),
        }
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

fn recipe_in_graph(value: &Value) -> Option<&Value> {
    value
        .get("@graph")
        .and_then(Value::as_array)
        .and_then(|graph| graph.iter().find(|item| is_recipe_type(item)))
}

/// Locates a `Recipe` node: the root itself, an element of a root array,
/// or an entry of a `@graph` container.
fn find_recipe_node(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        debug!("JsonLdExtractor: JSON-LD is an array of {} items", items.len());
        items
            .iter()
            .find(|item| is_recipe_type(item))
            .or_else(|| items.iter().find_map(recipe_in_graph))
    } else if is_recipe_type(json_ld) {
        debug!("JsonLdExtractor: Found Recipe type in root");
        Some(json_ld)
    } else {
        recipe_in_graph(json_ld)
    }
}

/// Parses one script body, retrying once on a sanitized copy.
fn parse_json_block(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(value),
        Err(first_error) => {
            let cleaned = sanitize_json(raw);
            match serde_json::from_str::<Value>(&cleaned) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(
                        "JsonLdExtractor: Failed to parse JSON-LD ({first_error}), sanitized copy failed too: {e}"
                    );
                    None
                }
            }
        }
    }
}

/// First recipe node across all JSON-LD blocks, in document order.
fn find_recipe_json(document: &Html) -> Option<Value> {
    for (index, script) in document.select(&SCRIPT_SELECTOR).enumerate() {
        let Some(json_ld) = parse_json_block(&script.inner_html()) else {
            debug!("JsonLdExtractor: Skipping unparseable script {index}");
            continue;
        };
        if let Some(recipe) = find_recipe_node(&json_ld) {
            debug!("JsonLdExtractor: Found recipe in script {index}");
            return Some(recipe.clone());
        }
    }
    None
}

impl Extractor for JsonLdExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::StructuredData
    }

    fn extract(&self, context: &ParsingContext) -> Option<ExtractedRecipe> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let recipe_json = find_recipe_json(&context.document)?;

        match JsonLdRecipe::try_from(&recipe_json) {
            Ok(recipe) => Some(self.convert_to_recipe(recipe, &context.url)),
            Err(e) => {
                debug!("JsonLdExtractor: Failed to convert to JsonLdRecipe: {e}");
                None
            }
        }
    }
}

/// Repairs the usual hand-written JSON-LD faults: HTML comment wrappers,
/// leading junk, raw newlines inside strings, trailing commas and missing
/// commas between adjacent values.
fn sanitize_json(json_str: &str) -> String {
    let mut trimmed = json_str
        .trim()
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .trim();
    if !trimmed.starts_with(['{', '[']) {
        if let Some(start) = trimmed.find('{') {
            trimmed = &trimmed[start..];
        }
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in trimmed.chars() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    cleaned.push(c);
                }
                '\\' => {
                    escaped = true;
                    cleaned.push(c);
                }
                '"' => {
                    in_string = false;
                    cleaned.push(c);
                }
                '\n' => cleaned.push_str("\\n"),
                '\t' => cleaned.push_str("\\t"),
                '\r' => {}
                _ => cleaned.push(c),
            }
            continue;
        }

        match c {
            '"' | '{' | '[' => {
                if ends_with_value(&cleaned) {
                    cleaned.push(',');
                }
                in_string = c == '"';
                cleaned.push(c);
            }
            '}' | ']' => {
                cleaned.truncate(cleaned.trim_end().len());
                if cleaned.ends_with(',') {
                    cleaned.pop();
                }
                cleaned.push(c);
            }
            _ => cleaned.push(c),
        }
    }

    cleaned
}

/// Whether the text so far ends with a complete value, so a following
/// string or container needs a separating comma.
fn ends_with_value(text: &str) -> bool {
    matches!(text.trim_end().chars().last(), Some('"' | '}' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_html_document(json_ld: &str) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        )
    }

    fn extract(json_ld: &str) -> Option<ExtractedRecipe> {
        let context = ParsingContext::new("http://example.com", &create_html_document(json_ld));
        JsonLdExtractor.extract(&context)
    }

    #[test]
    fn test_no_json_ld() {
        let context = ParsingContext::new("http://example.com", "<html><body>Test</body></html>");
        assert!(JsonLdExtractor.extract(&context).is_none());
    }

    #[test]
    fn test_parse_basic_recipe() {
        let json_ld = r#"
        {
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "description": "Delicious homemade cookies",
            "image": "https://example.com/cookie.jpg",
            "recipeIngredient": [" 2 cups flour ", "1 cup sugar", "", "chocolate chips"],
            "recipeInstructions": ["Mix ingredients.", "Bake at 350F for 10 minutes."],
            "author": "Jane Doe",
            "prepTime": "PT15M",
            "cookTime": "PT1H30M",
            "recipeYield": "24 cookies",
            "recipeCategory": "Dessert",
            "recipeCuisine": "American",
            "keywords": "chocolate, cookies , baking"
        }
        "#;

        let result = extract(json_ld).unwrap();

        assert_eq!(result.title.as_deref(), Some("Chocolate Chip Cookies"));
        assert_eq!(result.description.as_deref(), Some("Delicious homemade cookies"));
        assert_eq!(result.image.as_deref(), Some("https://example.com/cookie.jpg"));
        assert_eq!(
            result.ingredients.unwrap(),
            vec!["2 cups flour", "1 cup sugar", "chocolate chips"]
        );
        assert_eq!(
            result.instructions.unwrap(),
            vec!["Mix ingredients.", "Bake at 350F for 10 minutes."]
        );
        assert_eq!(result.source_name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.source_url, "http://example.com");
        assert_eq!(result.prep_time, Some(15));
        assert_eq!(result.cook_time, Some(90));
        assert_eq!(result.total_time, None);
        assert_eq!(result.recipe_yield.as_deref(), Some("24 cookies"));
        assert_eq!(result.servings, Some(24));
        assert_eq!(result.category.as_deref(), Some("Dessert"));
        assert_eq!(result.cuisine.as_deref(), Some("American"));
        assert_eq!(
            result.keywords.unwrap(),
            vec!["chocolate", "cookies", "baking"]
        );
    }

    #[test]
    fn test_parse_recipe_with_array() {
        let json_ld = r#"
        [
            {
                "@type": "WebSite",
                "name": "Recipe Website"
            },
            {
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Pasta Carbonara",
                "image": [
                    {"@type": "ImageObject", "url": "https://example.com/carbonara1.jpg"},
                    "https://example.com/carbonara2.jpg"
                ],
                "recipeIngredient": ["spaghetti", "eggs"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Cook pasta"},
                    {"@type": "HowToStep", "name": "Fry bacon"},
                    {"@type": "HowToStep", "text": "  "},
                    "Combine all ingredients"
                ],
                "author": {"@type": "Person", "name": "Chef Mario"},
                "recipeYield": 4,
                "keywords": ["quick", " italian "]
            }
        ]
        "#;

        let result = extract(json_ld).unwrap();

        assert_eq!(result.title.as_deref(), Some("Pasta Carbonara"));
        assert_eq!(result.image.as_deref(), Some("https://example.com/carbonara1.jpg"));
        assert_eq!(
            result.instructions.unwrap(),
            vec!["Cook pasta", "Fry bacon", "Combine all ingredients"]
        );
        assert_eq!(result.source_name.as_deref(), Some("Chef Mario"));
        assert_eq!(result.servings, Some(4));
        assert_eq!(result.recipe_yield, None);
        assert_eq!(result.keywords.unwrap(), vec!["quick", "italian"]);
    }

    #[test]
    fn test_recipe_inside_graph() {
        let json_ld = r#"
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": "Organization", "name": "Site", "logo": {"@id": "https://example.com/#logo"}},
                {
                    "@type": ["Recipe", "NewsArticle"],
                    "name": "Graph Soup",
                    "recipeIngredient": ["water"],
                    "publisher": {"@type": "Organization", "name": "Soup Weekly"},
                    "image": {"@id": "https://example.com/soup.jpg"}
                }
            ]
        }
        "#;

        let result = extract(json_ld).unwrap();
        assert_eq!(result.title.as_deref(), Some("Graph Soup"));
        assert_eq!(result.source_name.as_deref(), Some("Soup Weekly"));
        assert_eq!(result.image.as_deref(), Some("https://example.com/soup.jpg"));
    }

    #[test]
    fn test_sections_are_flattened() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Layer Cake",
            "recipeInstructions": [
                {
                    "@type": "HowToSection",
                    "name": "Cake",
                    "itemListElement": [
                        {"@type": "HowToStep", "text": "Bake the layers"},
                        {"@type": "HowToStep", "text": "Let cool"}
                    ]
                },
                {
                    "@type": "HowToSection",
                    "name": "Frosting",
                    "itemListElement": [
                        {"@type": "HowToStep", "text": "Whip the cream"}
                    ]
                }
            ]
        }
        "#;

        let result = extract(json_ld).unwrap();
        assert_eq!(
            result.instructions.unwrap(),
            vec!["Bake the layers", "Let cool", "Whip the cream"]
        );
    }

    #[test]
    fn test_yield_variations() {
        let cases = [
            (r#"["15", "15 Stück"]"#, Some(15), Some("15 Stück")),
            (r#"["4 servings", "4"]"#, Some(4), Some("4 servings")),
            (r#""serves 4-6""#, Some(4), Some("serves 4-6")),
            (r#""a dozen""#, None, Some("a dozen")),
            ("6", Some(6), None),
        ];
        for (raw, servings, recipe_yield) in cases {
            let json_ld = format!(
                r#"{{"@type": "Recipe", "name": "Yield", "recipeIngredient": ["x"], "recipeYield": {raw}}}"#
            );
            let result = extract(&json_ld).unwrap();
            assert_eq!(result.servings, servings, "servings for {raw}");
            assert_eq!(result.recipe_yield.as_deref(), recipe_yield, "yield for {raw}");
        }
    }

    #[test]
    fn test_nutrition_fields_renamed() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Salad",
            "recipeIngredient": ["lettuce"],
            "nutrition": {
                "@type": "NutritionInformation",
                "calories": "120 kcal",
                "proteinContent": "3 g",
                "fatContent": "",
                "carbohydrateContent": 12
            }
        }
        "#;

        let nutrition = extract(json_ld).unwrap().nutrition.unwrap();
        assert_eq!(nutrition.calories.as_deref(), Some("120 kcal"));
        assert_eq!(nutrition.protein.as_deref(), Some("3 g"));
        assert_eq!(nutrition.fat, None);
        assert_eq!(nutrition.carbohydrates.as_deref(), Some("12"));
    }

    #[test]
    fn test_odd_field_shapes_do_not_drop_recipe() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": "Odd &amp; Ends",
            "image": 42,
            "author": [{"@type": "Person", "name": "One"}, {"@type": "Person", "name": "Two"}],
            "recipeIngredient": ["1 egg", {"name": "flour", "amount": "2 cups"}, 7],
            "recipeInstructions": "Whisk.\nFry.",
            "cookTime": {"unexpected": true},
            "prepTime": "soon",
            "recipeCategory": ["Breakfast", "Brunch"]
        }
        "#;

        let result = extract(json_ld).unwrap();
        assert_eq!(result.title.as_deref(), Some("Odd & Ends"));
        assert_eq!(result.image, None);
        assert_eq!(result.source_name.as_deref(), Some("One, Two"));
        assert_eq!(result.ingredients.unwrap(), vec!["1 egg", "2 cups flour"]);
        assert_eq!(result.instructions.unwrap(), vec!["Whisk.", "Fry."]);
        assert_eq!(result.cook_time, None);
        assert_eq!(result.prep_time, None);
        assert_eq!(result.category.as_deref(), Some("Breakfast, Brunch"));
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{ this is not json </script>
            <script type="application/ld+json">{"@type": "Organization", "name": "Site"}</script>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Second Block", "recipeIngredient": ["rice"]}
            </script>
            </head><body></body></html>
        "#;
        let context = ParsingContext::new("http://example.com", html);
        let result = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(result.title.as_deref(), Some("Second Block"));
    }

    #[test]
    fn test_first_recipe_block_wins_even_if_incomplete() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Title Only"}</script>
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Full", "recipeIngredient": ["rice"]}
            </script>
            </head><body></body></html>
        "#;
        let context = ParsingContext::new("http://example.com", html);
        let result = JsonLdExtractor.extract(&context).unwrap();
        assert_eq!(result.title.as_deref(), Some("Title Only"));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_sanitize_json_repairs() {
        let fixed = sanitize_json(r#"<!-- {"a": "line one
line two", "b": [1, 2,], "c": {"d": 1,} "e": "f"} -->"#);
        let value: Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["a"], "line one\nline two");
        assert_eq!(value["b"], serde_json::json!([1, 2]));
        assert_eq!(value["e"], "f");
    }
}
