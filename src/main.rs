use log::error;
use recipe_import::{
    format_ingredient, load_config, parse_ingredient_line, ExtractedRecipe, RecipeUrlExtractor,
};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage:
  recipe-import <url>                 print the recipe as JSON
  recipe-import --parse <url>         also print each ingredient parsed
  recipe-import ingredient <line>...  parse ingredient lines";

fn print_parsed_ingredients(recipe: &ExtractedRecipe) {
    for line in recipe.ingredients.iter().flatten() {
        let parsed = parse_ingredient_line(line);
        println!(
            "{:<10} {:<12} {}",
            parsed.amount.as_deref().unwrap_or("-"),
            parsed.unit.as_deref().unwrap_or("-"),
            format_ingredient(&parsed)
        );
    }
}

async fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match args {
        [command, lines @ ..] if command == "ingredient" && !lines.is_empty() => {
            for line in lines {
                println!("{}", serde_json::to_string(&parse_ingredient_line(line))?);
            }
            Ok(())
        }
        [flag, url] if flag == "--parse" => {
            let extractor = RecipeUrlExtractor::builder().config(load_config()?).build()?;
            let recipe = extractor.extract_from_url(url).await?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            print_parsed_ingredients(&recipe);
            Ok(())
        }
        [url] if !url.starts_with('-') => {
            let extractor = RecipeUrlExtractor::builder().config(load_config()?).build()?;
            let (recipe, method) = extractor.extract_with_method(url).await?;
            log::debug!("Extracted via {method:?}");
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        _ => Err(USAGE.into()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
