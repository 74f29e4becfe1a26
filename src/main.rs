use clap::Parser;
use log::{debug, error};

use recipe_box::{
    edits, render, AppConfig, KeyValueStorage, Recipe, RecipeDraft, RecipeError, RecipeStore,
    SaveOutcome, StorageBackend,
};

mod cli;

use crate::cli::{Cli, Command, OutputFormat};

type Store = RecipeStore<Box<dyn KeyValueStorage>>;

fn main() {
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => fail(RecipeError::Config(e)),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.backend = StorageBackend::File;
        config.storage.path = dir.clone();
    }

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("Using storage {:?}", config.storage);

    // The store is owned here and lent to each command
    let mut store: Store = RecipeStore::new(config.storage.build_persistence());
    store.subscribe(|recipes| debug!("Recipe collection now holds {} recipes", recipes.len()));
    store.hydrate();

    if let Err(e) = run(cli.command, cli.format, &mut store) {
        error!("{}", e);
        fail(e);
    }
}

/// Print the error notification and exit non-zero
fn fail(e: RecipeError) -> ! {
    eprintln!("✗ {}", e);
    std::process::exit(1)
}

fn run(command: Command, format: OutputFormat, store: &mut Store) -> Result<(), RecipeError> {
    match command {
        Command::List => {
            match format {
                OutputFormat::Text => print!("{}", render::render_list(store.get_all())),
                OutputFormat::Json => print_json(&store.get_all()),
            }
            Ok(())
        }
        Command::Show(args) => {
            let recipe = store.find(args.id);
            match format {
                OutputFormat::Text => println!("{}", render::render_detail(recipe)),
                OutputFormat::Json => print_json(&recipe),
            }
            Ok(())
        }
        Command::Add(args) => {
            let draft = RecipeDraft {
                name: args.name,
                ingredients: args.ingredients,
                steps: args.steps,
                image: args.image,
            };
            let (next, id) = edits::create_recipe(store.get_all(), &draft, edits::now_millis())?;
            let outcome = store.replace_all(next);
            report(format, store.find(id), "Recipe added successfully!", outcome);
            Ok(())
        }
        Command::Toggle(args) => {
            let outcome =
                store.apply(|recipes| edits::toggle_ingredient(recipes, args.id, args.index))?;
            report(
                format,
                store.find(args.id),
                "Ingredient availability updated!",
                outcome,
            );
            Ok(())
        }
        Command::EditSteps(args) => {
            let Some(steps) = args.steps else {
                let recipe = store.find(args.id);
                match format {
                    OutputFormat::Text => println!("{}", render::render_step_text(recipe)),
                    OutputFormat::Json => print_json(&recipe.map(|r| &r.steps)),
                }
                return Ok(());
            };
            let outcome = store.apply(|recipes| edits::replace_steps(recipes, args.id, &steps))?;
            report(
                format,
                store.find(args.id),
                "Steps updated successfully!",
                outcome,
            );
            Ok(())
        }
    }
}

/// Print the success notification and the affected recipe
fn report(format: OutputFormat, recipe: Option<&Recipe>, message: &str, outcome: SaveOutcome) {
    match format {
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(recipe) = recipe {
                println!("\n{}", render::render_detail(Some(recipe)));
            }
        }
        OutputFormat::Json => print_json(&recipe),
    }

    if outcome != SaveOutcome::Persisted {
        eprintln!("✗ Changes were kept in memory but could not be saved");
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize output: {}", e),
    }
}
