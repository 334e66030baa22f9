use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use pantry_engine::speech::VoiceQuery;
use pantry_engine::{
    CategoryFilter, CategoryLabel, DifficultyFilter, EngineConfig, Pantry, PantryEngine,
    PantryItem, RecipeRecommendation, SortMode, SpeechSignal, UserProfile,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("pantry-engine")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pantry categorization, recipe preference filtering and voice query reconciliation")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("pantry-engine.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .value_name("NAME")
                .help("Print the pantry category of each ingredient name")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("pantry")
                .long("pantry")
                .value_name("FILE")
                .help("JSON array of pantry items to group by category")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("recipes")
                .long("recipes")
                .value_name("FILE")
                .help("JSON array of recipe recommendations to filter")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .value_name("FILE")
                .help("JSON user profile applied to --recipes and --pantry")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("difficulty")
                .long("difficulty")
                .value_name("LEVEL")
                .help("Difficulty filter: all, easy, medium or hard")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .value_name("MODE")
                .help("Sort mode: none, timeAsc or timeDesc")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("transcript")
                .long("transcript")
                .value_name("FILE")
                .help("JSON array of speech signals to replay through a voice session")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    env_logger::Builder::from_default_env()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("pantry-engine.yaml");

    let config = match EngineConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if !verbose {
        if let Ok(level) = config.logging.level.parse::<LevelFilter>() {
            // The logger filters at Info already; config can only quiet it.
            log::set_max_level(level.min(LevelFilter::Info));
        }
    }

    if matches.get_flag("test-config") {
        test_config(config);
        return;
    }

    let engine = match PantryEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error building engine: {e:#}");
            process::exit(1);
        }
    };

    let mut ran = false;

    if let Some(names) = matches.get_many::<String>("classify") {
        ran = true;
        for name in names {
            println!("{name}: {}", engine.classify(name));
        }
    }

    if let Err(e) = run_fixtures(&engine, &matches, &mut ran).await {
        eprintln!("❌ {e:#}");
        process::exit(1);
    }

    if !ran {
        println!("Nothing to do. Use --classify, --pantry, --recipes or --transcript (see --help).");
    }
}

async fn run_fixtures(
    engine: &PantryEngine,
    matches: &clap::ArgMatches,
    ran: &mut bool,
) -> anyhow::Result<()> {
    let profile: Option<UserProfile> = match matches.get_one::<String>("profile") {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    if let Some(path) = matches.get_one::<String>("pantry") {
        *ran = true;
        let items: Vec<PantryItem> = read_json(path)?;
        print_pantry(engine, Pantry::new(items), profile.as_ref());
    }

    if let Some(path) = matches.get_one::<String>("recipes") {
        *ran = true;
        let recipes: Vec<RecipeRecommendation> = read_json(path)?;
        let difficulty = match matches.get_one::<String>("difficulty") {
            Some(value) => value.parse()?,
            None => engine.config().recipes.difficulty,
        };
        let sort = match matches.get_one::<String>("sort") {
            Some(value) => value.parse()?,
            None => engine.config().recipes.sort,
        };
        print_recipes(engine, &recipes, profile.as_ref(), difficulty, sort);
    }

    if let Some(path) = matches.get_one::<String>("transcript") {
        *ran = true;
        let signals: Vec<SpeechSignal> = read_json(path)?;
        replay_transcript(engine, signals).await;
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {path}"))
}

fn test_config(config: EngineConfig) {
    println!("🔍 Testing configuration...");
    println!();

    let warnings = config.warnings();
    match PantryEngine::new(config) {
        Ok(engine) => {
            let classifier = engine.classifier();
            for label in CategoryLabel::PRECEDENCE {
                println!(
                    "  {:<12} {} keywords",
                    label.as_str(),
                    classifier.keyword_count(label)
                );
            }
            println!("All forbidden-term patterns compiled successfully.");
        }
        Err(e) => {
            println!("❌ Configuration validation failed:");
            println!("Error: {e:#}");
            process::exit(1);
        }
    }

    if warnings.is_empty() {
        println!("✅ Configuration is valid");
    } else {
        println!("⚠️  {} warning(s):", warnings.len());
        for warning in warnings {
            println!("  • {warning}");
        }
    }
}

fn print_pantry(engine: &PantryEngine, pantry: Pantry, profile: Option<&UserProfile>) {
    println!("🥫 Pantry ({} items)", pantry.len());
    for filter in engine.pantry_categories(&pantry) {
        let items = pantry.items_in(engine.classifier(), filter);
        println!("{filter} ({})", items.len());
        if filter == CategoryFilter::All {
            continue;
        }
        for item in items {
            let unit = item.unit.as_deref().unwrap_or("");
            let allergens = engine.pantry_allergens(item, profile);
            if allergens.is_empty() {
                println!("  • {} {} {}", item.display_name(), item.quantity, unit);
            } else {
                println!(
                    "  • {} {} {}  ⚠️ {}",
                    item.display_name(),
                    item.quantity,
                    unit,
                    allergens.join(", ")
                );
            }
        }
    }
}

fn print_recipes(
    engine: &PantryEngine,
    recipes: &[RecipeRecommendation],
    profile: Option<&UserProfile>,
    difficulty: DifficultyFilter,
    sort: SortMode,
) {
    let cards = engine.recipe_cards(recipes, profile, difficulty, sort);
    println!("🍳 {} of {} recipes", cards.len(), recipes.len());
    for card in cards {
        let time = card
            .preparation_time
            .map(|t| format!("{t} min"))
            .unwrap_or_else(|| "? min".to_string());
        println!("  • {} [{}, {}]", card.title, card.difficulty, time);
        if !card.summary.is_empty() {
            println!("    {}", card.summary);
        }
        if !card.allergens.is_empty() {
            println!("    ⚠️ Contiene: {}", card.allergens.join(", "));
        }
    }
}

async fn replay_transcript(engine: &PantryEngine, signals: Vec<SpeechSignal>) {
    log::info!(
        "Replaying {} speech signal(s) recorded with locale {}",
        signals.len(),
        engine.recognizer_language()
    );
    let (sender, session) = engine.speech_session();
    for signal in signals {
        if sender.send(signal).is_err() {
            log::warn!("Voice session closed before the transcript finished");
            break;
        }
    }
    drop(sender);

    let mut queries: Vec<VoiceQuery> = Vec::new();
    let searches = session.run(&mut queries).await;
    println!("🎙️ {searches} voice search(es)");
    for query in queries {
        println!("  • {:?} ({})", query.text, query.language);
    }
}

fn generate_default_config(path: &str) {
    let config = EngineConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e:#}");
            process::exit(1);
        }
    }
}
