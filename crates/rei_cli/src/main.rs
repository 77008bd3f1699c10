use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rei_core::source::RemoteSource;
use rei_core::{EngineConfig, Language};
use rei_limbic::{ConversationState, PersonaEngine, TurnInput, TurnOutcome};
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod remote;

use remote::OpenAiLabelClient;

#[derive(Parser, Debug)]
#[command(name = "rei", author, version, about, long_about = None)]
struct Args {
    /// Path to the engine config file
    #[arg(short, long, default_value = "rei.toml")]
    config: String,

    /// Conversation language (ja or en); overrides the config file
    #[arg(short, long)]
    lang: Option<Language>,

    /// Seed for the emotion transition sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Pretend every turn happens at this hour (0-23)
    #[arg(long)]
    hour: Option<u32>,

    /// Consult an OpenAI-compatible endpoint when lexical confidence is low
    #[arg(long, env = "REI_REMOTE")]
    remote: bool,

    /// Model for the remote affect source
    #[arg(long, default_value = "gpt-4")]
    model: String,

    /// Print each turn as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = EngineConfig::load_or_default(&args.config);
    if let Some(lang) = args.lang {
        config.persona.language = lang;
    }
    let lang = config.persona.language;
    let engine = PersonaEngine::new(config)?;

    let remote = if args.remote {
        info!("Using remote affect source with model {}", args.model);
        Some(RemoteSource::new(OpenAiLabelClient::from_env(&args.model)?))
    } else {
        None
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut conv = ConversationState::new();
    println!("Rei: {}", engine.greeting(&conv));
    println!("(type 'quit' to exit, 'state' to dump the conversation state, 'reset' to start over)");
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        match trimmed {
            "quit" | "exit" => break,
            "" => {
                prompt()?;
                continue;
            }
            "state" => {
                println!("{}", serde_json::to_string_pretty(&conv)?);
                prompt()?;
                continue;
            }
            "reset" => {
                conv = ConversationState::new();
                println!("Rei: {}", engine.greeting(&conv));
                prompt()?;
                continue;
            }
            _ => {}
        }

        let input = match args.hour {
            Some(hour) => TurnInput::at_hour(trimmed, hour),
            None => TurnInput::new(trimmed),
        };

        let outcome = match &remote {
            Some(source) => {
                engine
                    .process_turn_escalated(&conv, &input, source, &mut rng)
                    .await
            }
            None => engine.process_turn(&conv, &input, &mut rng),
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print_turn(&outcome, lang);
        }
        conv = outcome.state;
        prompt()?;
    }

    info!("Conversation ended after {} turns", conv.turn_count);
    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn print_turn(outcome: &TurnOutcome, lang: Language) {
    let c = &outcome.classification;
    println!(
        "\n[user: {} {:.2}{} | rei: {} -> {} | tier {} {} ({}) | topic {}]",
        c.label,
        c.confidence,
        outcome
            .secondary
            .map(|s| format!(" (secondary: {})", s))
            .unwrap_or_default(),
        outcome.prior_emotion,
        outcome.emotion,
        outcome.tier.level,
        outcome.tier.name,
        outcome.tier.tone,
        outcome.topic,
    );
    let m = &outcome.mental;
    println!(
        "energy {:.0} | stress {:.0} | patience {:.0} | loneliness {:.0} | fatigue {:.0}",
        m.energy, m.stress, m.patience, m.loneliness, m.fatigue
    );
    let v = &outcome.voice;
    println!(
        "voice: speed {:.2} pitch {:+} volume {:.1}",
        v.speed, v.pitch, v.volume
    );

    println!("\n{}\n", outcome.prompt_context(lang));

    if outcome.suggestions.is_empty() {
        println!("(no more suggestions)");
    } else {
        println!("suggestions:");
        for (i, s) in outcome.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, s);
        }
    }
    println!();
}
