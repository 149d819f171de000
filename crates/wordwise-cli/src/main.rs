//! wordwise CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::Session;

#[derive(Parser)]
#[command(
    name = "wordwise",
    version,
    about = "Goal-weighted spaced-repetition vocabulary trainer"
)]
struct Cli {
    /// Review state file (overrides `state_path` from the config)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter wordwise.toml
    Init,

    /// Start tracking a word, or change its goal rank
    Add {
        #[arg(long)]
        word: String,

        /// Goal-frequency rank (1 = most relevant)
        #[arg(long, default_value = "1")]
        rank: u32,
    },

    /// Stop tracking a word
    Remove {
        #[arg(long)]
        word: String,
    },

    /// Show every tracked word
    Status,

    /// List due words, most urgent first
    Next {
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Only report these words (comma-separated)
        #[arg(long, value_delimiter = ',')]
        visible: Vec<String>,
    },

    /// Record a review of a word
    Review {
        #[arg(long)]
        word: String,

        /// Recall quality, 0 (blackout) to 5 (perfect)
        #[arg(long, value_parser = clap::value_parser!(i32).range(0..=5))]
        quality: i32,
    },

    /// Build a lesson from goal words and due reviews (JSON)
    Lesson {
        #[arg(long, default_value = "practice")]
        topic: String,

        /// Max new words (default from config)
        #[arg(long)]
        new_limit: Option<usize>,

        /// Max review words (default from config)
        #[arg(long)]
        review_limit: Option<usize>,

        /// Print a topic outline for the chosen words instead
        #[arg(long)]
        plan: bool,
    },

    /// Manage learner goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Write a short text using only known and new words
    Blurb {
        /// Known words (comma-separated)
        #[arg(long, value_delimiter = ',')]
        known: Vec<String>,

        /// New words to introduce (comma-separated)
        #[arg(long = "new", value_delimiter = ',')]
        new_words: Vec<String>,

        /// Length in words (default from config)
        #[arg(long)]
        length: Option<usize>,

        /// Skip the configured generator and use the template
        #[arg(long)]
        offline: bool,
    },

    /// Print the bundled default word list (JSON)
    DefaultWords {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Extract the vocabulary of a text file (JSON)
    Vocab {
        #[arg(long)]
        file: PathBuf,
    },

    /// Restore the state file from its backup
    Recover,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Add a goal word, or change its weight
    Add {
        #[arg(long)]
        word: String,

        /// Relative importance; higher ranks earlier
        #[arg(long, default_value = "1.0")]
        weight: f64,
    },

    /// Remove a goal (the word stays tracked)
    Remove {
        #[arg(long)]
        word: String,
    },

    /// List goals by rank
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordwise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let state = cli.state;
    let config = cli.config;
    let open = || Session::open(state.clone(), config.as_deref());

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Add { word, rank } => open().and_then(|s| commands::add::execute(&s, word, rank)),
        Commands::Remove { word } => open().and_then(|s| commands::remove::execute(&s, &word)),
        Commands::Status => open().and_then(|s| commands::status::execute(&s)),
        Commands::Next { limit, visible } => {
            open().and_then(|s| commands::next::execute(&s, limit, visible))
        }
        Commands::Review { word, quality } => {
            open().and_then(|s| commands::review::execute(&s, &word, quality))
        }
        Commands::Lesson {
            topic,
            new_limit,
            review_limit,
            plan,
        } => open().and_then(|s| {
            commands::lesson::execute(&s, topic, new_limit, review_limit, plan)
        }),
        Commands::Goal { action } => open().and_then(|s| match action {
            GoalAction::Add { word, weight } => commands::goal::add(&s, word, weight),
            GoalAction::Remove { word } => commands::goal::remove(&s, &word),
            GoalAction::List => commands::goal::list(&s),
        }),
        Commands::Blurb {
            known,
            new_words,
            length,
            offline,
        } => match open() {
            Ok(s) => commands::blurb::execute(&s, known, new_words, length, offline).await,
            Err(e) => Err(e),
        },
        Commands::DefaultWords { limit } => commands::default_words::execute(limit),
        Commands::Vocab { file } => commands::vocab::execute(file),
        Commands::Recover => open().and_then(|s| commands::recover::execute(&s)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
