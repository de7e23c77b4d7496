// Interactive question answering over the reaction database.
//
// Usage: cargo run --bin ask [DATA_DIR] [QUESTION...]
// With no question arguments, reads one question per line from stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use bioreaction_db::{IntentRouter, QueryConfig, ReactionDatabase};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bioreaction_db=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    // First argument is the data directory when it names one; everything
    // else is the question.
    let data_dir = if args.first().map(|a| PathBuf::from(a).is_dir()) == Some(true) {
        PathBuf::from(args.remove(0))
    } else {
        std::env::var("BIOREACTION_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/sample"))
    };

    tracing::info!("loading reaction tables from {}", data_dir.display());
    let db = ReactionDatabase::load(&data_dir);
    if !db.is_ready() {
        anyhow::bail!(
            "no reaction tables found under {} (expected files like 1_reactions_core.csv)",
            data_dir.display()
        );
    }
    tracing::info!("{} of 10 tables loaded", db.loaded().count());

    let config = QueryConfig::default();
    let router = IntentRouter::new(&db, &config);

    if !args.is_empty() {
        let question = args.join(" ");
        println!("{}", router.answer(&question, None));
        return Ok(());
    }

    // Line-per-question loop. EOF or an empty line exits.
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("? ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }
        println!("{}\n", router.answer(question, None));
    }

    Ok(())
}
