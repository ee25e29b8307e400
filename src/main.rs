use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comment_annotator::analytics::LanguageClient;
use comment_annotator::annotate::Annotator;
use comment_annotator::config::Settings;
use comment_annotator::shell::{render, ActionOutcome, Shell};

#[derive(Parser)]
#[command(name = "annotate")]
#[command(about = "Annotate spreadsheet comments with cloud sentiment and key phrases")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Overrides {
    /// Settings file (default: <config dir>/comment-annotator/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Text analytics endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Text analytics API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Column holding the comments
    #[arg(long, global = true)]
    comment_column: Option<String>,

    /// Language hint sent with each comment
    #[arg(long, global = true)]
    language: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive load / analyze / save shell (default)
    Shell,
    /// Load, analyze and save in one go
    Analyze {
        /// Spreadsheet to read
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the annotated spreadsheet
        #[arg(short, long)]
        output: PathBuf,

        /// Print the results listing to stdout
        #[arg(long)]
        show: bool,
    },
}

/// Initialize tracing on stderr so stdout stays the results pane
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "comment_annotator=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn settings(overrides: Overrides) -> Settings {
    let mut settings = Settings::load(overrides.config.as_deref());
    if let Some(endpoint) = overrides.endpoint {
        settings.endpoint = Some(endpoint);
    }
    if let Some(key) = overrides.api_key {
        settings.api_key = Some(key);
    }
    if let Some(column) = overrides.comment_column {
        settings.comment_column = column;
    }
    if let Some(language) = overrides.language {
        settings.language = language;
    }
    settings
}

/// Report an outcome on stderr and stop the one-shot run if it failed.
fn check(outcome: ActionOutcome) -> anyhow::Result<()> {
    eprint!("{}", render::render_notice(&outcome));
    if !outcome.is_success() {
        anyhow::bail!("annotation did not complete");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = settings(cli.overrides);
    let client = LanguageClient::new(&settings)?;
    let annotator = Annotator::with_comment_column(Box::new(client), settings.comment_column.clone());
    let mut shell = Shell::new(annotator).with_color(std::io::stdout().is_terminal());

    match cli.command {
        Some(Commands::Analyze {
            input,
            output,
            show,
        }) => {
            check(shell.load(&input))?;
            check(shell.analyze().await)?;
            if show {
                if let Some(results) = shell.results() {
                    print!("{}", results);
                }
            }
            check(shell.save(&output))?;
        }
        Some(Commands::Shell) | None => {
            let stdin = std::io::stdin();
            shell.run(stdin.lock(), std::io::stdout()).await?;
        }
    }

    Ok(())
}
