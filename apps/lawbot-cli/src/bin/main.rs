use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use lawbot_cli::{answer_batch, init_tracing, load_settings, read_questions};
use lawbot_rag::LawBotService;

#[derive(Parser)]
#[command(name = "lawbot", version, about = "Answer questions about Indian law from a local legal corpus")]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the full JSON response instead of the answer text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Answer every line of a file concurrently, one JSON object per line
    Batch {
        file: PathBuf,
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Show which components loaded
    Status,
    /// Run a legal tool directly
    Tool {
        #[command(subcommand)]
        tool: ToolCommand,
    },
}

#[derive(Subcommand)]
enum ToolCommand {
    /// Look up a legal term
    Dictionary { term: String },
    /// Date `days` after `--start` (default today)
    Deadline {
        #[arg(allow_negative_numbers = true)]
        days: i64,
        #[arg(long)]
        start: Option<String>,
    },
    /// Look up a case reference
    Case { reference: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings()?;
    let service = Arc::new(LawBotService::new(settings));

    match cli.command {
        Command::Ask { question } => {
            service.initialize()?;
            let response = service.chat(&question.join(" "), None);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.response);
                if let Some(err) = &response.error { eprintln!("error: {err}"); }
            }
        }
        Command::Batch { file, concurrency } => {
            let questions = read_questions(&file)?;
            service.initialize()?;
            tracing::info!(questions = questions.len(), concurrency, "answering batch");
            let runtime = tokio::runtime::Runtime::new()?;
            let answers = runtime.block_on(answer_batch(service.clone(), questions, concurrency))?;
            for (question, response) in answers {
                let answer = serde_json::to_value(response)?;
                println!("{}", serde_json::json!({ "question": question, "answer": answer }));
            }
        }
        Command::Status => {
            service.initialize()?;
            println!("{}", serde_json::to_string_pretty(&service.system_status())?);
        }
        Command::Tool { tool } => {
            let out = match tool {
                ToolCommand::Dictionary { term } => serde_json::to_value(service.lookup_term(&term))?,
                ToolCommand::Deadline { days, start } => serde_json::to_value(service.calculate_deadline(days, start.as_deref()))?,
                ToolCommand::Case { reference } => serde_json::to_value(service.lookup_case(&reference))?,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
