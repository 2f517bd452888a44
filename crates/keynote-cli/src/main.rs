//! keynote - chat with an AI assistant about your events

mod api;
mod config;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use clap::Parser;

use keynote_ai::AskClient;
use keynote_session::ChatSession;

use api::EventsClient;

/// keynote - event assistant chat
#[derive(Parser, Debug)]
#[command(name = "keynote")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Event id to chat about (default: first upcoming event)
    #[arg(short, long)]
    event: Option<i64>,

    /// Month to search when --event is given (1-12, default: current)
    #[arg(long)]
    month: Option<u32>,

    /// Year to search when --event is given (default: current)
    #[arg(long)]
    year: Option<i32>,

    /// Ask a single question and exit
    #[arg(short = 'c', long)]
    question: Option<String>,

    /// Base URL of the events API
    #[arg(long)]
    events_url: Option<String>,

    /// Base URL of the streaming assistant API
    #[arg(long)]
    agent_url: Option<String>,

    /// List this month's events and exit
    #[arg(long)]
    list: bool,

    /// Create a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("keynote=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file; CLI args take precedence
    let cfg = config::Config::load();
    let events_url = args
        .events_url
        .or(cfg.events_url.clone())
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let agent_url = args
        .agent_url
        .or(cfg.agent_url.clone())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let events = EventsClient::new(&events_url);
    let now = chrono::Utc::now();
    let month = args.month.unwrap_or(now.month());
    let year = args.year.unwrap_or(now.year());

    if args.list {
        let list = events.list_events(month, year).await?;
        if list.is_empty() {
            println!("No events in {}/{}", month, year);
            return Ok(());
        }
        for event in list {
            println!(
                "{:>4}  {}  {}",
                event.id,
                event.start_time.format("%Y-%m-%d %H:%M"),
                event.event_name
            );
        }
        return Ok(());
    }

    let record = match args.event {
        Some(id) => events.find_event(id, month, year).await?,
        None => {
            let summary = events.dashboard_summary().await?;
            summary
                .upcoming
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("no upcoming events; pass --event <id>"))?
        }
    };

    let client = match cfg.timeout_secs {
        Some(secs) => AskClient::with_timeout(&agent_url, Duration::from_secs(secs))?,
        None => AskClient::new(&agent_url),
    };

    let mut session = ChatSession::new(record.to_context(), Arc::new(client));

    // The observer sees accumulated content; print only what is new.
    let mut shown = String::new();
    session.on_update(move |entry| {
        if entry.content.is_empty() {
            shown.clear();
            return;
        }
        if let Some(new) = entry.content.strip_prefix(shown.as_str()) {
            print!("{}", new);
        } else {
            // Content was replaced wholesale (final answer or error).
            print!("\n{}", entry.content);
        }
        shown = entry.content.clone();
        let _ = io::stdout().flush();
    });

    match args.question {
        Some(question) => {
            session.submit(&question).await?;
            println!();
        }
        None => {
            println!(
                "Chatting about \"{}\" (empty line to quit)",
                record.event_name
            );
            let stdin = io::stdin();
            loop {
                print!("> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    break;
                }
                session.submit(question).await?;
                println!();
            }
        }
    }

    Ok(())
}
