//! HealthLens command-line client
//!
//! Talks to the HealthLens backend for one-shot disease risk predictions and
//! an interactive MannMitra chat.
//!
//! Usage:
//!   healthlens predict --disease diabetes --age 45 --bmi 26.5 --glucose 140
//!   healthlens chat
//!   healthlens chat -m "I feel anxious about tomorrow"
//!
//! The backend location comes from `--api-url`, then `HEALTHLENS_API_URL`,
//! then `api_url` in the `--config` file, then `http://localhost:8000`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use healthlens_client::{http_services, ClientConfig};
use healthlens_contracts::{chat::Role, error::HealthlensResult};
use healthlens_core::{
    chat::{ChatMsg, ChatSession},
    driver::{submit_chat, submit_prediction, Services},
    prediction::{FormField, PredictionMsg, PredictionSession},
    view::{chat_view, prediction_view, MoodTone, Tone, TranscriptEntry, TurnView},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// HealthLens: disease risk prediction and mental wellness chat.
#[derive(Parser)]
#[command(
    name = "healthlens",
    about = "HealthLens disease risk prediction and MannMitra chat client",
    long_about = "Submits health parameters to the HealthLens inference service and renders\n\
                  the risk score with its SHAP explanation, or chats with MannMitra."
)]
struct Cli {
    /// TOML client configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and HEALTHLENS_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate chronic disease risk from basic health parameters.
    Predict(PredictArgs),
    /// Talk with MannMitra. Without --message, starts an interactive session.
    Chat {
        /// Send these messages in order instead of reading stdin.
        #[arg(short, long = "message")]
        messages: Vec<String>,
    },
}

/// Raw form values. They are passed through untouched; empty or
/// non-numeric values are forwarded for the service to judge.
#[derive(Args)]
struct PredictArgs {
    /// diabetes, heart, or hypertension.
    #[arg(long, default_value = "diabetes")]
    disease: String,
    /// Age in years.
    #[arg(long, default_value = "")]
    age: String,
    /// Body-mass index.
    #[arg(long, default_value = "")]
    bmi: String,
    /// Fasting glucose in mg/dL.
    #[arg(long, default_value = "")]
    glucose: String,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let services = match build_services(&cli) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Predict(args) => run_predict(args, &services).await,
        Command::Chat { messages } if !messages.is_empty() => run_chat_batch(messages, &services).await,
        Command::Chat { .. } => run_chat_repl(&services).await,
    }
}

fn build_services(cli: &Cli) -> HealthlensResult<Services> {
    let config = ClientConfig::load(cli.config.as_deref())?.with_api_url_override(cli.api_url.clone())?;
    tracing::debug!(api_url = %config.api_url, "client configured");
    http_services(config)
}

// ── Prediction ────────────────────────────────────────────────────────────────

async fn run_predict(args: PredictArgs, services: &Services) {
    let mut session = PredictionSession::new();
    for (field, value) in [
        (FormField::Disease, args.disease),
        (FormField::Age, args.age),
        (FormField::Bmi, args.bmi),
        (FormField::Glucose, args.glucose),
    ] {
        session.update(PredictionMsg::UpdateField { field, value });
    }

    println!("Predicting...");
    submit_prediction(&mut session, services).await;
    print_prediction(&session);
}

fn print_prediction(session: &PredictionSession) {
    let view = prediction_view(session);

    if let Some(error) = &view.error {
        println!();
        println!("  {}", error);
        return;
    }
    let Some(result) = &view.result else {
        return;
    };

    let tone = match result.tone {
        Tone::Danger => "danger",
        Tone::Warning => "warning",
        Tone::Success => "success",
    };

    println!();
    println!("Prediction Result");
    println!("=================");
    println!("  Disease:     {}", result.disease);
    println!("  Risk Score:  {}", result.risk_score);
    println!("  Risk Level:  {} ({})", result.risk_label, tone);

    if !result.explanation.is_empty() {
        println!();
        println!("  Top contributing factors:");
        for row in &result.explanation {
            println!("    - {}: value {} (SHAP: {})", row.feature, row.value, row.shap);
        }
    }

    if let Some(advice) = &result.advice {
        println!();
        println!("  Preventive Advice (AI-generated):");
        for line in advice.lines() {
            println!("    {}", line);
        }
    }
    println!();
}

// ── Chat ──────────────────────────────────────────────────────────────────────

async fn run_chat_batch(messages: Vec<String>, services: &Services) {
    let mut session = ChatSession::new();
    print_turns(&session, 0);

    for message in messages {
        let printed = session.transcript().len();
        submit_chat(&mut session, services, &message).await;
        print_turns(&session, printed);
    }
}

async fn run_chat_repl(services: &Services) {
    let mut session = ChatSession::new();
    print_turns(&session, 0);
    println!("(type a message and press Enter; /quit or Ctrl-D to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stdin");
                break;
            }
        };
        if line.trim() == "/quit" {
            break;
        }

        if !stage_line(&mut session, &line) {
            continue;
        }

        let printed = session.transcript().len();
        println!("{}", healthlens_core::view::COMPOSING_LABEL);
        submit_chat(&mut session, services, &line).await;
        // The user's own line is already on screen.
        print_turns(&session, printed + 1);
    }
}

/// Put `line` in the draft. Returns whether it would be sent.
fn stage_line(session: &mut ChatSession, line: &str) -> bool {
    session.update(ChatMsg::UpdateDraft(line.to_string()));
    session.can_submit()
}

/// Print every transcript turn from index `from` on.
fn print_turns(session: &ChatSession, from: usize) {
    let view = chat_view(session);
    for entry in view.entries.iter().skip(from) {
        if let TranscriptEntry::Turn(turn) = entry {
            print_turn(turn);
        }
    }
}

fn print_turn(turn: &TurnView) {
    let speaker = match turn.role {
        Role::User => "You",
        Role::Assistant => "MannMitra",
    };
    println!("[{}] {}: {}", turn.time, speaker, turn.content);

    if let Some(badge) = &turn.badge {
        let marker = match badge.tone {
            MoodTone::Positive => "+",
            MoodTone::Negative => "-",
            MoodTone::Neutral => "~",
        };
        match &badge.confidence {
            Some(confidence) => println!("        Detected mood: {} {} {}", marker, badge.label, confidence),
            None => println!("        Detected mood: {} {}", marker, badge.label),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
