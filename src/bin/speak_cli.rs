//! speak-cli — 文字转语音命令行工具
//!
//! Usage:
//!   speak-cli say [--format mp3|wav] [--out <dir>] [--config <file>] [--file <path>] [text...]
//!   speak-cli meter [--limit <n>] [--file <path>] [text...]

use anyhow::{bail, Context};
use speak_client::guard::{trim_to_limit, MeterReading};
use speak_client::media::MediaElement;
use speak_client::view::{Affordances, ConsoleView};
use speak_client::{AudioFormat, SpeakClient, SpeakConfig, SpeakSession, TriggerOutcome};
use std::path::PathBuf;
use std::sync::Arc;

const VALUE_FLAGS: &[&str] = &["--format", "--out", "--config", "--file", "--limit"];

#[tokio::main]
async fn main() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "say" => cmd_say(&args[2..]).await,
        "meter" => cmd_meter(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"speak-cli — text-to-speech front end

USAGE:
    speak-cli <COMMAND> [OPTIONS] [TEXT...]

COMMANDS:
    say [--format mp3|wav] [--out <dir>] [--config <file>] [--file <path>] [text...]
                                Synthesize text, play it and save the audio
    meter [--limit <n>] [--file <path>] [text...]
                                Show word/char meters for the text
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    SPEAK_BASE_URL              Synthesis server (default http://127.0.0.1:8000)
    SPEAK_API_KEY               Bearer token sent with requests
    SPEAK_TIMEOUT_SECS          Request timeout (default: none)
    SPEAK_WORD_LIMIT            Word limit (default 1000)
    SPEAK_FORMAT                Default audio format
    RUST_LOG                    Log filter (default info)"#
    );
}

fn cmd_version() {
    println!("speak-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Arguments that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

async fn read_text(args: &[String]) -> anyhow::Result<String> {
    if let Some(path) = flag_value(args, "--file") {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path));
    }
    Ok(positional(args).join(" "))
}

fn load_config(args: &[String]) -> anyhow::Result<SpeakConfig> {
    let config = match flag_value(args, "--config") {
        Some(path) => SpeakConfig::from_yaml_file(path)?.with_env_overrides()?,
        None => SpeakConfig::from_env()?,
    };
    Ok(config)
}

#[cfg(feature = "playback")]
fn open_player() -> Arc<dyn MediaElement> {
    match speak_client::media::SpeakerPlayer::open() {
        Ok(player) => Arc::new(player),
        Err(e) => {
            tracing::warn!(error = %e, "no audio output, audio will only be saved");
            Arc::new(speak_client::media::HeadlessPlayer::new())
        }
    }
}

#[cfg(not(feature = "playback"))]
fn open_player() -> Arc<dyn MediaElement> {
    Arc::new(speak_client::media::HeadlessPlayer::new())
}

async fn cmd_say(args: &[String]) -> anyhow::Result<()> {
    let mut config = load_config(args)?;
    if let Some(fmt) = flag_value(args, "--format") {
        config.format = fmt.parse::<AudioFormat>()?;
    }
    let out_dir = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let text = read_text(args).await?;

    let backend = Arc::new(SpeakClient::from_config(&config)?);
    let player = open_player();
    let session = SpeakSession::new(config, backend, player, Arc::new(ConsoleView::new()));

    let chars = text.chars().count();
    session.on_input(text, chars);

    match session.trigger().await {
        TriggerOutcome::Spoken(download) => {
            let path = session.save_download(&download, &out_dir).await?;
            println!("saved {}", path.display());
            #[cfg(feature = "playback")]
            wait_for_enter().await;
            Ok(())
        }
        TriggerOutcome::Failed(e) => Err(e.into()),
        TriggerOutcome::Busy => bail!("a synthesis is already running"),
    }
}

#[cfg(feature = "playback")]
async fn wait_for_enter() {
    println!("playing; press Enter to quit");
    let _ = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)
    })
    .await;
}

async fn cmd_meter(args: &[String]) -> anyhow::Result<()> {
    let limit = match flag_value(args, "--limit") {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid --limit '{}'", raw))?,
        None => load_config(args)?.word_limit,
    };
    let text = read_text(args).await?;
    let reading = MeterReading::measure(&trim_to_limit(&text, limit), limit);
    let display = reading.display(&Affordances::all());

    for label in [display.words_label, display.chars_label].into_iter().flatten() {
        println!("{}", label);
    }
    if let Some(pct) = display.bar_percent {
        println!("{}% of limit", pct);
    }
    if let Some(notice) = reading.notice_message() {
        println!("{}", notice);
    }
    Ok(())
}
