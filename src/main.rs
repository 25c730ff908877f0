use speech_player::domain::session::{SessionError, SpeechSession};
use speech_player::domain::tts::AudioEncoding;
use speech_player::infrastructure::config::{Config, LogFormat};
use speech_player::infrastructure::playback::RodioAudioPlayer;
use speech_player::infrastructure::repositories::GoogleTtsRepository;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Type text and press Enter to hear it.
  :voices            list available voices
  :voice <name>      select a voice (no name: provider default)
  :encodings         list audio encodings
  :encoding <name>   select LINEAR16, MULAW or MP3
  :status            show current state and selections
  :stop              stop playback
  :quit              exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        base_url = %config.tts_base_url,
        language = %config.language_code,
        encoding = %config.default_encoding,
        has_api_key = config.api_key.is_some(),
        "Starting speech player"
    );
    if config.api_key.is_none() {
        tracing::warn!("GOOGLE_CLOUD_API_KEY is not set; provider requests will be rejected");
    }

    // === DEPENDENCY INJECTION SETUP ===
    let google = Arc::new(GoogleTtsRepository::from_config(&config));
    let player = Arc::new(RodioAudioPlayer::new());
    let session = Arc::new(SpeechSession::new(
        google.clone(),
        google,
        player,
        config.session_defaults(),
    ));

    // Voice catalog loads independently of text entry
    let starter = session.clone();
    tokio::spawn(async move {
        match starter.start().await {
            Ok(count) => println!("Loaded {} voices.", count),
            Err(e) => notify(&e),
        }
    });

    // Playback can still break after "Playing." was printed
    let mut outcomes = session.subscribe_playback();
    tokio::spawn(async move {
        while outcomes.changed().await.is_ok() {
            let outcome = outcomes.borrow_and_update().clone();
            if let Some(e) = outcome
                .as_ref()
                .and_then(SessionError::from_playback_outcome)
            {
                notify(&e);
            }
        }
    });

    println!("{}", HELP);
    run_prompt(&session).await?;

    session.stop();
    tracing::info!("Speech player exiting");
    Ok(())
}

async fn run_prompt(session: &SpeechSession) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        let (command, argument) = match line.strip_prefix(':') {
            Some(rest) => {
                let mut parts = rest.splitn(2, char::is_whitespace);
                (
                    Some(parts.next().unwrap_or_default()),
                    parts.next().map(str::trim).unwrap_or_default(),
                )
            }
            None => (None, ""),
        };

        match command {
            None => {
                println!("Processing...");
                match session.submit(line).await {
                    Ok(()) => println!("Playing."),
                    Err(e) => {
                        notify(&e);
                        session.dismiss_failure();
                    }
                }
            }
            Some("voices") => {
                let voices = session.voices();
                if voices.is_empty() {
                    println!("No voices loaded; the provider default will be used.");
                }
                let selected = session.selections().voice_name;
                for voice in voices {
                    let marker = if selected.as_deref() == Some(voice.name.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{} {}", marker, voice.label());
                }
            }
            Some("voice") if argument.is_empty() => {
                session.clear_voice();
                println!("Using the provider default voice.");
            }
            Some("voice") => match session.select_voice(argument) {
                Ok(()) => println!("Voice: {}", argument),
                Err(e) => notify(&e),
            },
            Some("encodings") => {
                for encoding in AudioEncoding::ALL {
                    println!("  {}", encoding.label());
                }
            }
            Some("encoding") => {
                let encoding = AudioEncoding::parse_lenient(argument);
                session.select_encoding(encoding);
                println!("Encoding: {}", encoding.label());
            }
            Some("status") => {
                let selections = session.selections();
                println!(
                    "State: {} | voice: {} | encoding: {}",
                    session.state(),
                    selections.voice_name.as_deref().unwrap_or("provider default"),
                    selections.audio_encoding.label()
                );
            }
            Some("stop") => {
                if !session.stop() {
                    println!("Nothing is playing.");
                }
            }
            Some("quit") | Some("q") => break,
            Some("help") => println!("{}", HELP),
            Some(other) => println!("Unknown command :{} (try :help)", other),
        }
    }

    Ok(())
}

fn notify(error: &SessionError) {
    println!("{}: {}", error.title(), error.user_message());
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "speech_player=debug"
    } else {
        "speech_player=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
