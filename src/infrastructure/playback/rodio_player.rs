use super::mulaw::{self, RAW_MULAW_SAMPLE_RATE};
use super::{AudioPlayer, CompletionNotifier, PlaybackHandle, PlaybackOutcome};
use crate::domain::tts::{AudioEncoding, SynthesisResult};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// Plays audio on the default output device through rodio.
///
/// Each playback gets its own thread: the output stream must live on the
/// thread that created it. The thread drops the sink and stream as soon as
/// playback ends, then reports the outcome.
pub struct RodioAudioPlayer {
    volume: f32,
    poll_interval: Duration,
}

impl RodioAudioPlayer {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            poll_interval: Duration::from_millis(50),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}

impl Default for RodioAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioAudioPlayer {
    async fn play(&self, audio: SynthesisResult) -> AppResult<PlaybackHandle> {
        tracing::info!(
            mime_type = audio.mime_type(),
            audio_size_bytes = audio.audio.len(),
            "Loading audio for playback"
        );

        let (handle, notifier) = PlaybackHandle::channel();
        let (loaded_tx, loaded_rx) = oneshot::channel::<AppResult<()>>();
        let volume = self.volume;
        let poll_interval = self.poll_interval;

        thread::Builder::new()
            .name("speech-playback".to_string())
            .spawn(move || run_playback(audio, volume, poll_interval, notifier, loaded_tx))
            .map_err(|e| AppError::Playback(format!("Failed to start playback thread: {}", e)))?;

        loaded_rx.await.map_err(|_| {
            AppError::Playback("Playback thread exited before loading audio".to_string())
        })??;

        Ok(handle)
    }
}

fn append_source(sink: &Sink, audio: SynthesisResult) -> AppResult<()> {
    match audio.encoding {
        AudioEncoding::Mulaw => {
            let decoded = mulaw::decode(&audio.audio, RAW_MULAW_SAMPLE_RATE)?;
            sink.append(SamplesBuffer::new(
                decoded.channels,
                decoded.sample_rate,
                decoded.samples,
            ));
        }
        AudioEncoding::Linear16 | AudioEncoding::Mp3 => {
            let source = Decoder::new(Cursor::new(audio.audio)).map_err(|e| {
                AppError::Playback(format!("Failed to decode {} audio: {}", audio.encoding, e))
            })?;
            sink.append(source);
        }
    }
    Ok(())
}

fn run_playback(
    audio: SynthesisResult,
    volume: f32,
    poll_interval: Duration,
    notifier: CompletionNotifier,
    loaded_tx: oneshot::Sender<AppResult<()>>,
) {
    let (stream, stream_handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(error = %e, "No audio output device found");
            let _ = loaded_tx.send(Err(AppError::Playback(format!(
                "No audio output device found: {}",
                e
            ))));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create audio sink");
            let _ = loaded_tx.send(Err(AppError::Playback(format!(
                "Failed to create audio sink: {}",
                e
            ))));
            return;
        }
    };

    if let Err(e) = append_source(&sink, audio) {
        tracing::error!(error = %e, "Failed to load audio");
        let _ = loaded_tx.send(Err(e));
        return;
    }

    sink.set_volume(volume);
    let _ = loaded_tx.send(Ok(()));
    tracing::debug!("Playback started");

    let outcome = loop {
        if notifier.is_stop_requested() {
            sink.stop();
            break PlaybackOutcome::Stopped;
        }
        if sink.empty() {
            break PlaybackOutcome::Finished;
        }
        thread::sleep(poll_interval);
    };

    drop(sink);
    drop(stream);
    tracing::debug!(outcome = ?outcome, "Playback resources released");

    notifier.complete(outcome);
}
