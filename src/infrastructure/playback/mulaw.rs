//! G.711 µ-law expansion for MULAW payloads.
//!
//! The provider wraps MULAW audio in a WAV container with format tag 7,
//! which the stock WAV decoder rejects, so the container is walked here and
//! the samples expanded to 16-bit PCM. Headerless payloads are treated as
//! raw mono µ-law at the fallback rate.

use crate::error::{AppError, AppResult};

const WAVE_FORMAT_MULAW: u16 = 7;
const BIAS: i32 = 0x84;

/// Sample rate assumed for headerless µ-law (G.711 telephony rate)
pub const RAW_MULAW_SAMPLE_RATE: u32 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct MulawAudio {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

/// Expand a single µ-law byte to a linear 16-bit sample
pub fn expand(byte: u8) -> i16 {
    let byte = !byte;
    let sign = byte & 0x80;
    let exponent = (byte >> 4) & 0x07;
    let mantissa = (byte & 0x0F) as i32;

    let magnitude = (((mantissa << 3) + BIAS) << exponent) - BIAS;
    if sign != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

pub fn decode(bytes: &[u8], fallback_rate: u32) -> AppResult<MulawAudio> {
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        decode_wav(bytes)
    } else {
        Ok(MulawAudio {
            channels: 1,
            sample_rate: fallback_rate,
            samples: bytes.iter().copied().map(expand).collect(),
        })
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn decode_wav(bytes: &[u8]) -> AppResult<MulawAudio> {
    let mut format: Option<(u16, u32)> = None;
    let mut pos = 12;

    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = read_u32(bytes, pos + 4) as usize;
        let start = pos + 8;
        // Streamed WAVs may declare a bogus data length; clamp to what we have.
        let end = start.saturating_add(size).min(bytes.len());
        let body = &bytes[start..end];

        match id {
            b"fmt " => {
                if body.len() < 8 {
                    return Err(AppError::Playback("truncated WAV fmt chunk".to_string()));
                }
                let tag = read_u16(body, 0);
                if tag != WAVE_FORMAT_MULAW {
                    return Err(AppError::Playback(format!(
                        "expected µ-law WAV (format tag 7), got format tag {}",
                        tag
                    )));
                }
                let channels = read_u16(body, 2).max(1);
                let sample_rate = read_u32(body, 4);
                if sample_rate == 0 {
                    return Err(AppError::Playback(
                        "µ-law WAV declares a zero sample rate".to_string(),
                    ));
                }
                format = Some((channels, sample_rate));
            }
            b"data" => {
                let (channels, sample_rate) = format.ok_or_else(|| {
                    AppError::Playback("WAV data chunk precedes fmt chunk".to_string())
                })?;
                return Ok(MulawAudio {
                    channels,
                    sample_rate,
                    samples: body.iter().copied().map(expand).collect(),
                });
            }
            _ => {}
        }

        pos = start.saturating_add(size).saturating_add(size & 1);
    }

    Err(AppError::Playback("WAV container has no data chunk".to_string()))
}
