// ============================================================
// Layer 4 — Audio Probing and Decoding
// ============================================================
// Two jobs, both built on symphonia:
//
//   probe_duration  → how long is this file? Read from the
//                     container header when it records a frame
//                     count (WAV always does), otherwise decode
//                     the whole stream and count.
//
//   decode_mono     → every sample of the first audio track,
//                     converted to f32 and averaged across
//                     channels.
//
// Symphonia signals end-of-stream as an UnexpectedEof I/O
// error from next_packet(), which is the normal way out of
// the decode loop, not a failure. ResetRequired means the
// track layout changed mid-stream (chained streams); that is
// reported instead of silently returning a truncated signal,
// so a probed duration never disagrees with the decoded one.
//
// Reference: symphonia crate documentation (getting started)

use anyhow::{anyhow, Context, Result};
use std::{fs::File, io, path::Path};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CodecParameters, DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

/// Duration of an audio file in seconds.
pub fn probe_duration(path: &Path) -> Result<f64> {
    let format = open_format(path)?;
    let (_, params) = first_audio_track(format.as_ref(), path)?;

    if let (Some(frames), Some(rate)) = (params.n_frames, params.sample_rate) {
        if rate > 0 {
            return Ok(frames as f64 / rate as f64);
        }
    }

    tracing::debug!("No frame count in header of '{}', decoding", path.display());
    let (samples, rate) = decode_mono(path)?;
    if rate == 0 {
        return Err(anyhow!("'{}' has no sample rate", path.display()));
    }
    Ok(samples.len() as f64 / rate as f64)
}

/// Decode the first audio track of `path` to mono f32 samples.
///
/// Returns the samples and their sampling rate.
pub fn decode_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut format = open_format(path)?;
    let (track_id, params) = first_audio_track(format.as_ref(), path)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .with_context(|| format!("Unsupported codec in '{}'", path.display()))?;

    let mut rate = params.sample_rate.unwrap_or(0);
    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(e) => {
                end_of_stream(e, path)?;
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt frame is skipped, the rest of the stream is still usable
            Err(SymphoniaError::DecodeError(msg)) => {
                tracing::warn!("Skipping bad frame in '{}': {}", path.display(), msg);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot decode '{}'", path.display()));
            }
        };

        let spec     = *decoded.spec();
        let channels = spec.channels.count().max(1);
        rate         = spec.rate;

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        mono.extend(
            buf.samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }

    Ok((mono, rate))
}

/// Classify an error from `next_packet()`: Ok for a clean end of
/// stream, an error naming `path` for anything else.
fn end_of_stream(err: SymphoniaError, path: &Path) -> Result<()> {
    match err {
        SymphoniaError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(()),
        SymphoniaError::ResetRequired => Err(anyhow!(
            "Stream of '{}' changed layout mid-decode; re-encode it as a single stream",
            path.display()
        )),
        e => Err(e).with_context(|| format!("Cannot read '{}'", path.display())),
    }
}

fn open_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open audio file '{}'", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unrecognised audio format '{}'", path.display()))?;

    Ok(probed.format)
}

fn first_audio_track(format: &dyn FormatReader, path: &Path) -> Result<(u32, CodecParameters)> {
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("No decodable audio track in '{}'", path.display()))?;
    Ok((track.id, track.codec_params.clone()))
}
