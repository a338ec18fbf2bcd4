use transcribe_server::application::ports::TranscriptionError;
use transcribe_server::infrastructure::audio::audio_decoder::{
    TARGET_SAMPLE_RATE, decode_audio_file,
};

use crate::support::wav_bytes;

fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn given_16khz_mono_wav_when_decoding_then_samples_pass_through() {
    let dir = tempfile::TempDir::new().unwrap();
    let samples: Vec<i16> = (0..1600).map(|i| ((i % 100) * 100) as i16).collect();
    let path = write_temp(&dir, "tone.wav", &wav_bytes(TARGET_SAMPLE_RATE, 1, &samples));

    let audio = decode_audio_file(&path).unwrap();

    assert_eq!(audio.samples.len(), 1600);
    assert!((audio.duration_secs() - 0.1).abs() < 1e-4);
}

#[test]
fn given_stereo_wav_when_decoding_then_channels_are_averaged() {
    let dir = tempfile::TempDir::new().unwrap();
    let frames = 800;
    let interleaved: Vec<i16> = (0..frames).flat_map(|_| [8192i16, 16384i16]).collect();
    let path = write_temp(&dir, "stereo.wav", &wav_bytes(TARGET_SAMPLE_RATE, 2, &interleaved));

    let audio = decode_audio_file(&path).unwrap();

    assert_eq!(audio.samples.len(), frames);
    let expected = (0.25 + 0.5) / 2.0;
    assert!(audio.samples.iter().all(|s| (s - expected).abs() < 1e-3));
}

#[test]
fn given_8khz_wav_when_decoding_then_resampled_to_16khz() {
    let dir = tempfile::TempDir::new().unwrap();
    let samples = vec![0i16; 4000];
    let path = write_temp(&dir, "phone.wav", &wav_bytes(8_000, 1, &samples));

    let audio = decode_audio_file(&path).unwrap();

    let expected = 8000.0;
    let actual = audio.samples.len() as f32;
    assert!((actual - expected).abs() / expected < 0.01, "got {} samples", actual);
}

#[test]
fn given_non_audio_bytes_with_audio_extension_when_decoding_then_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_temp(&dir, "renamed.wav", b"this is a text file, not audio");

    let result = decode_audio_file(&path);

    assert!(matches!(
        result,
        Err(TranscriptionError::UnsupportedFormat(_)) | Err(TranscriptionError::DecodingFailed(_))
    ));
}

#[test]
fn given_missing_file_when_decoding_then_decoding_failed() {
    let dir = tempfile::TempDir::new().unwrap();

    let result = decode_audio_file(&dir.path().join("missing.wav"));

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
}
