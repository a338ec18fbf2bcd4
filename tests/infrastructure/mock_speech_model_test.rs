use futures::TryStreamExt;

use transcribe_server::application::ports::{SpeechModel, TranscriptionError};
use transcribe_server::infrastructure::audio::MockSpeechModel;

#[tokio::test]
async fn given_existing_file_when_transcribing_then_configured_segments_are_streamed_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("clip.wav");
    std::fs::write(&path, b"anything").unwrap();
    let model = MockSpeechModel::new(["first", "second", "third"]);

    let transcription = model.transcribe(&path).await.unwrap();
    let segments: Vec<_> = transcription.segments.try_collect().await.unwrap();

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
    assert_eq!(segments[1].start, 1.0);
    assert_eq!(segments[1].end, 2.0);
    assert_eq!(transcription.info.duration, Some(3.0));
}

#[tokio::test]
async fn given_missing_file_when_transcribing_then_decoding_failed() {
    let model = MockSpeechModel::new(["never"]);

    let result = model
        .transcribe(std::path::Path::new("/definitely/not/here.wav"))
        .await;

    assert!(matches!(result, Err(TranscriptionError::DecodingFailed(_))));
}
