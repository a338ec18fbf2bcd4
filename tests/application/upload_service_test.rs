use std::sync::Arc;

use transcribe_server::application::services::{Upload, UploadError};

use crate::support::{
    FailingScratchStore, FailingSpeechModel, MidStreamFailingModel, RecordingSpeechModel,
    file_count, local_store, upload_service,
};

#[tokio::test]
async fn given_no_upload_when_handling_then_no_file_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["hello"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    let result = service.handle(None).await;

    assert!(matches!(result, Err(UploadError::NoFile)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_empty_filename_when_handling_then_no_selected_file_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["hello"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    let result = service.handle(Some(Upload::new("", &b"data"[..]))).await;

    assert!(matches!(result, Err(UploadError::NoSelectedFile)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_disallowed_extension_when_handling_then_rejected_without_touching_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["hello"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    let result = service.handle(Some(Upload::new("song.txt", &b"data"[..]))).await;

    assert!(matches!(result, Err(UploadError::FileTypeNotAllowed)));
    assert_eq!(result.unwrap_err().to_string(), "File type not allowed");
    assert_eq!(model.calls(), 0);
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn given_valid_upload_when_handling_then_model_reads_staged_file_and_it_is_removed() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["hello", "world"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    let text = service
        .handle(Some(Upload::new("song.wav", &b"RIFF....WAVE"[..])))
        .await
        .unwrap();

    assert_eq!(text, "hello world");

    let seen = model.seen();
    assert_eq!(seen.len(), 1);
    let (path, existed) = &seen[0];
    assert!(existed, "model must see the staged file");
    assert_eq!(path.parent().unwrap(), dir.path());
    assert_eq!(path.extension().unwrap(), "wav");
    assert!(!path.exists());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn given_uppercase_extension_when_handling_then_original_case_is_kept_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["ok"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    service
        .handle(Some(Upload::new("SONG.WAV", &b"data"[..])))
        .await
        .unwrap();

    let (path, _) = &model.seen()[0];
    assert_eq!(path.extension().unwrap(), "WAV");
}

#[tokio::test]
async fn given_client_filename_with_path_components_when_handling_then_file_stays_in_upload_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["ok"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    service
        .handle(Some(Upload::new("../../etc/evil.mp3", &b"data"[..])))
        .await
        .unwrap();

    let (path, _) = &model.seen()[0];
    assert_eq!(path.parent().unwrap(), dir.path());
    assert!(!path.to_string_lossy().contains("evil"));
}

#[tokio::test]
async fn given_transcription_fails_when_handling_then_error_returned_and_no_file_remains() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(FailingSpeechModel::new("model exploded"));
    let service = upload_service(local_store(dir.path()), model.clone());

    let result = service
        .handle(Some(Upload::new("song.wav", &b"data"[..])))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, UploadError::Transcription(_)));
    assert_eq!(err.to_string(), "transcription failed: model exploded");
    assert_eq!(model.calls(), 1);
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn given_stream_fails_midway_when_handling_then_no_file_remains() {
    let dir = tempfile::TempDir::new().unwrap();
    let service = upload_service(local_store(dir.path()), Arc::new(MidStreamFailingModel));

    let result = service
        .handle(Some(Upload::new("song.ogg", &b"data"[..])))
        .await;

    assert!(matches!(result, Err(UploadError::Transcription(_))));
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn given_storage_fails_when_handling_then_storage_error_and_model_not_called() {
    let model = Arc::new(RecordingSpeechModel::new(&["hello"]));
    let service = upload_service(Arc::new(FailingScratchStore), model.clone());

    let result = service
        .handle(Some(Upload::new("song.flac", &b"data"[..])))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, UploadError::Storage(_)));
    assert!(!err.is_rejection());
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn given_concurrent_uploads_when_handling_then_each_gets_its_own_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = Arc::new(RecordingSpeechModel::new(&["hi"]));
    let service = upload_service(local_store(dir.path()), model.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .handle(Some(Upload::new(format!("clip{}.mp3", i), vec![i as u8; 64])))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "hi");
    }

    let mut paths: Vec<_> = model.seen().into_iter().map(|(p, _)| p).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 8);
    assert_eq!(file_count(dir.path()), 0);
}
