mod audio_decoder_test;
mod mock_speech_model_test;
