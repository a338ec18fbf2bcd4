pub mod audio_decoder;
mod candle_whisper_engine;
mod mock_speech_model;
mod openai_whisper_engine;
mod speech_model_factory;

pub use candle_whisper_engine::CandleWhisperEngine;
pub use mock_speech_model::MockSpeechModel;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use speech_model_factory::SpeechModelFactory;
