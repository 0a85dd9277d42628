mod faster_whisper_client;
mod frame_decoder;
mod mock_transcription_client;
mod response_shape;

pub use faster_whisper_client::FasterWhisperClient;
pub use frame_decoder::FrameDecoder;
pub use mock_transcription_client::MockTranscriptionClient;
pub use response_shape::ResponseShape;
