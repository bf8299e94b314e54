use crate::speech::{AudioClip, SynthesisError};

/// Where decoded clips go. The coordinator owns exactly one sink, on the
/// event-loop thread, and guarantees `play` is never called while a
/// previous clip should survive. Not `Send`: the rodio output stream is
/// pinned to the thread that opened it.
pub trait AudioSink {
    fn play(&mut self, clip: AudioClip) -> Result<(), SynthesisError>;
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Discards clips. Used when no output device is available and in builds
/// without the audio feature.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _clip: AudioClip) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_playing(&self) -> bool {
        false
    }
}

#[cfg(feature = "audio")]
pub use rodio_sink::RodioSink;

#[cfg(feature = "audio")]
mod rodio_sink {
    use std::io::Cursor;

    use super::AudioSink;
    use crate::speech::{AudioClip, SynthesisError};

    /// Plays clips through the default output device. Holding the sink
    /// keeps playback alive; `stop` drops the clip immediately.
    pub struct RodioSink {
        _stream: rodio::OutputStream,
        handle: rodio::OutputStreamHandle,
        sink: Option<rodio::Sink>,
    }

    impl RodioSink {
        pub fn new() -> Result<Self, SynthesisError> {
            let (stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| SynthesisError::Output(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
                sink: None,
            })
        }
    }

    impl AudioSink for RodioSink {
        fn play(&mut self, clip: AudioClip) -> Result<(), SynthesisError> {
            self.stop();
            let sink = rodio::Sink::try_new(&self.handle)
                .map_err(|e| SynthesisError::Output(e.to_string()))?;
            let source = rodio::Decoder::new(Cursor::new(clip.bytes))
                .map_err(|e| SynthesisError::Decode(e.to_string()))?;
            sink.append(source);
            sink.play();
            self.sink = Some(sink);
            Ok(())
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }

        fn is_playing(&self) -> bool {
            self.sink.as_ref().is_some_and(|s| !s.empty())
        }
    }
}

/// The best sink this build and machine can offer.
pub fn default_sink() -> Box<dyn AudioSink> {
    #[cfg(feature = "audio")]
    if let Ok(sink) = RodioSink::new() {
        return Box::new(sink);
    }
    Box::new(NullSink)
}
