pub mod http;
pub mod playback;

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use thiserror::Error;

use crate::curriculum::conversation::DialogueLine;
use crate::event::AppEvent;
use crate::speech::playback::AudioSink;

/// What to synthesize: plain text or a marked-up multi-voice script.
/// Exactly one of the two goes over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechPayload {
    Text(String),
    Ssml(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisRequest {
    pub payload: SpeechPayload,
    pub speaking_rate: Option<f64>,
    pub pitch: Option<f64>,
}

impl SynthesisRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: SpeechPayload::Text(text.into()),
            speaking_rate: None,
            pitch: None,
        }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        Self {
            payload: SpeechPayload::Ssml(ssml.into()),
            speaking_rate: None,
            pitch: None,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.speaking_rate = Some(rate);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }
}

/// Decoded audio ready for an output sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Recoverable playback failures. Surfaced as a notice; navigation state is
/// never affected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("speech request failed: {0}")]
    Request(String),
    #[error("speech service error: {0}")]
    Service(String),
    #[error("could not decode audio: {0}")]
    Decode(String),
    #[error("audio output failed: {0}")]
    Output(String),
    #[error("audio support is not compiled in")]
    Disabled,
}

pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip, SynthesisError>;
}

/// Completion message from a synthesis worker. The generation ties it to
/// the `speak` call that issued it; stale generations are discarded on
/// arrival.
#[derive(Debug)]
pub struct SpeechMessage {
    pub generation: u64,
    pub result: Result<AudioClip, SynthesisError>,
}

/// Mediates all playback. At most one clip is in flight or audible:
/// `speak` stops whatever came before, and results from superseded requests
/// are dropped when they land. No retries; a failure clears the busy flag
/// and leaves the learner free to try again.
pub struct SpeechCoordinator {
    synthesizer: Arc<dyn Synthesizer>,
    sink: Box<dyn AudioSink>,
    tx: mpsc::Sender<AppEvent>,
    generation: u64,
    loading: bool,
}

impl SpeechCoordinator {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        sink: Box<dyn AudioSink>,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            synthesizer,
            sink,
            tx,
            generation: 0,
            loading: false,
        }
    }

    /// Issue a synthesis request on a worker thread. Any previous clip,
    /// loading or playing, is discarded first.
    pub fn speak(&mut self, request: SynthesisRequest) {
        self.sink.stop();
        self.generation += 1;
        self.loading = true;

        let generation = self.generation;
        let synthesizer = Arc::clone(&self.synthesizer);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = synthesizer.synthesize(&request);
            let _ = tx.send(AppEvent::Speech(SpeechMessage { generation, result }));
        });
    }

    /// Apply a worker completion. Returns the error to surface, if any.
    pub fn on_message(&mut self, message: SpeechMessage) -> Result<(), SynthesisError> {
        if message.generation != self.generation {
            // Superseded while in flight; the clip never reaches the sink.
            return Ok(());
        }
        self.loading = false;
        match message.result {
            Ok(clip) => self.sink.play(clip),
            Err(err) => Err(err),
        }
    }

    /// Hard cancel: used by every navigation transition away from a
    /// content view.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.sink.stop();
    }

    /// True while a request is loading or a clip is audible. Playback
    /// controls are disabled while busy.
    pub fn is_busy(&self) -> bool {
        self.loading || self.sink.is_playing()
    }
}

/// Build the two-voice script markup for a scenario dialogue: one voice
/// element per line, alternating speakers, with a short pause between lines
/// and a longer one at the end.
pub fn script_ssml(lines: &[DialogueLine], voice_primary: &str, voice_secondary: &str) -> String {
    let mut ssml = String::from("<speak>");
    for (i, line) in lines.iter().enumerate() {
        let voice = if i % 2 == 0 { voice_primary } else { voice_secondary };
        if i > 0 {
            ssml.push_str("<break time=\"400ms\"/>");
        }
        ssml.push_str(&format!("<voice name=\"{voice}\">{}</voice>", line.bengali));
    }
    ssml.push_str("<break time=\"800ms\"/></speak>");
    ssml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::playback::NullSink;
    use std::sync::Mutex;

    struct StubSynthesizer {
        label: &'static str,
    }

    impl Synthesizer for StubSynthesizer {
        fn synthesize(&self, _request: &SynthesisRequest) -> Result<AudioClip, SynthesisError> {
            Ok(AudioClip {
                mime: "audio/mpeg".into(),
                bytes: self.label.as_bytes().to_vec(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        played: Mutex<Vec<Vec<u8>>>,
        stops: Mutex<usize>,
    }

    struct SharedSink(Arc<RecordingSink>);

    impl AudioSink for SharedSink {
        fn play(&mut self, clip: AudioClip) -> Result<(), SynthesisError> {
            self.0.played.lock().unwrap().push(clip.bytes);
            Ok(())
        }

        fn stop(&mut self) {
            *self.0.stops.lock().unwrap() += 1;
        }

        fn is_playing(&self) -> bool {
            false
        }
    }

    fn coordinator_with(
        synthesizer: Arc<dyn Synthesizer>,
    ) -> (SpeechCoordinator, Arc<RecordingSink>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let sink = Arc::new(RecordingSink::default());
        let coordinator = SpeechCoordinator::new(synthesizer, Box::new(SharedSink(Arc::clone(&sink))), tx);
        (coordinator, sink, rx)
    }

    fn drain_speech(rx: &mpsc::Receiver<AppEvent>, count: usize) -> Vec<SpeechMessage> {
        let mut messages = Vec::new();
        while messages.len() < count {
            if let AppEvent::Speech(msg) = rx.recv().unwrap() {
                messages.push(msg);
            }
        }
        // Apply in generation order for a deterministic arrival sequence;
        // the stale-drop logic holds under any interleaving.
        messages.sort_by_key(|m| m.generation);
        messages
    }

    #[test]
    fn second_speak_supersedes_the_first() {
        let (mut coordinator, sink, rx) =
            coordinator_with(Arc::new(StubSynthesizer { label: "clip" }));

        coordinator.speak(SynthesisRequest::text("ক"));
        coordinator.speak(SynthesisRequest::text("খ"));
        assert!(coordinator.is_busy());

        for message in drain_speech(&rx, 2) {
            coordinator.on_message(message).unwrap();
        }

        // Exactly one clip reached the sink: the second request's.
        assert_eq!(sink.played.lock().unwrap().len(), 1);
        assert!(!coordinator.is_busy());
        // Each speak stopped whatever came before it.
        assert_eq!(*sink.stops.lock().unwrap(), 2);
    }

    #[test]
    fn stale_result_after_stop_is_dropped() {
        let (mut coordinator, sink, rx) =
            coordinator_with(Arc::new(StubSynthesizer { label: "clip" }));

        coordinator.speak(SynthesisRequest::text("ক"));
        coordinator.stop();
        assert!(!coordinator.is_busy());

        for message in drain_speech(&rx, 1) {
            coordinator.on_message(message).unwrap();
        }
        assert!(sink.played.lock().unwrap().is_empty());
    }

    #[test]
    fn failure_clears_busy_and_surfaces_the_error() {
        struct FailingSynthesizer;
        impl Synthesizer for FailingSynthesizer {
            fn synthesize(&self, _r: &SynthesisRequest) -> Result<AudioClip, SynthesisError> {
                Err(SynthesisError::Service("voice unavailable".into()))
            }
        }

        let (mut coordinator, sink, rx) = coordinator_with(Arc::new(FailingSynthesizer));
        coordinator.speak(SynthesisRequest::text("ক"));

        let mut errors = Vec::new();
        for message in drain_speech(&rx, 1) {
            if let Err(err) = coordinator.on_message(message) {
                errors.push(err);
            }
        }
        assert_eq!(errors.len(), 1);
        assert!(!coordinator.is_busy());
        assert!(sink.played.lock().unwrap().is_empty());
    }

    #[test]
    fn null_sink_never_reports_playing() {
        let (tx, _rx) = mpsc::channel();
        let coordinator = SpeechCoordinator::new(
            Arc::new(StubSynthesizer { label: "clip" }),
            Box::new(NullSink),
            tx,
        );
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn script_ssml_alternates_voices_with_breaks() {
        let lines = vec![
            DialogueLine {
                speaker: "Panda".into(),
                bengali: "কেমন আছো?".into(),
                transliteration: "Kemon achho?".into(),
                english: "How are you?".into(),
            },
            DialogueLine {
                speaker: "Alpaca".into(),
                bengali: "আমি ভালো আছি।".into(),
                transliteration: "Ami bhalo achhi.".into(),
                english: "I am well.".into(),
            },
        ];
        let ssml = script_ssml(&lines, "bn-IN-Wavenet-B", "bn-IN-Wavenet-A");
        assert!(ssml.starts_with("<speak>"));
        assert!(ssml.contains("<voice name=\"bn-IN-Wavenet-B\">কেমন আছো?</voice>"));
        assert!(ssml.contains("<voice name=\"bn-IN-Wavenet-A\">আমি ভালো আছি।</voice>"));
        assert!(ssml.contains("<break time=\"400ms\"/>"));
        assert!(ssml.ends_with("<break time=\"800ms\"/></speak>"));
    }
}
