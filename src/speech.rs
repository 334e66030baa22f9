//! Reconciles streamed speech-recognition results into one search query.
//!
//! The recognizer emits events carrying interim and final segments. Final
//! text accumulates for the whole listening session; interim text is a
//! single replaceable tail. Stopping the session hands the accumulated text
//! to the voice search exactly once.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionAlternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub is_final: bool,
    pub alternatives: Vec<RecognitionAlternative>,
}

impl RecognitionResult {
    pub fn final_text(transcript: &str) -> Self {
        Self::new(transcript, true)
    }

    pub fn interim(transcript: &str) -> Self {
        Self::new(transcript, false)
    }

    fn new(transcript: &str, is_final: bool) -> Self {
        Self {
            is_final,
            alternatives: vec![RecognitionAlternative {
                transcript: transcript.to_string(),
                confidence: None,
            }],
        }
    }

    /// Best alternative, trimmed. Empty when the recognizer sent none.
    fn transcript(&self) -> &str {
        self.alternatives
            .first()
            .map(|a| a.transcript.trim())
            .unwrap_or("")
    }
}

/// One recognizer callback. Results before `result_index` were delivered by
/// earlier events and are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionEvent {
    #[serde(default)]
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

impl RecognitionEvent {
    pub fn new(results: Vec<RecognitionResult>) -> Self {
        Self {
            result_index: 0,
            results,
        }
    }
}

/// Signals delivered to a session, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpeechSignal {
    Start,
    Result(RecognitionEvent),
    Stop,
    End,
    Error { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptState {
    pub finalized_text: String,
    pub interim_text: String,
}

impl TranscriptState {
    /// `finalized + " " + interim`, trimmed.
    pub fn query(&self) -> String {
        format!("{} {}", self.finalized_text, self.interim_text)
            .trim()
            .to_string()
    }

    fn apply(&mut self, event: &RecognitionEvent) {
        let fresh = event.results.iter().skip(event.result_index);

        let mut finals = Vec::new();
        let mut interims = Vec::new();
        for result in fresh {
            let text = result.transcript();
            if text.is_empty() {
                continue;
            }
            if result.is_final {
                finals.push(text);
            } else {
                interims.push(text);
            }
        }

        if finals.is_empty() && interims.is_empty() {
            return;
        }

        if !finals.is_empty() {
            if !self.finalized_text.is_empty() {
                self.finalized_text.push(' ');
            }
            self.finalized_text.push_str(&finals.join(" "));
            self.interim_text.clear();
        }
        if !interims.is_empty() {
            self.interim_text = interims.join(" ");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerState {
    Idle,
    Listening(TranscriptState),
}

/// Query handed to the voice search when a session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceQuery {
    pub text: String,
    pub language: String,
}

/// Downstream consumer of completed voice queries.
pub trait VoiceSearch {
    fn search(&mut self, query: VoiceQuery);
}

impl VoiceSearch for Vec<VoiceQuery> {
    fn search(&mut self, query: VoiceQuery) {
        self.push(query);
    }
}

/// Two-state machine over a single listening session.
///
/// Calling `start` while already listening restarts the session: the
/// in-progress text is discarded and no search is triggered for it.
#[derive(Debug, Clone)]
pub struct SpeechStreamReconciler {
    state: ReconcilerState,
    language: String,
    last_query: String,
}

impl SpeechStreamReconciler {
    pub fn new(language: &str) -> Self {
        Self {
            state: ReconcilerState::Idle,
            language: language.to_string(),
            last_query: String::new(),
        }
    }

    pub fn state(&self) -> &ReconcilerState {
        &self.state
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, ReconcilerState::Listening(_))
    }

    pub fn start(&mut self) {
        if let ReconcilerState::Listening(transcript) = &self.state {
            log::debug!(
                "Restarting speech session, discarding {:?}",
                transcript.query()
            );
        }
        self.state = ReconcilerState::Listening(TranscriptState::default());
        self.last_query.clear();
    }

    /// Folds one recognizer event into the transcript. Ignored while idle.
    pub fn handle_event(&mut self, event: &RecognitionEvent) -> bool {
        match &mut self.state {
            ReconcilerState::Listening(transcript) => {
                transcript.apply(event);
                true
            }
            ReconcilerState::Idle => {
                log::debug!("Ignoring recognition event while idle");
                false
            }
        }
    }

    /// Text shown to the user: live while listening, frozen once stopped.
    pub fn query(&self) -> String {
        match &self.state {
            ReconcilerState::Listening(transcript) => transcript.query(),
            ReconcilerState::Idle => self.last_query.clone(),
        }
    }

    /// Ends the session and returns the query to search for, if any.
    /// A no-op while idle. A session that recognized no text ends without a
    /// query, so callers never search for an empty string.
    pub fn stop(&mut self) -> Option<VoiceQuery> {
        let ReconcilerState::Listening(transcript) =
            std::mem::replace(&mut self.state, ReconcilerState::Idle)
        else {
            return None;
        };

        self.last_query = transcript.query();
        if self.last_query.is_empty() {
            log::info!("Speech session ended without any recognized text");
            return None;
        }

        log::info!("Speech session finished with query {:?}", self.last_query);
        Some(VoiceQuery {
            text: self.last_query.clone(),
            language: self.language.clone(),
        })
    }

    /// Recognizer failure: back to idle without searching.
    pub fn abort(&mut self, reason: &str) {
        if self.is_listening() {
            log::warn!("Speech recognition error: {reason}");
            self.state = ReconcilerState::Idle;
        }
    }

    pub fn apply(&mut self, signal: &SpeechSignal) -> Option<VoiceQuery> {
        match signal {
            SpeechSignal::Start => {
                self.start();
                None
            }
            SpeechSignal::Result(event) => {
                self.handle_event(event);
                None
            }
            SpeechSignal::Stop | SpeechSignal::End => self.stop(),
            SpeechSignal::Error { message } => {
                self.abort(message);
                None
            }
        }
    }
}

/// Drives a reconciler from an event channel fed by recognizer callbacks.
pub struct SpeechSession {
    receiver: mpsc::UnboundedReceiver<SpeechSignal>,
    reconciler: SpeechStreamReconciler,
}

impl SpeechSession {
    pub fn channel(language: &str) -> (mpsc::UnboundedSender<SpeechSignal>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = Self {
            receiver,
            reconciler: SpeechStreamReconciler::new(language),
        };
        (sender, session)
    }

    /// Processes signals until every sender is dropped. A closed channel
    /// while listening counts as end of stream. Returns the number of
    /// searches triggered.
    pub async fn run<S: VoiceSearch>(mut self, search: &mut S) -> usize {
        let mut searches = 0;

        while let Some(signal) = self.receiver.recv().await {
            if let Some(query) = self.reconciler.apply(&signal) {
                search.search(query);
                searches += 1;
            }
        }

        if let Some(query) = self.reconciler.stop() {
            search.search(query);
            searches += 1;
        }

        searches
    }
}
