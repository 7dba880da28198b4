//! Per-connection session handler.
//!
//! [`SessionHandler`] owns one connection's [`SessionState`] and
//! [`Scorecard`].  It reads raw text frames from an inbound channel and
//! writes [`ServerMessage`]s to an outbound channel, so it runs the same
//! behind a real socket and in tests.
//!
//! ```text
//! inbound frames ──▶ SessionHandler ──spawn──▶ JudgePipeline::run
//!                         │   ▲                        │
//!                         │   └──── SubmissionOutcome ─┘
//!                         ▼
//!                  outbound envelopes
//! ```
//!
//! The judging task is awaited inside the same `select!` as the inbound
//! channel, so a second submission is seen (and refused with `Busy`) while
//! the first is still being transcribed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::pipeline::{
    AudioSubmission, JudgePipeline, SessionState, SubmissionError, SubmissionOutcome,
};
use crate::server::messages::{into_submission, ClientMessage, ServerMessage};
use crate::server::scorecard::Scorecard;

type InFlight = Option<JoinHandle<SubmissionOutcome>>;

/// Drives one connection.  Consumed by [`SessionHandler::run`].
pub struct SessionHandler {
    connection_id: String,
    pipeline: Arc<JudgePipeline>,
    outbound: mpsc::Sender<ServerMessage>,
    state: SessionState,
    scorecard: Scorecard,
}

impl SessionHandler {
    pub fn new(
        connection_id: impl Into<String>,
        pipeline: Arc<JudgePipeline>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            pipeline,
            outbound,
            state: SessionState::Idle,
            scorecard: Scorecard::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run until `inbound` closes.  Returns the final scorecard.
    ///
    /// A submission still in flight at disconnect is left to finish on its
    /// own; its staged clip is released when the task ends and its outcome
    /// is only logged.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<String>) -> Scorecard {
        log::info!("session[{}]: opened", self.connection_id);

        let mut in_flight: InFlight = None;

        loop {
            tokio::select! {
                frame = inbound.recv() => {
                    let Some(text) = frame else { break };
                    if let Some(submission) = self.on_frame(&text).await {
                        in_flight = Some(self.spawn(submission));
                    }
                }
                joined = join_in_flight(&mut in_flight) => {
                    in_flight = None;
                    self.on_outcome(flatten(joined)).await;
                }
            }
        }

        if let Some(handle) = in_flight {
            let id = self.connection_id.clone();
            tokio::spawn(async move {
                match flatten(handle.await) {
                    Ok(judgement) => log::info!(
                        "session[{id}]: disconnected before verdict, discarding (correct={})",
                        judgement.verdict.is_correct
                    ),
                    Err(e) => log::info!("session[{id}]: disconnected before verdict, discarding ({e})"),
                }
            });
        }

        log::info!(
            "session[{}]: closed, score {}",
            self.connection_id,
            self.scorecard.summary()
        );
        self.scorecard
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Handle one inbound frame.  Returns a submission to start, if any.
    async fn on_frame(&mut self, text: &str) -> Option<AudioSubmission> {
        let (data, question) = match ClientMessage::parse(text) {
            Ok(ClientMessage::Audio { data, question }) => (data, question),
            Ok(ClientMessage::Other) => {
                log::debug!("session[{}]: ignoring non-audio message", self.connection_id);
                return None;
            }
            Err(e) => {
                log::info!("session[{}]: {e}", self.connection_id);
                self.reject(&e).await;
                return None;
            }
        };

        if self.state.is_busy() {
            log::info!(
                "session[{}]: submission refused, state {}",
                self.connection_id,
                self.state.label()
            );
            self.reject(&SubmissionError::Busy).await;
            return None;
        }

        match into_submission(&self.connection_id, &data, question) {
            Ok(submission) => Some(submission),
            Err(e) => {
                log::info!("session[{}]: {e}", self.connection_id);
                self.reject(&e).await;
                None
            }
        }
    }

    fn spawn(&mut self, submission: AudioSubmission) -> JoinHandle<SubmissionOutcome> {
        self.state = SessionState::AwaitingTranscript;
        log::debug!("session[{}]: state → {}", self.connection_id, self.state.label());

        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move { pipeline.run(submission).await })
    }

    // -----------------------------------------------------------------------
    // Outbound
    // -----------------------------------------------------------------------

    async fn on_outcome(&mut self, outcome: SubmissionOutcome) {
        self.state = SessionState::Responded;
        self.scorecard.record(&outcome);
        self.send(ServerMessage::from_outcome(&outcome)).await;

        self.state = SessionState::Idle;
        log::debug!("session[{}]: state → {}", self.connection_id, self.state.label());
    }

    async fn reject(&mut self, error: &SubmissionError) {
        self.scorecard.record_rejection();
        self.send(ServerMessage::from_error(error)).await;
    }

    async fn send(&self, message: ServerMessage) {
        if self.outbound.send(message).await.is_err() {
            log::debug!("session[{}]: outbound closed, dropping envelope", self.connection_id);
        }
    }
}

/// Await the in-flight task, or never resolve when there is none.
async fn join_in_flight(slot: &mut InFlight) -> Result<SubmissionOutcome, JoinError> {
    match slot.as_mut() {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn flatten(joined: Result<SubmissionOutcome, JoinError>) -> SubmissionOutcome {
    joined.unwrap_or_else(|e| {
        log::error!("judging task failed: {e}");
        Err(SubmissionError::Internal(e.to_string()))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioStager;
    use crate::judge::EquivalenceEngine;
    use crate::stt::{MockGateway, PanickingGateway, TranscriptionGateway};
    use base64::Engine as _;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    const MIN_BYTES: usize = 5_000;

    struct Harness {
        inbound: mpsc::Sender<String>,
        outbound: mpsc::Receiver<ServerMessage>,
        session: JoinHandle<Scorecard>,
        pipeline: Arc<JudgePipeline>,
        _dir: TempDir,
    }

    fn start(gateway: Arc<dyn TranscriptionGateway>) -> Harness {
        let dir = tempdir().expect("temp dir");
        let stager = AudioStager::new(dir.path(), MIN_BYTES, "webm");
        let pipeline = Arc::new(JudgePipeline::new(
            stager,
            gateway,
            EquivalenceEngine::default(),
            "en",
        ));

        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, out_rx) = mpsc::channel(8);
        let handler = SessionHandler::new("test", Arc::clone(&pipeline), out_tx);
        let session = tokio::spawn(handler.run(in_rx));

        Harness {
            inbound: in_tx,
            outbound: out_rx,
            session,
            pipeline,
            _dir: dir,
        }
    }

    fn audio_frame(question: &str, answer: &str, len: usize) -> String {
        let data = base64::engine::general_purpose::STANDARD.encode(vec![0x1a_u8; len]);
        serde_json::json!({
            "type": "audio",
            "data": data,
            "question": { "question": question, "answer": answer }
        })
        .to_string()
    }

    async fn next(outbound: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
        tokio::time::timeout(Duration::from_secs(5), outbound.recv())
            .await
            .expect("timed out waiting for envelope")
            .expect("outbound closed")
    }

    fn error(message: &str) -> ServerMessage {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    #[tokio::test]
    async fn correct_answer_yields_transcription_envelope() {
        let mut h = start(Arc::new(MockGateway::ok("four")));

        h.inbound
            .send(audio_frame("What is 2 + 2?", "4", MIN_BYTES))
            .await
            .unwrap();

        assert_eq!(
            next(&mut h.outbound).await,
            ServerMessage::Transcription {
                text: "four".into(),
                is_correct: true,
                message: "Correct! ✓".into(),
            }
        );

        drop(h.inbound);
        let card = h.session.await.unwrap();
        assert_eq!(card.answered(), 1);
        assert_eq!(card.correct(), 1);
    }

    #[tokio::test]
    async fn malformed_json_gets_generic_error_and_session_continues() {
        let mut h = start(Arc::new(MockGateway::ok("Paris")));

        h.inbound.send("not json {{{".into()).await.unwrap();
        assert_eq!(next(&mut h.outbound).await, error("Error processing request"));

        h.inbound
            .send(audio_frame("Capital of France?", "Paris", MIN_BYTES))
            .await
            .unwrap();
        assert!(matches!(
            next(&mut h.outbound).await,
            ServerMessage::Transcription { is_correct: true, .. }
        ));
    }

    #[tokio::test]
    async fn other_message_types_are_ignored() {
        let mut h = start(Arc::new(MockGateway::ok("Paris")));

        h.inbound.send(r#"{"type":"ping"}"#.into()).await.unwrap();
        h.inbound
            .send(audio_frame("Capital of France?", "Paris", MIN_BYTES))
            .await
            .unwrap();

        // The first envelope is the verdict; the ping produced nothing.
        assert!(matches!(
            next(&mut h.outbound).await,
            ServerMessage::Transcription { .. }
        ));
    }

    #[tokio::test]
    async fn short_audio_is_reported() {
        let gateway = Arc::new(MockGateway::ok("Paris"));
        let mut h = start(gateway.clone());

        h.inbound
            .send(audio_frame("Capital of France?", "Paris", 100))
            .await
            .unwrap();

        assert_eq!(
            next(&mut h.outbound).await,
            error("Audio too short. Please speak longer and clearer.")
        );
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn overlapping_submission_is_refused_with_busy() {
        let gateway =
            Arc::new(MockGateway::ok("Paris").with_delay(Duration::from_millis(300)));
        let mut h = start(gateway.clone());

        let frame = audio_frame("Capital of France?", "Paris", MIN_BYTES);
        h.inbound.send(frame.clone()).await.unwrap();
        h.inbound.send(frame).await.unwrap();

        assert_eq!(
            next(&mut h.outbound).await,
            error("Still judging your previous answer. Please wait.")
        );
        assert!(matches!(
            next(&mut h.outbound).await,
            ServerMessage::Transcription { is_correct: true, .. }
        ));
        assert_eq!(gateway.calls(), 1);

        drop(h.inbound);
        let card = h.session.await.unwrap();
        assert_eq!(card.answered(), 1);
        assert_eq!(card.rejected(), 1);
    }

    #[tokio::test]
    async fn implausible_answer_gets_guidance_and_no_verdict() {
        let mut h = start(Arc::new(MockGateway::ok("um")));

        h.inbound
            .send(audio_frame("What is 2 + 2?", "4", MIN_BYTES))
            .await
            .unwrap();

        assert_eq!(
            next(&mut h.outbound).await,
            error("Please answer with a number (e.g., 'four' or '4')")
        );

        drop(h.inbound);
        let card = h.session.await.unwrap();
        assert_eq!(card.answered(), 0);
        assert_eq!(card.rejected(), 1);
    }

    #[tokio::test]
    async fn panicked_judging_task_is_reported_as_processing_error() {
        let mut h = start(Arc::new(PanickingGateway));

        h.inbound
            .send(audio_frame("Capital of France?", "Paris", MIN_BYTES))
            .await
            .unwrap();

        assert_eq!(
            next(&mut h.outbound).await,
            error("Error processing audio. Please try again.")
        );

        let ledger = h.pipeline.stager().ledger();
        assert_eq!(ledger.staged(), 1);
        assert_eq!(ledger.released(), 1);

        drop(h.inbound);
        let card = h.session.await.unwrap();
        assert_eq!(card.answered(), 0);
        assert_eq!(card.rejected(), 1);
    }

    #[tokio::test]
    async fn disconnect_mid_flight_discards_verdict_and_releases_clip() {
        let gateway =
            Arc::new(MockGateway::ok("Paris").with_delay(Duration::from_millis(200)));
        let mut h = start(gateway.clone());

        h.inbound
            .send(audio_frame("Capital of France?", "Paris", MIN_BYTES))
            .await
            .unwrap();

        // Wait until the gateway has the clip, then hang up.
        for _ in 0..100 {
            if gateway.calls() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        drop(h.inbound);

        let card = h.session.await.unwrap();
        assert_eq!(card.answered(), 0);
        assert!(h.outbound.recv().await.is_none(), "verdict must be discarded");

        let ledger = h.pipeline.stager().ledger();
        for _ in 0..100 {
            if ledger.staged() == 1 && ledger.live() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ledger.staged(), 1);
        assert_eq!(ledger.released(), 1);
    }
}
