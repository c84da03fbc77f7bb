// orchestrator.rs
//
// Drives a task through its lifecycle: spawns one supervised background
// worker per upload for transcription and optional diarization, and runs
// insight generation inline on the calling request.

use anyhow::anyhow;
use futures_util::FutureExt;
use log::{error, info, warn};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::engines::{Diarizer, SpeechToText};
use crate::error::TaskError;
use crate::insights::InsightProvider;
use crate::task::{Task, TaskStatus, TaskStore};
use crate::transcript::{compose, select_best_text, TranscriptionResult};

/// Orchestrates the task state machine.
///
/// All task mutations go through the shared [`TaskStore`]; the external
/// engines are injected behind trait objects.
pub struct JobOrchestrator {
    store: Arc<TaskStore>,
    speech: Arc<dyn SpeechToText>,
    diarizer: Arc<dyn Diarizer>,
    insights: Arc<dyn InsightProvider>,
    config: OrchestratorConfig,
}

impl JobOrchestrator {
    pub fn new(
        store: Arc<TaskStore>,
        speech: Arc<dyn SpeechToText>,
        diarizer: Arc<dyn Diarizer>,
        insights: Arc<dyn InsightProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            speech,
            diarizer,
            insights,
            config,
        }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Register a new task for an incoming upload
    pub fn create_task(&self, diarization: bool) -> Uuid {
        let task_id = self.store.create_task();
        self.store.set_diarization_enabled(task_id, diarization);
        info!("Created task {} (diarization: {})", task_id, diarization);
        task_id
    }

    /// Mark the upload accepted and spawn the background transcription
    /// worker. The caller is never blocked on transcription; progress is
    /// observed through status queries.
    ///
    /// The worker is supervised: a panic or error in any stage still writes
    /// a terminal `error` status to the task.
    pub fn start_processing(
        &self,
        task_id: Uuid,
        file_path: PathBuf,
    ) -> Result<JoinHandle<()>, TaskError> {
        if !self.store.contains(task_id) {
            return Err(TaskError::NotFound(task_id));
        }

        self.store.set_status(
            task_id,
            TaskStatus::Uploaded,
            Some("Upload received. Processing..."),
            None,
        );

        let store = self.store.clone();
        let speech = self.speech.clone();
        let diarizer = self.diarizer.clone();
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            let pipeline =
                Self::process_audio(&store, speech, diarizer, &config, task_id, &file_path);

            match AssertUnwindSafe(pipeline).catch_unwind().await {
                Ok(Ok(())) => {
                    info!("Task {} transcription completed", task_id);
                }
                Ok(Err(e)) => {
                    error!("Task {} failed: {:#}", task_id, e);
                    store.set_status(
                        task_id,
                        TaskStatus::Error,
                        Some(&format!("{:#}", e)),
                        None,
                    );
                }
                Err(_) => {
                    error!("Task {} worker panicked", task_id);
                    store.set_status(
                        task_id,
                        TaskStatus::Error,
                        Some("Transcription worker failed unexpectedly."),
                        None,
                    );
                }
            }
        });

        Ok(handle)
    }

    /// The background pipeline: transcribe, optionally diarize, then write
    /// the full transcription result in one atomic update. Any error bubbles
    /// up to the supervisor, which records the terminal status.
    async fn process_audio(
        store: &TaskStore,
        speech: Arc<dyn SpeechToText>,
        diarizer: Arc<dyn Diarizer>,
        config: &OrchestratorConfig,
        task_id: Uuid,
        file_path: &Path,
    ) -> anyhow::Result<()> {
        if !file_path.exists() {
            return Err(anyhow!(
                "Audio file no longer exists: {}",
                file_path.display()
            ));
        }

        store.set_status(
            task_id,
            TaskStatus::Transcribing,
            Some("Processing started."),
            Some("Transcribing audio..."),
        );

        let output = speech
            .transcribe(file_path, true)
            .await
            .map_err(|e| anyhow!("Transcription failed: {}", e))?;

        if output.text.trim().is_empty() {
            return Err(anyhow!("Transcription returned empty text."));
        }

        let mut result =
            TranscriptionResult::new(output.text, output.language, output.segments);
        if !result.segments.is_empty() {
            result.timestamped_text = Some(compose::format_with_timestamps(&result.segments));
        }

        if store.diarization_enabled(task_id) {
            store.set_status(
                task_id,
                TaskStatus::Diarizing,
                None,
                Some("Identifying speakers..."),
            );

            match diarizer
                .diarize(file_path, config.min_speakers, config.max_speakers)
                .await
            {
                Ok(mut segments) => {
                    segments.sort_by(|a, b| {
                        a.start
                            .partial_cmp(&b.start)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    });

                    if segments.is_empty() {
                        info!("Task {} diarization found no speaker segments", task_id);
                    } else {
                        result.speakers_text = Some(compose::format_with_speakers(&segments));
                        result.speaker_summary = Some(compose::summarize_speakers(&segments));
                        if !result.segments.is_empty() {
                            result.combined_text =
                                Some(compose::combine(&result.segments, &segments));
                        }
                        result.diarization = Some(segments);
                    }
                }
                Err(e) => {
                    // Non-fatal: degrade to transcription-only output
                    warn!("Task {} diarization failed: {}", task_id, e);
                    result.diarization_error = Some(e.to_string());
                }
            }
        }

        let default_prompt = config.default_insights_prompt.clone();
        store.update(task_id, |task| {
            task.transcription_result = Some(result);
            task.status = TaskStatus::TranscriptionCompleted;
            task.message = "Transcription complete. Ready to generate insights.".to_string();
            task.progress = "100%".to_string();
            task.current_prompt = default_prompt;
        });

        Ok(())
    }

    /// Generate (or regenerate) insights for a completed transcription.
    ///
    /// Runs inline: the caller blocks until the language model answers or
    /// fails. Permitted only from `transcription_completed`,
    /// `completed_with_insights` and `error_insights`; any other state is
    /// rejected without side effects. The guard checks state, not
    /// in-flight-ness: two concurrent requests for the same task race and
    /// the later result-write wins.
    pub async fn generate_insights(
        &self,
        task_id: Uuid,
        prompt_template: &str,
        model_name: &str,
    ) -> Result<Task, TaskError> {
        let task = self.store.get(task_id).ok_or(TaskError::NotFound(task_id))?;
        let result = task
            .transcription_result
            .as_ref()
            .ok_or(TaskError::MissingTranscript(task_id))?;

        if !task.status.can_generate_insights() {
            return Err(TaskError::InvalidState(task.status));
        }
        if !prompt_template.contains("{{text}}") {
            return Err(TaskError::InvalidPrompt(
                "prompt template must contain the {{text}} placeholder".to_string(),
            ));
        }
        if model_name.trim().is_empty() {
            return Err(TaskError::NoModelSelected);
        }

        let (source_text, source) = select_best_text(result);
        info!(
            "Task {} generating insights from {} text with model {}",
            task_id, source, model_name
        );

        // Clear prior insights while the new ones are generated
        self.store.update(task_id, |task| {
            task.status = TaskStatus::GeneratingInsights;
            task.progress = format!("Generating insights with model {}...", model_name);
            task.current_prompt = prompt_template.to_string();
            task.selected_model = Some(model_name.to_string());
            task.insights_text = None;
        });

        match self
            .insights
            .generate(&source_text, prompt_template, model_name)
            .await
        {
            Ok(insights_text) => {
                self.store.update(task_id, |task| {
                    task.status = TaskStatus::CompletedWithInsights;
                    task.message = "Insights generated successfully.".to_string();
                    task.insights_text = Some(insights_text);
                });
                self.store.get(task_id).ok_or(TaskError::NotFound(task_id))
            }
            Err(e) => {
                warn!("Task {} insight generation failed: {}", task_id, e);
                self.store.set_status(
                    task_id,
                    TaskStatus::ErrorInsights,
                    Some(&format!("Failed to generate insights: {}", e)),
                    None,
                );
                Err(TaskError::Insight(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_INSIGHTS_PROMPT;
    use crate::engines::{
        DiarizationError, SpeechToText, TranscriptionError, TranscriptionOutput,
    };
    use crate::insights::InsightError;
    use crate::transcript::{DiarizationSegment, TranscriptSegment};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::NamedTempFile;

    struct MockSpeech {
        output: Result<TranscriptionOutput, TranscriptionError>,
        panic: bool,
    }

    impl MockSpeech {
        fn ok() -> Self {
            Self {
                output: Ok(TranscriptionOutput {
                    text: "Hi Bye".to_string(),
                    language: Some("en".to_string()),
                    segments: vec![
                        TranscriptSegment {
                            start: 0.0,
                            end: 2.5,
                            text: "Hi".to_string(),
                        },
                        TranscriptSegment {
                            start: 2.8,
                            end: 5.2,
                            text: "Bye".to_string(),
                        },
                    ],
                }),
                panic: false,
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                output: Err(TranscriptionError::EngineFailed(msg.to_string())),
                panic: false,
            }
        }

        fn empty() -> Self {
            Self {
                output: Ok(TranscriptionOutput {
                    text: "   ".to_string(),
                    language: None,
                    segments: Vec::new(),
                }),
                panic: false,
            }
        }

        fn panicking() -> Self {
            let mut mock = Self::ok();
            mock.panic = true;
            mock
        }
    }

    #[async_trait]
    impl SpeechToText for MockSpeech {
        async fn transcribe(
            &self,
            _file_path: &Path,
            _want_timestamps: bool,
        ) -> Result<TranscriptionOutput, TranscriptionError> {
            if self.panic {
                panic!("mock engine blew up");
            }
            self.output.clone()
        }
    }

    struct MockDiarizer {
        output: Result<Vec<DiarizationSegment>, DiarizationError>,
    }

    impl MockDiarizer {
        fn ok() -> Self {
            // Deliberately unsorted; the orchestrator sorts by start
            Self {
                output: Ok(vec![
                    DiarizationSegment {
                        start: 2.6,
                        end: 6.0,
                        speaker: "SPEAKER_01".to_string(),
                    },
                    DiarizationSegment {
                        start: 0.0,
                        end: 2.6,
                        speaker: "SPEAKER_00".to_string(),
                    },
                ]),
            }
        }

        fn failing() -> Self {
            Self {
                output: Err(DiarizationError::EngineFailed("no speakers".to_string())),
            }
        }
    }

    #[async_trait]
    impl Diarizer for MockDiarizer {
        async fn diarize(
            &self,
            _file_path: &Path,
            _min_speakers: u32,
            _max_speakers: u32,
        ) -> Result<Vec<DiarizationSegment>, DiarizationError> {
            self.output.clone()
        }
    }

    struct MockInsights {
        response: Result<String, InsightError>,
    }

    impl MockInsights {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: Err(InsightError::ProviderUnavailable(
                    "connection refused".to_string(),
                )),
            }
        }
    }

    #[async_trait]
    impl InsightProvider for MockInsights {
        async fn list_models(&self) -> Result<Vec<String>, InsightError> {
            Ok(vec!["llama3:latest".to_string()])
        }

        async fn generate(
            &self,
            _text: &str,
            _prompt_template: &str,
            _model_name: &str,
        ) -> Result<String, InsightError> {
            self.response.clone()
        }
    }

    fn orchestrator(
        speech: MockSpeech,
        diarizer: MockDiarizer,
        insights: MockInsights,
    ) -> JobOrchestrator {
        JobOrchestrator::new(
            Arc::new(TaskStore::new(DEFAULT_INSIGHTS_PROMPT)),
            Arc::new(speech),
            Arc::new(diarizer),
            Arc::new(insights),
            OrchestratorConfig::default(),
        )
    }

    async fn run_to_completion(orch: &JobOrchestrator, diarization: bool) -> Uuid {
        let file = NamedTempFile::new().unwrap();
        let task_id = orch.create_task(diarization);
        let handle = orch
            .start_processing(task_id, file.path().to_path_buf())
            .unwrap();
        handle.await.unwrap();
        task_id
    }

    #[tokio::test]
    async fn test_transcription_without_diarization() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = run_to_completion(&orch, false).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::TranscriptionCompleted);

        let result = task.transcription_result.unwrap();
        assert_eq!(result.text, "Hi Bye");
        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(
            result.timestamped_text.as_deref(),
            Some("[00:00 - 00:02] Hi\n[00:02 - 00:05] Bye")
        );
        assert!(result.combined_text.is_none());
        assert!(result.diarization.is_none());
    }

    #[tokio::test]
    async fn test_transcription_with_diarization() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = run_to_completion(&orch, true).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::TranscriptionCompleted);

        let result = task.transcription_result.unwrap();
        assert_eq!(
            result.combined_text.as_deref(),
            Some("[00:00 - 00:02] SPEAKER_00: Hi\n[00:02 - 00:05] SPEAKER_01: Bye")
        );
        assert!(result.speakers_text.is_some());
        assert!(result.diarization_error.is_none());

        // Segments come back sorted by start
        let diarization = result.diarization.unwrap();
        assert_eq!(diarization[0].speaker, "SPEAKER_00");
        assert_eq!(diarization[1].speaker, "SPEAKER_01");

        let summary = result.speaker_summary.unwrap();
        assert_eq!(summary.total_speakers, 2);
        assert_eq!(summary.speakers["SPEAKER_00"].percentage, 43.3);
        assert_eq!(summary.speakers["SPEAKER_01"].percentage, 56.7);
    }

    #[tokio::test]
    async fn test_diarization_failure_is_non_fatal() {
        let orch = orchestrator(
            MockSpeech::ok(),
            MockDiarizer::failing(),
            MockInsights::ok("x"),
        );
        let task_id = run_to_completion(&orch, true).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::TranscriptionCompleted);

        let result = task.transcription_result.unwrap();
        assert!(result.diarization_error.is_some());
        assert!(result.combined_text.is_none());
        assert!(result.timestamped_text.is_some());
    }

    #[tokio::test]
    async fn test_missing_source_file_is_terminal() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = orch.create_task(false);
        let handle = orch
            .start_processing(task_id, PathBuf::from("/nonexistent/audio.mp3"))
            .unwrap();
        handle.await.unwrap();

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Error);
        assert!(task.message.contains("no longer exists"));
        assert!(task.transcription_result.is_none());
    }

    #[tokio::test]
    async fn test_engine_failure_is_terminal() {
        let orch = orchestrator(
            MockSpeech::failing("decoder crashed"),
            MockDiarizer::ok(),
            MockInsights::ok("x"),
        );
        let task_id = run_to_completion(&orch, false).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Error);
        assert!(task.message.contains("decoder crashed"));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_terminal() {
        let orch = orchestrator(MockSpeech::empty(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = run_to_completion(&orch, false).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Error);
        assert!(task.message.contains("empty text"));
    }

    #[tokio::test]
    async fn test_worker_panic_still_writes_terminal_status() {
        let orch = orchestrator(
            MockSpeech::panicking(),
            MockDiarizer::ok(),
            MockInsights::ok("x"),
        );
        let task_id = run_to_completion(&orch, false).await;

        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::Error);
    }

    #[tokio::test]
    async fn test_start_processing_unknown_task() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let result = orch.start_processing(Uuid::new_v4(), PathBuf::from("x.mp3"));
        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insights_rejected_before_transcription() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = orch.create_task(false);

        let result = orch
            .generate_insights(task_id, "Prompt: {{text}}", "llama3:latest")
            .await;
        assert!(matches!(result, Err(TaskError::MissingTranscript(_))));

        // Rejected without side effects
        assert_eq!(orch.store().get(task_id).unwrap().status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_insights_rejected_while_already_generating() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = run_to_completion(&orch, false).await;

        orch.store()
            .set_status(task_id, TaskStatus::GeneratingInsights, None, None);

        let result = orch
            .generate_insights(task_id, "Prompt: {{text}}", "llama3:latest")
            .await;
        assert!(matches!(
            result,
            Err(TaskError::InvalidState(TaskStatus::GeneratingInsights))
        ));
    }

    #[tokio::test]
    async fn test_insights_input_validation() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("x"));
        let task_id = run_to_completion(&orch, false).await;

        let result = orch
            .generate_insights(task_id, "prompt without placeholder", "llama3:latest")
            .await;
        assert!(matches!(result, Err(TaskError::InvalidPrompt(_))));

        let result = orch.generate_insights(task_id, "Prompt: {{text}}", "  ").await;
        assert!(matches!(result, Err(TaskError::NoModelSelected)));

        // Validation leaves the task untouched
        let task = orch.store().get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::TranscriptionCompleted);
        assert_eq!(task.current_prompt, DEFAULT_INSIGHTS_PROMPT);
    }

    #[tokio::test]
    async fn test_insight_generation_success() {
        let orch = orchestrator(
            MockSpeech::ok(),
            MockDiarizer::ok(),
            MockInsights::ok("Key points: greetings were exchanged."),
        );
        let task_id = run_to_completion(&orch, false).await;

        let task = orch
            .generate_insights(task_id, "Summarize: {{text}}", "llama3:latest")
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::CompletedWithInsights);
        assert_eq!(
            task.insights_text.as_deref(),
            Some("Key points: greetings were exchanged.")
        );
        assert_eq!(task.current_prompt, "Summarize: {{text}}");
        assert_eq!(task.selected_model.as_deref(), Some("llama3:latest"));
    }

    #[tokio::test]
    async fn test_insight_failure_is_retryable() {
        let store = Arc::new(TaskStore::new(DEFAULT_INSIGHTS_PROMPT));
        let failing = JobOrchestrator::new(
            store.clone(),
            Arc::new(MockSpeech::ok()),
            Arc::new(MockDiarizer::ok()),
            Arc::new(MockInsights::unreachable()),
            OrchestratorConfig::default(),
        );
        let task_id = run_to_completion(&failing, false).await;

        let result = failing
            .generate_insights(task_id, "Summarize: {{text}}", "llama3:latest")
            .await;
        assert!(matches!(result, Err(TaskError::Insight(_))));

        let task = store.get(task_id).unwrap();
        assert_eq!(task.status, TaskStatus::ErrorInsights);
        assert!(task.insights_text.is_none());
        // Transcript untouched, so the request can be retried
        assert!(task.transcription_result.is_some());

        // Retry from error_insights with a working provider
        let retrying = JobOrchestrator::new(
            store.clone(),
            Arc::new(MockSpeech::ok()),
            Arc::new(MockDiarizer::ok()),
            Arc::new(MockInsights::ok("second attempt")),
            OrchestratorConfig::default(),
        );
        let task = retrying
            .generate_insights(task_id, "Summarize: {{text}}", "llama3:latest")
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::CompletedWithInsights);
        assert_eq!(task.insights_text.as_deref(), Some("second attempt"));
    }

    #[tokio::test]
    async fn test_insight_regeneration_overwrites_prior_insights() {
        let orch = orchestrator(MockSpeech::ok(), MockDiarizer::ok(), MockInsights::ok("v2"));
        let task_id = run_to_completion(&orch, false).await;

        orch.store().update(task_id, |task| {
            task.status = TaskStatus::CompletedWithInsights;
            task.insights_text = Some("v1".to_string());
        });

        let task = orch
            .generate_insights(task_id, "Again: {{text}}", "llama3:latest")
            .await
            .unwrap();
        assert_eq!(task.insights_text.as_deref(), Some("v2"));
    }
}
