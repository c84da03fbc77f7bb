// config.rs
//
// Defaults and upload constraints for the transcription pipeline.

/// File extensions accepted for upload (case-insensitive)
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "flac", "mp4", "avi", "kwf"];

/// Maximum accepted upload size in bytes (500 MB)
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Default prompt template for insight generation. The `{{text}}`
/// placeholder is replaced verbatim with the selected transcript text.
pub const DEFAULT_INSIGHTS_PROMPT: &str = "Analyze the following transcript and provide a summary \
of the main points, identify the key topics discussed and any actions or decisions mentioned. \
Consider the overall tone of the conversation and any sentiments expressed. The text is: {{text}}";

/// Check whether a filename carries an accepted media extension
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Tunables for the job orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Prompt installed on newly created tasks and used when the caller
    /// does not supply one
    pub default_insights_prompt: String,
    /// Speaker-count bounds passed to the diarization engine
    pub min_speakers: u32,
    pub max_speakers: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_insights_prompt: DEFAULT_INSIGHTS_PROMPT.to_string(),
            min_speakers: 1,
            max_speakers: 10,
        }
    }
}
