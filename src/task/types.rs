//! Wire types shared with the task backend.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// VoiceFlag
// ---------------------------------------------------------------------------

/// Audio-quality flag attached to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceFlag {
    /// No issue with the clip.
    #[default]
    None,
    /// The audio is distorted.
    Distorted,
    /// Background music.
    Music,
    /// More than one speaker.
    #[serde(rename = "MULTISPEAKER")]
    MultiSpeaker,
}

impl VoiceFlag {
    /// Flags offered in the "report issue" dialog.
    pub const REPORTABLE: [VoiceFlag; 3] =
        [VoiceFlag::Distorted, VoiceFlag::Music, VoiceFlag::MultiSpeaker];

    pub fn label(self) -> &'static str {
        match self {
            VoiceFlag::None => "No issue",
            VoiceFlag::Distorted => "Distorted audio",
            VoiceFlag::Music => "Background music",
            VoiceFlag::MultiSpeaker => "Multiple speakers",
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceTask
// ---------------------------------------------------------------------------

/// A clip plus its candidate transliteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceTask {
    pub id: u64,
    /// Storage path (or absolute URL) of the audio file.
    pub voice_name: String,
    /// Candidate text, possibly already carrying diacritics.
    pub word: String,
    /// Text before the submission under review, in review mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_review_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<VoiceFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Playable URL, filled in by the client after fetching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_url: Option<String>,
}

impl VoiceTask {
    /// Text the editing session is built from.
    pub fn source_text(&self) -> &str {
        &self.word
    }

    /// `true` when the task re-verifies an earlier submission.
    pub fn review_mode(&self) -> bool {
        self.is_review_mode.unwrap_or(false)
    }

    /// Best URL for playback: the resolved one, else the raw storage name.
    pub fn audio_url(&self) -> &str {
        self.voice_url.as_deref().unwrap_or(&self.voice_name)
    }
}

// ---------------------------------------------------------------------------
// TaskResponse
// ---------------------------------------------------------------------------

/// Outcome of a "next task" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    LimitReached,
    NoTasks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<VoiceTask>,
}

impl TaskResponse {
    pub fn no_tasks() -> Self {
        Self {
            status: TaskStatus::NoTasks,
            message: None,
            task: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Body of a submission: the recomposed text and the quality flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: u64,
    pub task_id: u64,
    /// Recomposed editor text.
    pub word_after_edit: String,
    pub flag: VoiceFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wire_names() {
        assert_eq!(serde_json::to_string(&VoiceFlag::None).unwrap(), "\"NONE\"");
        assert_eq!(
            serde_json::to_string(&VoiceFlag::Distorted).unwrap(),
            "\"DISTORTED\""
        );
        assert_eq!(serde_json::to_string(&VoiceFlag::Music).unwrap(), "\"MUSIC\"");
        assert_eq!(
            serde_json::to_string(&VoiceFlag::MultiSpeaker).unwrap(),
            "\"MULTISPEAKER\""
        );
    }

    #[test]
    fn parses_success_response_with_extra_fields() {
        let body = r#"{
            "status": "success",
            "task": {
                "id": 12,
                "voice_name": "voices/12.wav",
                "word": "سلام",
                "is_review_mode": true,
                "edits": []
            }
        }"#;
        let resp: TaskResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.status, TaskStatus::Success);
        let task = resp.task.unwrap();
        assert_eq!(task.id, 12);
        assert!(task.review_mode());
        assert_eq!(task.source_text(), "سلام");
        assert_eq!(task.audio_url(), "voices/12.wav");
    }

    #[test]
    fn parses_limit_reached() {
        let resp: TaskResponse =
            serde_json::from_str(r#"{"status":"limit_reached","message":"done for today"}"#)
                .unwrap();
        assert_eq!(resp.status, TaskStatus::LimitReached);
        assert!(resp.task.is_none());
        assert_eq!(resp.message.as_deref(), Some("done for today"));
    }

    #[test]
    fn review_mode_defaults_to_false() {
        let task: VoiceTask =
            serde_json::from_str(r#"{"id":1,"voice_name":"a.wav","word":"x"}"#).unwrap();
        assert!(!task.review_mode());
    }

    #[test]
    fn submission_body_shape() {
        let sub = Submission {
            user_id: 3,
            task_id: 9,
            word_after_edit: "سَلام".into(),
            flag: VoiceFlag::Music,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["user_id"], 3);
        assert_eq!(json["task_id"], 9);
        assert_eq!(json["word_after_edit"], "سَلام");
        assert_eq!(json["flag"], "MUSIC");
    }
}
