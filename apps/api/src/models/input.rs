use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Which intake path is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    #[default]
    File,
    Text,
}

/// A résumé file as the user selected it, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Bytes,
}

impl FileInput {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }
}

/// Pasted résumé text, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    pub content: String,
}

/// User-supplied résumé content. Rebuilt on every selection or edit.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateInput {
    File(FileInput),
    Text(TextInput),
}

impl CandidateInput {
    pub fn file(name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        CandidateInput::File(FileInput::new(name, mime_type, bytes))
    }

    pub fn text(content: impl Into<String>) -> Self {
        CandidateInput::Text(TextInput {
            content: content.into(),
        })
    }

    /// The upload mode this input belongs to.
    pub fn mode(&self) -> UploadMode {
        match self {
            CandidateInput::File(_) => UploadMode::File,
            CandidateInput::Text(_) => UploadMode::Text,
        }
    }

    pub fn summary(&self) -> CandidateSummary {
        match self {
            CandidateInput::File(file) => CandidateSummary::File {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
                size_bytes: file.size_bytes,
            },
            CandidateInput::Text(text) => CandidateSummary::Text {
                characters: text.content.chars().count(),
            },
        }
    }
}

/// Byte-free description of the held candidate, safe to hand to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSummary {
    File {
        name: String,
        mime_type: String,
        size_bytes: u64,
    },
    Text {
        characters: usize,
    },
}
