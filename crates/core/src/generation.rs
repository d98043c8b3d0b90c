//! Generation kinds, form validation and the validated request type.
//!
//! A [`GenerationForm`] is what the user filled in; it becomes an
//! immutable [`GenerationRequest`] only after [`GenerationForm::validate`]
//! succeeds. Nothing in here touches the network, so every validation
//! failure is guaranteed to happen before a request is sent.

use serde::Serialize;

use crate::artifact::ArtifactHandle;
use crate::aspect::AspectMode;
use crate::error::CoreError;
use crate::history::HistoryFilter;
use crate::types::Timestamp;

/// Caption the service stores on every figurine history row.
pub const FIGURINE_CAPTION: &str = "立体雕塑作品";

/// Top-level MIME type an upload must carry to be accepted.
const IMAGE_MIME_TYPE: &str = "image";

// ---------------------------------------------------------------------------
// Generation kinds
// ---------------------------------------------------------------------------

/// The two generator pages offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    /// Riddle answer in, meme image out.
    Meme,
    /// Photo in, figurine-style artwork out.
    Figurine,
}

impl GenerationKind {
    /// Path of the generation endpoint, relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            GenerationKind::Meme => "/api/generate_meme",
            GenerationKind::Figurine => "/api/generate_figurine",
        }
    }

    /// Prefix of the file name offered when downloading a result.
    pub fn download_prefix(self) -> &'static str {
        match self {
            GenerationKind::Meme => "meme",
            GenerationKind::Figurine => "figurine",
        }
    }

    /// History subset shown on this kind's page.
    ///
    /// The history endpoint has no type column, so the figurine page
    /// keeps only rows carrying [`FIGURINE_CAPTION`].
    pub fn history_filter(self) -> HistoryFilter {
        match self {
            GenerationKind::Meme => HistoryFilter::All,
            GenerationKind::Figurine => HistoryFilter::Caption(FIGURINE_CAPTION.to_string()),
        }
    }

    /// Message shown in place of the history grid when it is empty.
    pub fn empty_history_message(self) -> &'static str {
        match self {
            GenerationKind::Meme => "No memes yet. Generate your first one!",
            GenerationKind::Figurine => "No figurines yet. Create your first digital figurine!",
        }
    }

    /// Status line shown while a request is pending.
    pub fn pending_message(self) -> &'static str {
        match self {
            GenerationKind::Meme => {
                "The AI is working on your meme. You may leave and check your history later."
            }
            GenerationKind::Figurine => {
                "The AI is sculpting your figurine. You may leave and check your history later."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// A photo attached to a figurine request.
///
/// Construction fails for anything that is not an image, so a rejected
/// file leaves no partial state behind.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accept an upload with a caller-declared MIME type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let content_type: String = content_type.into();
        let content_type = validate_image_content_type(&content_type)?;
        if bytes.is_empty() {
            return Err(CoreError::Validation("Uploaded image is empty".into()));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Accept an upload whose MIME type is sniffed from its leading bytes.
    pub fn sniff(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        let format = image::guess_format(&bytes).map_err(|_| {
            CoreError::Validation("Please choose a valid image file".into())
        })?;
        Self::new(file_name, format.to_mime_type(), bytes)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Form -> request
// ---------------------------------------------------------------------------

/// Raw user input, exactly as collected by a generator page.
#[derive(Debug, Clone)]
pub enum GenerationForm {
    Riddle { answer: String, aspect: AspectMode },
    Figurine { upload: Option<ImageUpload> },
}

impl GenerationForm {
    pub fn riddle(answer: impl Into<String>, aspect: AspectMode) -> Self {
        GenerationForm::Riddle {
            answer: answer.into(),
            aspect,
        }
    }

    pub fn figurine(upload: Option<ImageUpload>) -> Self {
        GenerationForm::Figurine { upload }
    }

    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationForm::Riddle { .. } => GenerationKind::Meme,
            GenerationForm::Figurine { .. } => GenerationKind::Figurine,
        }
    }

    /// Turn the form into a request, or explain to the user what is missing.
    pub fn validate(self) -> Result<GenerationRequest, CoreError> {
        match self {
            GenerationForm::Riddle { answer, aspect } => Ok(GenerationRequest::Riddle {
                answer: validate_answer(&answer)?,
                aspect,
            }),
            GenerationForm::Figurine { upload } => {
                let upload = upload.ok_or_else(|| {
                    CoreError::Validation("Please upload an image first".into())
                })?;
                Ok(GenerationRequest::Figurine { upload })
            }
        }
    }
}

/// A validated, immutable generation request.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Riddle { answer: String, aspect: AspectMode },
    Figurine { upload: ImageUpload },
}

impl GenerationRequest {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::Riddle { .. } => GenerationKind::Meme,
            GenerationRequest::Figurine { .. } => GenerationKind::Figurine,
        }
    }
}

/// JSON body of the meme endpoint.
#[derive(Debug, Serialize)]
pub struct RiddlePayload<'a> {
    pub answer: &'a str,
    #[serde(rename = "selectedSize")]
    pub selected_size: AspectMode,
}

/// What the controller publishes after a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub handle: ArtifactHandle,
    pub kind: GenerationKind,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Trim a riddle answer and reject it if nothing is left.
pub fn validate_answer(answer: &str) -> Result<String, CoreError> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Please enter a valid riddle answer".into()));
    }
    Ok(trimmed.to_string())
}

/// Parse an upload's MIME type and return its normalised essence.
///
/// Only `image/<subtype>` is accepted. Parameters are dropped and the
/// result is lowercase, so it is always usable as a multipart part type.
pub fn validate_image_content_type(content_type: &str) -> Result<String, CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "Please choose a valid image file (got '{content_type}')"
        ))
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let (top, sub) = essence.split_once('/').ok_or_else(invalid)?;
    if !top.eq_ignore_ascii_case(IMAGE_MIME_TYPE)
        || sub.is_empty()
        || !sub.bytes().all(is_mime_token_byte)
    {
        return Err(invalid());
    }
    Ok(format!("{IMAGE_MIME_TYPE}/{}", sub.to_ascii_lowercase()))
}

/// RFC 6838 restricted-name characters.
fn is_mime_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b)
}
