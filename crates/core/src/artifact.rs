//! Owned in-memory artifacts produced by successful generations.
//!
//! The registry holds at most one live artifact. Publishing a new one
//! releases the previous buffer; downloads hand out copies so that a
//! release never reaches into bytes the user already saved.

use chrono::Utc;

use crate::generation::GenerationKind;
use crate::types::Timestamp;

/// Opaque reference to a live artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactHandle(uuid::Uuid);

impl ArtifactHandle {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "artifact:{}", self.0)
    }
}

/// A generated image held in memory.
#[derive(Clone)]
pub struct Artifact {
    handle: ArtifactHandle,
    kind: GenerationKind,
    content_type: String,
    bytes: Vec<u8>,
    created_at: Timestamp,
}

impl Artifact {
    pub fn new(kind: GenerationKind, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            handle: ArtifactHandle::new(),
            kind,
            content_type: content_type.into(),
            bytes,
            created_at: Utc::now(),
        }
    }

    pub fn handle(&self) -> ArtifactHandle {
        self.handle
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// File name offered for download, e.g. `meme_1718000000000.png`.
    pub fn download_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.kind.download_prefix(),
            self.created_at.timestamp_millis(),
            extension_for(&self.content_type)
        )
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Map an image MIME type to a file extension. Defaults to `png`, which
/// is what the service returns today.
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// A detached copy of an artifact, safe to keep after the artifact is
/// released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSnapshot {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Owner of the currently displayed artifact.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    current: Option<Artifact>,
    released: usize,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `artifact` the current one, releasing its predecessor.
    ///
    /// Returns the handle of the released artifact, if any.
    pub fn publish(&mut self, artifact: Artifact) -> Option<ArtifactHandle> {
        let previous = self.current.replace(artifact).map(|old| old.handle);
        if previous.is_some() {
            self.released += 1;
        }
        previous
    }

    pub fn current(&self) -> Option<&Artifact> {
        self.current.as_ref()
    }

    /// Look up a live artifact. Released handles resolve to `None`.
    pub fn get(&self, handle: ArtifactHandle) -> Option<&Artifact> {
        self.current.as_ref().filter(|a| a.handle == handle)
    }

    /// Copy a live artifact out for download.
    pub fn snapshot(&self, handle: ArtifactHandle) -> Option<DownloadSnapshot> {
        self.get(handle).map(|a| DownloadSnapshot {
            file_name: a.download_name(),
            content_type: a.content_type.clone(),
            bytes: a.bytes.clone(),
        })
    }

    /// Release everything; used on page teardown. Returns how many
    /// artifacts were released.
    pub fn release_all(&mut self) -> usize {
        match self.current.take() {
            Some(_) => {
                self.released += 1;
                1
            }
            None => 0,
        }
    }

    pub fn live_count(&self) -> usize {
        usize::from(self.current.is_some())
    }

    /// Total number of artifacts released over the registry's lifetime.
    pub fn released_count(&self) -> usize {
        self.released
    }
}
