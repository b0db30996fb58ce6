use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default sentinel file name. Delete the file to force a full
/// regeneration at the next process start.
pub const DEFAULT_MARKER_FILE: &str = "data-generated.delete-me-to-regenerate";

/// Persisted completion flag external to the transactional store.
/// Its mere existence, not its content, is the signal.
pub trait CompletionMarker: Send + Sync {
    fn exists(&self) -> io::Result<bool>;

    fn create(&self) -> io::Result<()>;

    fn remove(&self) -> io::Result<()>;
}

/// Sentinel-file completion marker
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompletionMarker for FileMarker {
    fn exists(&self) -> io::Result<bool> {
        Ok(self.path.exists())
    }

    fn create(&self) -> io::Result<()> {
        fs::File::create(&self.path).map(|_| ())
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-memory completion marker for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryMarker {
    set: AtomicBool,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionMarker for MemoryMarker {
    fn exists(&self) -> io::Result<bool> {
        Ok(self.set.load(Ordering::Relaxed))
    }

    fn create(&self) -> io::Result<()> {
        self.set.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        self.set.store(false, Ordering::Relaxed);
        Ok(())
    }
}
