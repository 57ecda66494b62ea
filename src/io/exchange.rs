use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;

/// Write access to a previously linked file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    /// Access lapsed; asking again may restore it
    Prompt,
    Denied,
}

/// A file the user chose in a save dialog, kept for silent re-saves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedFile {
    pub name: String,
    pub path: PathBuf,
}

impl LinkedFile {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        LinkedFile {
            name,
            path: path.to_path_buf(),
        }
    }
}

/// Contents of a file the user chose in an open dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub name: String,
    pub contents: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("no permission to write {0}")]
    PermissionDenied(String),
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Save/open dialogs and linked-file writes.
///
/// Dialog methods return `Ok(None)` when the user dismisses the dialog.
pub trait FileExchange {
    fn save_as(
        &mut self,
        suggested_name: &str,
        contents: &str,
    ) -> Result<Option<LinkedFile>, ExchangeError>;

    fn open(&mut self) -> Result<Option<OpenedFile>, ExchangeError>;

    fn query_permission(&self, file: &LinkedFile) -> Permission;

    /// Ask the user to grant access again
    fn request_permission(&mut self, file: &LinkedFile) -> Permission;

    fn write_linked(&mut self, file: &LinkedFile, contents: &str) -> Result<(), ExchangeError>;
}

// ---------------------------------------------------------------------------
// Filesystem exchange
// ---------------------------------------------------------------------------

/// The dialog half of a file exchange: which path, or `None` if dismissed
pub trait FilePicker {
    fn pick_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;
    fn pick_open_path(&mut self) -> Option<PathBuf>;
}

/// Picker answering dialogs from queued replies, for headless hosts
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    saves: VecDeque<Option<PathBuf>>,
    opens: VecDeque<Option<PathBuf>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_save(&mut self, reply: Option<PathBuf>) {
        self.saves.push_back(reply);
    }

    pub fn queue_open(&mut self, reply: Option<PathBuf>) {
        self.opens.push_back(reply);
    }
}

impl FilePicker for ScriptedPicker {
    fn pick_save_path(&mut self, _suggested_name: &str) -> Option<PathBuf> {
        self.saves.pop_front().flatten()
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.opens.pop_front().flatten()
    }
}

/// Exchange backed by the local filesystem.
///
/// A linked file is writable unless it or its directory is gone, or the
/// file is read-only.
#[derive(Debug)]
pub struct FsExchange<P: FilePicker> {
    picker: P,
}

impl<P: FilePicker> FsExchange<P> {
    pub fn new(picker: P) -> Self {
        FsExchange { picker }
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }
}

impl<P: FilePicker> FileExchange for FsExchange<P> {
    fn save_as(
        &mut self,
        suggested_name: &str,
        contents: &str,
    ) -> Result<Option<LinkedFile>, ExchangeError> {
        let Some(path) = self.picker.pick_save_path(suggested_name) else {
            return Ok(None);
        };
        atomic_write(&path, contents.as_bytes()).map_err(|e| ExchangeError::Write {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "saved file");
        Ok(Some(LinkedFile::new(&path)))
    }

    fn open(&mut self) -> Result<Option<OpenedFile>, ExchangeError> {
        let Some(path) = self.picker.pick_open_path() else {
            return Ok(None);
        };
        let contents = fs::read_to_string(&path).map_err(|e| ExchangeError::Read {
            path: path.clone(),
            source: e,
        })?;
        Ok(Some(OpenedFile {
            name: LinkedFile::new(&path).name,
            contents,
        }))
    }

    fn query_permission(&self, file: &LinkedFile) -> Permission {
        match fs::metadata(&file.path) {
            Ok(meta) if meta.permissions().readonly() => Permission::Denied,
            Ok(_) => Permission::Granted,
            Err(_) => {
                let dir_exists = file.path.parent().is_some_and(|d| d.is_dir());
                if dir_exists {
                    Permission::Granted
                } else {
                    Permission::Denied
                }
            }
        }
    }

    fn request_permission(&mut self, file: &LinkedFile) -> Permission {
        self.query_permission(file)
    }

    fn write_linked(&mut self, file: &LinkedFile, contents: &str) -> Result<(), ExchangeError> {
        if self.query_permission(file) != Permission::Granted {
            return Err(ExchangeError::PermissionDenied(file.name.clone()));
        }
        atomic_write(&file.path, contents.as_bytes()).map_err(|e| ExchangeError::Write {
            path: file.path.clone(),
            source: e,
        })
    }
}
