//! Filesystem-backed items

use std::io;
use std::path::{Path, PathBuf};

use contracts::{ConfigurableItem, Item};
use tracing::debug;

/// Configuration file that marks a directory as a job
pub const CONFIG_FILE: &str = "config.xml";

/// Job directory with a `config.xml`
#[derive(Debug, Clone)]
pub struct FsJob {
    name: String,
    url: String,
    config_path: PathBuf,
}

impl FsJob {
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Item for FsJob {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableItem> {
        Some(self)
    }
}

impl ConfigurableItem for FsJob {
    fn config_as_string(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.config_path)
    }
}

/// Plain container directory
#[derive(Debug, Clone)]
pub struct FsFolder {
    name: String,
    url: String,
}

impl Item for FsFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Item opened from a directory
#[derive(Debug, Clone)]
pub enum FsItem {
    Job(FsJob),
    Folder(FsFolder),
}

impl FsItem {
    /// Open the directory at `path`
    ///
    /// # Errors
    /// `InvalidInput` when `path` is not a directory or has no usable name.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if !std::fs::metadata(path)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no item name", path.display()),
                )
            })?
            .to_string();
        let url = format!("job/{name}/");

        let config_path = path.join(CONFIG_FILE);
        let item = if config_path.is_file() {
            Self::Job(FsJob {
                name,
                url,
                config_path,
            })
        } else {
            Self::Folder(FsFolder { name, url })
        };

        debug!(path = %path.display(), kind = item.kind(), "Opened item");
        Ok(item)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Job(_) => "job",
            Self::Folder(_) => "folder",
        }
    }
}

impl Item for FsItem {
    fn name(&self) -> &str {
        match self {
            Self::Job(job) => job.name(),
            Self::Folder(folder) => folder.name(),
        }
    }

    fn url(&self) -> &str {
        match self {
            Self::Job(job) => job.url(),
            Self::Folder(folder) => folder.url(),
        }
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableItem> {
        match self {
            Self::Job(job) => Some(job),
            Self::Folder(_) => None,
        }
    }
}
