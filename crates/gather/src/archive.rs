use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory prefix that marks the serialized cluster state inside an
/// extracted must-gather.
pub const IMAGE_FOLDER_PREFIX: &str = "quay-io";

/// Extraction strategy keyed by archive suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// `.tar`, `.tar.gz`, `.tar.bz`, `.tar.bz2`: `tar -xf` detects compression
    Tar,
    /// `.tgz`
    GzippedTar,
    /// `.zip`
    Zip,
    /// `.rar`
    Rar,
}

impl ArchiveKind {
    /// Recognize an archive by its file-name suffix. Unrecognized names are
    /// not archives as far as discovery is concerned.
    pub fn for_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".tar")
            || name.ends_with(".tar.gz")
            || name.ends_with(".tar.bz")
            || name.ends_with(".tar.bz2")
        {
            Some(Self::Tar)
        } else if name.ends_with(".tgz") {
            Some(Self::GzippedTar)
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".rar") {
            Some(Self::Rar)
        } else {
            None
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Self::Tar | Self::GzippedTar => "tar",
            Self::Zip => "unzip",
            Self::Rar => "unrar",
        }
    }
}

/// First archive file under `root`.
///
/// The walk is pinned to file-name sorted order so the pick is deterministic
/// when a directory holds several candidates.
pub fn find_archive(root: &Path) -> Option<(PathBuf, ArchiveKind)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find_map(|entry| {
            let kind = ArchiveKind::for_path(entry.path())?;
            Some((entry.into_path(), kind))
        })
}

/// First extracted subdirectory holding serialized cluster state, under the
/// same pinned walk order as [`find_archive`].
pub fn find_image_folder(root: &Path) -> Option<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with(IMAGE_FOLDER_PREFIX))
        })
        .map(|entry| entry.into_path())
}
