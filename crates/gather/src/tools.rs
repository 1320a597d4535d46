use crate::archive::ArchiveKind;
use crate::{GatherError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured outcome of one collaborator invocation.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// External programs the sweep shells out to.
///
/// The support and inspection binaries are configuration, not literals, so
/// deployments with nonstandard install paths can override them. Archive
/// extractors (`tar`, `unzip`, `unrar`) resolve through `PATH`.
pub struct ExternalTools {
    support_tool: PathBuf,
    inspect_tool: PathBuf,
}

impl ExternalTools {
    pub fn new(support_tool: impl Into<PathBuf>, inspect_tool: impl Into<PathBuf>) -> Self {
        Self {
            support_tool: support_tool.into(),
            inspect_tool: inspect_tool.into(),
        }
    }

    /// Download the case attachment into the cluster working directory.
    pub fn fetch_attachment(
        &self,
        case_number: &str,
        attachment_uuid: &str,
        dest: &Path,
    ) -> Result<ToolOutcome> {
        let mut cmd = Command::new(&self.support_tool);
        cmd.arg("getattachment")
            .arg("-c")
            .arg(case_number)
            .arg("-u")
            .arg(attachment_uuid)
            .arg("-d")
            .arg(dest);
        capture(&self.support_tool.display().to_string(), &mut cmd)
    }

    /// Unpack `archive` into `dest` with the extractor its suffix selects.
    pub fn extract_archive(
        &self,
        kind: ArchiveKind,
        archive: &Path,
        dest: &Path,
    ) -> Result<ToolOutcome> {
        let mut cmd = Command::new(kind.program());
        match kind {
            ArchiveKind::Tar => cmd.arg("-xf").arg(archive).arg("-C").arg(dest),
            ArchiveKind::GzippedTar => cmd.arg("-xzf").arg(archive).arg("-C").arg(dest),
            ArchiveKind::Zip => cmd.arg("-q").arg(archive).arg("-d").arg(dest),
            ArchiveKind::Rar => cmd.arg("x").arg(archive).arg(dest),
        };
        capture(kind.program(), &mut cmd)
    }

    /// Point the inspection tool's context at the extracted image folder.
    pub fn use_cluster(&self, image_folder: &Path) -> Result<ToolOutcome> {
        let mut cmd = Command::new(&self.inspect_tool);
        cmd.arg("use").arg(image_folder);
        capture(&self.inspect_tool.display().to_string(), &mut cmd)
    }

    /// Request the installed-operator listing for the active context.
    pub fn installed_operators(&self) -> Result<ToolOutcome> {
        let mut cmd = Command::new(&self.inspect_tool);
        cmd.arg("get").arg("operators");
        capture(&self.inspect_tool.display().to_string(), &mut cmd)
    }
}

fn capture(tool: &str, command: &mut Command) -> Result<ToolOutcome> {
    let output = command.output().map_err(|source| GatherError::ExternalTool {
        tool: tool.to_string(),
        source,
    })?;
    Ok(ToolOutcome {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Parse the inspection tool's operator listing: two header lines, then one
/// operator per line with the name in the first whitespace-delimited column.
#[must_use]
pub fn parse_operator_listing(output: &str) -> Vec<String> {
    output
        .trim()
        .lines()
        .skip(2)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
