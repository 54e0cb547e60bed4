use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::export::{ExportError, ExportOptions, MarkupDocument};

/// Finished, downloadable document. Holds no reference to its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let media_type = media_type_for(&filename);
        Self {
            filename,
            media_type,
            bytes,
        }
    }

    /// Write the artifact into `dir` under its own filename
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

fn media_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("html") | Some("htm") => "text/html",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// External layout and rasterisation back end.
///
/// Receives well-formed markup plus page configuration and produces the
/// artifact, or reports a failure. Not cancellable once started.
#[async_trait(?Send)]
pub trait Paginator {
    async fn paginate(
        &self,
        markup: &MarkupDocument,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError>;
}

/// Validate options, run the back end and check what it returned.
///
/// No partial artifact escapes: an empty result counts as a failure.
pub async fn paginate(
    paginator: &dyn Paginator,
    markup: &MarkupDocument,
    options: &ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    options.validate()?;

    let artifact = paginator
        .paginate(markup, options)
        .await
        .inspect_err(|e| log::warn!("Export of {} failed: {e}", options.filename))?;

    if artifact.bytes.is_empty() {
        log::warn!("Renderer returned an empty {}", artifact.filename);
        return Err(ExportError::RenderFailure(
            "renderer produced an empty document".to_string(),
        ));
    }

    log::info!(
        "Exported {} ({} bytes, {})",
        artifact.filename,
        artifact.bytes.len(),
        artifact.media_type
    );
    Ok(artifact)
}

/// Program invocation for [`CommandPaginator`].
///
/// Arguments may contain `{input}`, `{output}`, `{options}`, `{margin}`,
/// `{format}` and `{orientation}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for RendererCommand {
    fn default() -> Self {
        Self {
            program: "wkhtmltopdf".to_string(),
            args: [
                "--quiet",
                "--page-size",
                "{format}",
                "--orientation",
                "{orientation}",
                "--margin-top",
                "{margin}",
                "--margin-bottom",
                "{margin}",
                "--margin-left",
                "{margin}",
                "--margin-right",
                "{margin}",
                "{input}",
                "{output}",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Paginates by running an external program over a temporary copy of the
/// markup.
///
/// The program runs to completion on the calling thread; the future does not
/// yield while it runs. Hosts drive it with a blocking executor.
#[derive(Debug, Clone, Default)]
pub struct CommandPaginator {
    command: RendererCommand,
}

impl CommandPaginator {
    pub fn new(command: RendererCommand) -> Self {
        Self { command }
    }

    fn expand_args(&self, input: &Path, output: &Path, options_file: &Path, options: &ExportOptions) -> Vec<String> {
        let vars = [
            ("{input}", input.display().to_string()),
            ("{output}", output.display().to_string()),
            ("{options}", options_file.display().to_string()),
            (
                "{margin}",
                format!("{}{}", options.margin, options.page_unit.name()),
            ),
            ("{format}", options.page_format.name().to_string()),
            ("{orientation}", options.orientation.name().to_string()),
        ];

        self.command
            .args
            .iter()
            .map(|arg| {
                vars.iter()
                    .fold(arg.clone(), |acc, (name, value)| acc.replace(name, value))
            })
            .collect()
    }
}

fn render_failure(context: &str, e: impl std::fmt::Display) -> ExportError {
    ExportError::RenderFailure(format!("{context}: {e}"))
}

#[async_trait(?Send)]
impl Paginator for CommandPaginator {
    async fn paginate(
        &self,
        markup: &MarkupDocument,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let workdir =
            tempfile::tempdir().map_err(|e| render_failure("cannot create work directory", e))?;
        let input = workdir.path().join("document.html");
        let options_file = workdir.path().join("options.json");
        let output = workdir.path().join(&options.filename);

        std::fs::write(&input, markup.as_str())
            .map_err(|e| render_failure("cannot write markup", e))?;
        let options_json = serde_json::to_vec_pretty(&options.to_renderer_json())
            .map_err(|e| render_failure("cannot encode options", e))?;
        std::fs::write(&options_file, options_json)
            .map_err(|e| render_failure("cannot write options", e))?;

        let args = self.expand_args(&input, &output, &options_file, options);
        log::debug!("Running {} {}", self.command.program, args.join(" "));

        let result = Command::new(&self.command.program)
            .args(&args)
            .output()
            .map_err(|e| render_failure(&format!("cannot run {}", self.command.program), e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ExportError::RenderFailure(format!(
                "{} exited with {}: {}",
                self.command.program,
                result.status,
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&output).map_err(|e| {
            render_failure(&format!("no output at {}", output.display()), e)
        })?;
        Ok(ExportArtifact::new(options.filename.clone(), bytes))
    }
}
