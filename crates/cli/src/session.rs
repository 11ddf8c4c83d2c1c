//! Interactive editing session: reads commands line by line and drives an
//! [`EditOrchestrator`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use retouch_core::codec::ImageCodec;
use retouch_core::error::EditError;
use retouch_core::gateway::TransformGateway;
use retouch_core::orchestrator::EditOrchestrator;
use retouch_core::types::{ImageResource, TransformRequest};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::{parse_command, Command, HELP};
use crate::config::SessionConfig;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{}: {}", .0.kind(), .0.detail())]
    Edit(#[from] EditError),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("the image is too small for that aspect ratio")]
    AspectTooSmall,
}

pub struct Session<G> {
    orchestrator: Arc<EditOrchestrator<G>>,
    config: SessionConfig,
    /// Path of the most recently loaded file; the default save location is
    /// derived from it.
    source_path: Option<PathBuf>,
}

impl<G: TransformGateway> Session<G> {
    pub fn new(orchestrator: Arc<EditOrchestrator<G>>, config: SessionConfig) -> Self {
        Self {
            orchestrator,
            config,
            source_path: None,
        }
    }

    pub fn orchestrator(&self) -> &Arc<EditOrchestrator<G>> {
        &self.orchestrator
    }

    /// Read an image file and start a new history from it.
    pub async fn load_file(&mut self, path: &Path) -> Result<ImageResource, SessionError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let resource = ImageCodec::load_sniffed(bytes)?;
        self.orchestrator.load(resource.clone())?;
        self.source_path = Some(path.to_path_buf());
        Ok(resource)
    }

    /// Process commands from `input` until it ends or `quit` is read,
    /// writing one reply line per command to `out`.
    pub async fn run<R, W>(&mut self, input: R, mut out: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    write_line(&mut out, &format!("error: {e}")).await?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }

            let reply = match self.execute(command).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::debug!(error = %e, "Command failed");
                    format!("error: {e}")
                }
            };
            write_line(&mut out, &reply).await?;
        }
        out.flush().await
    }

    /// Execute one command and describe the result.
    pub async fn execute(&mut self, command: Command) -> Result<String, SessionError> {
        match command {
            Command::Retouch(hotspot) => self.edit(TransformRequest::Retouch { hotspot }).await,
            Command::Filter(style) => self.edit(TransformRequest::Filter { style }).await,
            Command::Adjust(adjustment) => {
                self.edit(TransformRequest::Adjustment { adjustment }).await
            }
            Command::Crop(rect) => self.edit(TransformRequest::Crop { rect }).await,
            Command::CropAspect(aspect) => {
                let current = self.orchestrator.current()?;
                let rect = aspect
                    .largest_centered(current.width(), current.height())
                    .ok_or(SessionError::AspectTooSmall)?;
                self.edit(TransformRequest::Crop { rect }).await
            }
            Command::Undo => {
                let current = self.orchestrator.request_undo()?;
                Ok(format!("undo: {}", self.describe(&current)))
            }
            Command::Redo => {
                let current = self.orchestrator.request_redo()?;
                Ok(format!("redo: {}", self.describe(&current)))
            }
            Command::Status => {
                let current = self.orchestrator.current()?;
                Ok(self.describe(&current))
            }
            Command::Original => {
                let original = self.orchestrator.original()?;
                Ok(format!(
                    "original: {}x{} {}, {} bytes",
                    original.width(),
                    original.height(),
                    original.content_type(),
                    original.bytes().len()
                ))
            }
            Command::Load(path) => {
                let resource = self.load_file(&path).await?;
                Ok(format!(
                    "loaded {}: {}x{} {}",
                    path.display(),
                    resource.width(),
                    resource.height(),
                    resource.content_type()
                ))
            }
            Command::Save(path) => {
                let written = self.save(path).await?;
                Ok(format!("saved {}", written.display()))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    async fn edit(&self, request: TransformRequest) -> Result<String, SessionError> {
        let operation = request.label();
        let result = self.orchestrator.submit(request).await?;
        Ok(format!("{operation}: {}", self.describe(&result)))
    }

    /// Write the current version to `path`, or to the configured or derived
    /// default. A path without an extension gets one matching the image's
    /// content type.
    pub async fn save(&self, path: Option<PathBuf>) -> Result<PathBuf, SessionError> {
        let current = self.orchestrator.current()?;
        let extension = current.content_type().extension();

        let mut path = match path.or_else(|| self.config.output.clone()) {
            Some(path) => path,
            None => self.default_output(),
        };
        match path.extension().and_then(|e| e.to_str()) {
            None => {
                path.set_extension(extension);
            }
            Some(given) if !given.eq_ignore_ascii_case(extension) => {
                tracing::warn!(
                    path = %path.display(),
                    content_type = %current.content_type(),
                    "File extension does not match image content type",
                );
            }
            Some(_) => {}
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SessionError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, current.bytes())
            .await
            .map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            bytes = current.bytes().len(),
            "Saved current version",
        );
        Ok(path)
    }

    // ---- private helpers ----

    /// `<dir>/<stem>-edited`, extension added by the caller.
    fn default_output(&self) -> PathBuf {
        let source = self
            .source_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("image"));
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        source.with_file_name(format!("{stem}-edited"))
    }

    fn describe(&self, resource: &ImageResource) -> String {
        let snapshot = self.orchestrator.snapshot();
        let mut line = format!(
            "{}x{} {} (version {} of {})",
            resource.width(),
            resource.height(),
            resource.content_type(),
            snapshot.cursor + 1,
            snapshot.versions
        );
        if snapshot.can_undo {
            line.push_str(" [undo]");
        }
        if snapshot.can_redo {
            line.push_str(" [redo]");
        }
        line
    }
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> std::io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await
}
