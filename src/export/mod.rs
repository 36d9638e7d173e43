mod encoder;

pub use encoder::{FrameEncoder, GifFrameEncoder, RenderedFrame, pixmap_to_rgba};

use futures::channel::oneshot;
use std::path::{Path, PathBuf};
use std::task::Poll;
use tiny_skia::Pixmap;

use crate::error::{ExportError, ExportResult};
use crate::event::Subject;
use crate::renderer::Renderer;
use crate::settings::CanvasSettings;
use crate::state::SharedState;
use crate::stroke::StrokeRef;

// Frames rendered between yields to the executor
const FRAME_BATCH: usize = 8;

/// The two kinds of animation the canvas can export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// One frame per committed stroke, cumulative
    DrawingProcess,
    /// The finished artwork turning through a full revolution
    RotatingResult,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::DrawingProcess => "drawing-process.gif",
            ExportKind::RotatingResult => "rotating-result.gif",
        }
    }
}

/// Parameters for one export invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportRequest {
    DrawingProcess { frame_delay_ms: u32 },
    RotatingResult { duration_ms: u32, frame_rate: u32 },
}

impl ExportRequest {
    pub fn kind(&self) -> ExportKind {
        match self {
            ExportRequest::DrawingProcess { .. } => ExportKind::DrawingProcess,
            ExportRequest::RotatingResult { .. } => ExportKind::RotatingResult,
        }
    }
}

/// History and settings captured when an export is invoked.
///
/// Edits made after the snapshot do not reach the export.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub strokes: Vec<StrokeRef>,
    pub settings: CanvasSettings,
}

impl ExportSnapshot {
    pub fn capture(state: &SharedState) -> Self {
        Self {
            strokes: state.history.with(|history| history.active_strokes().to_vec()),
            settings: state.settings.get(),
        }
    }

    fn canvas(&self) -> ExportResult<Pixmap> {
        let (width, height) = self.settings.pixel_size();
        Pixmap::new(width, height).ok_or(ExportError::CanvasUnavailable { width, height })
    }
}

/// A finished animation
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
}

impl ExportArtifact {
    /// Write the animation into `dir` under its default file name
    pub fn save_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.kind.file_name());
        std::fs::write(&path, &self.bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Observable export state for the UI to poll
#[derive(Debug, Clone, Default)]
pub struct ExportStatus {
    /// 0..=100
    pub progress: Subject<u8>,
    pub exporting: Subject<bool>,
}

// Holds the in-flight flag; releasing it on drop covers success, failure and panics
struct ExportGuard {
    exporting: Subject<bool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.exporting.set(false);
    }
}

/// A running background export
pub struct ExportJob {
    kind: ExportKind,
    receiver: Option<oneshot::Receiver<ExportResult<ExportArtifact>>>,
    immediate: Option<ExportResult<ExportArtifact>>,
}

impl ExportJob {
    fn failed(kind: ExportKind, error: ExportError) -> Self {
        Self {
            kind,
            receiver: None,
            immediate: Some(Err(error)),
        }
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Non-blocking check for the result; `None` while still running
    pub fn try_take(&mut self) -> Option<ExportResult<ExportArtifact>> {
        if let Some(result) = self.immediate.take() {
            return Some(result);
        }
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(result)) => {
                self.receiver = None;
                Some(result)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.receiver = None;
                Some(Err(ExportError::Cancelled))
            }
        }
    }
}

async fn yield_now() {
    let mut yielded = false;
    futures::future::poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

fn percent(done: usize, total: usize, span: f64) -> u8 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * span).round().clamp(0.0, 100.0) as u8
}

/// Renders export frames and feeds them to a frame encoder.
///
/// At most one export runs at a time; a second request while one is in flight
/// fails with [`ExportError::Busy`] without touching the first.
#[derive(Debug, Clone, Default)]
pub struct ExportService {
    status: ExportStatus,
}

impl ExportService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exporting(&self) -> bool {
        self.status.exporting.get()
    }

    pub fn progress(&self) -> u8 {
        self.status.progress.get()
    }

    fn begin(&self) -> ExportResult<ExportGuard> {
        let claimed = self.status.exporting.update(|exporting| {
            if *exporting {
                false
            } else {
                *exporting = true;
                true
            }
        });
        if !claimed {
            log::debug!("Export ignored: another export is in flight");
            return Err(ExportError::Busy);
        }
        self.status.progress.set(0);
        Ok(ExportGuard {
            exporting: self.status.exporting.clone(),
        })
    }

    /// Replay the history one stroke per frame, each frame `frame_delay_ms` long
    pub async fn export_drawing_process<E: FrameEncoder>(
        &self,
        snapshot: ExportSnapshot,
        frame_delay_ms: u32,
        encoder: E,
    ) -> ExportResult<ExportArtifact> {
        let guard = self.begin()?;
        self.run(guard, ExportRequest::DrawingProcess { frame_delay_ms }, snapshot, encoder)
            .await
    }

    /// Spin the finished artwork once around over `duration_ms` at `frame_rate` fps
    pub async fn export_rotating_result<E: FrameEncoder>(
        &self,
        snapshot: ExportSnapshot,
        duration_ms: u32,
        frame_rate: u32,
        encoder: E,
    ) -> ExportResult<ExportArtifact> {
        let guard = self.begin()?;
        self.run(
            guard,
            ExportRequest::RotatingResult { duration_ms, frame_rate },
            snapshot,
            encoder,
        )
        .await
    }

    /// Run a GIF export on a worker thread
    pub fn spawn(&self, request: ExportRequest, snapshot: ExportSnapshot) -> ExportJob {
        let kind = request.kind();
        let guard = match self.begin() {
            Ok(guard) => guard,
            Err(err) => return ExportJob::failed(kind, err),
        };

        let (sender, receiver) = oneshot::channel();
        let service = self.clone();
        let spawned = std::thread::Builder::new()
            .name("gif-export".to_owned())
            .spawn(move || {
                let result = GifFrameEncoder::new().and_then(|encoder| {
                    futures::executor::block_on(service.run(guard, request, snapshot, encoder))
                });
                // the receiver may be gone if the app is shutting down
                let _ = sender.send(result);
            });

        match spawned {
            Ok(_) => ExportJob {
                kind,
                receiver: Some(receiver),
                immediate: None,
            },
            Err(err) => {
                log::error!("Failed to start export worker: {}", err);
                ExportJob::failed(kind, ExportError::Io(err))
            }
        }
    }

    async fn run<E: FrameEncoder>(
        &self,
        _guard: ExportGuard,
        request: ExportRequest,
        snapshot: ExportSnapshot,
        encoder: E,
    ) -> ExportResult<ExportArtifact> {
        log::info!(
            "Starting {:?} export of {} strokes",
            request.kind(),
            snapshot.strokes.len()
        );
        let result = match request {
            ExportRequest::DrawingProcess { frame_delay_ms } => {
                self.drawing_process_frames(&snapshot, frame_delay_ms, encoder).await
            }
            ExportRequest::RotatingResult { duration_ms, frame_rate } => {
                self.rotating_result_frames(&snapshot, duration_ms, frame_rate, encoder)
                    .await
            }
        };

        match &result {
            Ok(artifact) => {
                self.status.progress.set(100);
                log::info!(
                    "{:?} export finished: {} frames, {} bytes",
                    artifact.kind,
                    artifact.frame_count,
                    artifact.bytes.len()
                );
            }
            Err(err) => log::error!("{:?} export failed: {}", request.kind(), err),
        }
        result
    }

    async fn drawing_process_frames<E: FrameEncoder>(
        &self,
        snapshot: &ExportSnapshot,
        frame_delay_ms: u32,
        mut encoder: E,
    ) -> ExportResult<ExportArtifact> {
        let mut canvas = snapshot.canvas()?;
        let total = snapshot.strokes.len();
        if total == 0 {
            return Err(ExportError::NothingToExport);
        }

        let mut renderer = Renderer::new();
        for index in 0..total {
            renderer.render_artwork(&mut canvas, &snapshot.settings, &snapshot.strokes[..=index]);
            encoder.encode_frame(&RenderedFrame {
                index,
                pixmap: &canvas,
                delay_ms: frame_delay_ms as f64,
                rotation: 0.0,
            })?;
            self.status.progress.set(percent(index + 1, total, 50.0));
            if (index + 1) % FRAME_BATCH == 0 {
                yield_now().await;
            }
        }

        Ok(ExportArtifact {
            kind: ExportKind::DrawingProcess,
            bytes: encoder.finish()?,
            frame_count: total,
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    async fn rotating_result_frames<E: FrameEncoder>(
        &self,
        snapshot: &ExportSnapshot,
        duration_ms: u32,
        frame_rate: u32,
        mut encoder: E,
    ) -> ExportResult<ExportArtifact> {
        if frame_rate == 0 {
            return Err(ExportError::InvalidParameters("frame rate must be positive".to_owned()));
        }
        let total = (duration_ms as f64 / 1000.0 * frame_rate as f64).round() as usize;
        if total == 0 {
            return Err(ExportError::InvalidParameters(format!(
                "{duration_ms} ms at {frame_rate} fps yields no frames"
            )));
        }

        let mut artwork = snapshot.canvas()?;
        let mut frame = snapshot.canvas()?;
        let mut renderer = Renderer::new();
        renderer.render_artwork(&mut artwork, &snapshot.settings, &snapshot.strokes);

        let step = 360.0 / total as f64;
        let delay_ms = 1000.0 / frame_rate as f64;
        for index in 0..total {
            let rotation = (index as f64 * step) as f32;
            renderer.render_rotated(&mut frame, &artwork, rotation);
            encoder.encode_frame(&RenderedFrame {
                index,
                pixmap: &frame,
                delay_ms,
                rotation,
            })?;
            self.status.progress.set(percent(index, total, 50.0));
            if (index + 1) % FRAME_BATCH == 0 {
                yield_now().await;
            }
        }

        Ok(ExportArtifact {
            kind: ExportKind::RotatingResult,
            bytes: encoder.finish()?,
            frame_count: total,
            width: frame.width(),
            height: frame.height(),
        })
    }
}
