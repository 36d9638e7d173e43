use egui::{Color32, Pos2};
use futures::executor::block_on;
use spin_canvas::export::{FrameEncoder, RenderedFrame};
use spin_canvas::{
    Brush, CanvasSettings, DrawingPoint, ExportError, ExportKind, ExportResult, ExportService, ExportSnapshot, Stroke,
    StrokeRef,
};

/// What the recording encoder remembers about each frame
#[derive(Debug, Clone, PartialEq)]
struct FrameRecord {
    index: usize,
    rotation: f32,
    delay_ms: f64,
    size: (u32, u32),
    // Red channel sampled at each probe point
    probes: Vec<u8>,
}

struct RecordingEncoder {
    probes: Vec<(u32, u32)>,
    frames: Vec<FrameRecord>,
    sink: std::sync::Arc<parking_lot::Mutex<Vec<FrameRecord>>>,
}

impl RecordingEncoder {
    fn new(probes: Vec<(u32, u32)>) -> (Self, std::sync::Arc<parking_lot::Mutex<Vec<FrameRecord>>>) {
        let sink = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let encoder = Self {
            probes,
            frames: Vec::new(),
            sink: sink.clone(),
        };
        (encoder, sink)
    }
}

impl FrameEncoder for RecordingEncoder {
    fn encode_frame(&mut self, frame: &RenderedFrame<'_>) -> ExportResult<()> {
        let probes = self
            .probes
            .iter()
            .map(|&(x, y)| frame.pixmap.pixel(x, y).map(|p| p.demultiply().red()).unwrap_or(0))
            .collect();
        self.frames.push(FrameRecord {
            index: frame.index,
            rotation: frame.rotation,
            delay_ms: frame.delay_ms,
            size: (frame.pixmap.width(), frame.pixmap.height()),
            probes,
        });
        Ok(())
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        let count = self.frames.len();
        *self.sink.lock() = self.frames;
        Ok(vec![0; count])
    }
}

struct FailingEncoder;

impl FrameEncoder for FailingEncoder {
    fn encode_frame(&mut self, _frame: &RenderedFrame<'_>) -> ExportResult<()> {
        Err(ExportError::Io(std::io::Error::other("disk full")))
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

fn red_dot(x: f32, y: f32) -> StrokeRef {
    let brush = Brush {
        color: Color32::RED,
        size: 10.0,
        ..Brush::default()
    };
    Stroke::new_ref(brush, vec![DrawingPoint::new(Pos2::new(x, y), 1.0, 0.0)])
}

fn settings(radius: f32) -> CanvasSettings {
    CanvasSettings {
        radius,
        rotation_center: Pos2::new(radius, radius),
        background_color: Color32::BLACK,
        ..CanvasSettings::default()
    }
}

#[test]
fn test_drawing_process_emits_one_cumulative_frame_per_stroke() {
    let strokes = vec![red_dot(20.0, 20.0), red_dot(50.0, 50.0), red_dot(80.0, 20.0)];
    let snapshot = ExportSnapshot {
        strokes,
        settings: settings(50.0),
    };
    let (encoder, frames) = RecordingEncoder::new(vec![(20, 20), (50, 50), (80, 20)]);
    let service = ExportService::new();

    let artifact = block_on(service.export_drawing_process(snapshot, 150, encoder)).unwrap();

    assert_eq!(artifact.kind, ExportKind::DrawingProcess);
    assert_eq!(artifact.frame_count, 3);
    assert_eq!((artifact.width, artifact.height), (100, 100));

    let frames = frames.lock();
    assert_eq!(frames.len(), 3);
    for (k, frame) in frames.iter().enumerate() {
        assert_eq!(frame.index, k);
        assert_eq!(frame.delay_ms, 150.0);
        assert_eq!(frame.rotation, 0.0);
        for (stroke, &red) in frame.probes.iter().enumerate() {
            if stroke <= k {
                assert!(red > 200, "frame {k} should contain stroke {stroke}");
            } else {
                assert!(red < 50, "frame {k} should not contain stroke {stroke}");
            }
        }
    }
    assert_eq!(service.progress(), 100);
    assert!(!service.is_exporting());
}

#[test]
fn test_rotating_result_frame_angles() {
    let snapshot = ExportSnapshot {
        strokes: vec![red_dot(90.0, 50.0)],
        settings: settings(50.0),
    };
    let (encoder, frames) = RecordingEncoder::new(vec![]);
    let service = ExportService::new();

    let artifact = block_on(service.export_rotating_result(snapshot, 2000, 30, encoder)).unwrap();
    assert_eq!(artifact.frame_count, 60);

    let frames = frames.lock();
    assert_eq!(frames.len(), 60);
    for (i, frame) in frames.iter().enumerate() {
        assert!((frame.rotation - i as f32 * 6.0).abs() < 1e-3);
        assert!((frame.delay_ms - 1000.0 / 30.0).abs() < 1e-9);
        assert_eq!(frame.size, (100, 100));
    }
    assert!((frames[59].rotation - 354.0).abs() < 1e-3);
}

#[test]
fn test_rotating_result_turns_the_artwork() {
    let snapshot = ExportSnapshot {
        strokes: vec![red_dot(85.0, 50.0)],
        settings: settings(50.0),
    };
    // Four frames: 0, 90, 180, 270 degrees
    let (encoder, frames) = RecordingEncoder::new(vec![(85, 50), (50, 85)]);
    let service = ExportService::new();

    block_on(service.export_rotating_result(snapshot, 1000, 4, encoder)).unwrap();

    let frames = frames.lock();
    assert_eq!(frames.len(), 4);
    assert!(frames[0].probes[0] > 200);
    assert!(frames[0].probes[1] < 50);
    // a positive angle turns clockwise on screen: right edge moves to the bottom
    assert!(frames[1].probes[0] < 50);
    assert!(frames[1].probes[1] > 200);
}

#[test]
fn test_empty_history_has_nothing_to_replay() {
    let snapshot = ExportSnapshot {
        strokes: Vec::new(),
        settings: settings(50.0),
    };
    let (encoder, _) = RecordingEncoder::new(vec![]);
    let service = ExportService::new();
    let result = block_on(service.export_drawing_process(snapshot, 100, encoder));
    assert!(matches!(result, Err(ExportError::NothingToExport)));
    assert!(!service.is_exporting());
}

#[test]
fn test_invalid_rotating_parameters() {
    let service = ExportService::new();
    let snapshot = ExportSnapshot {
        strokes: Vec::new(),
        settings: settings(50.0),
    };

    let (encoder, _) = RecordingEncoder::new(vec![]);
    let result = block_on(service.export_rotating_result(snapshot.clone(), 2000, 0, encoder));
    assert!(matches!(result, Err(ExportError::InvalidParameters(_))));

    let (encoder, _) = RecordingEncoder::new(vec![]);
    let result = block_on(service.export_rotating_result(snapshot, 10, 30, encoder));
    assert!(matches!(result, Err(ExportError::InvalidParameters(_))));
}

#[test]
fn test_zero_sized_canvas_is_unavailable() {
    let snapshot = ExportSnapshot {
        strokes: vec![red_dot(0.0, 0.0)],
        settings: CanvasSettings {
            radius: 0.0,
            ..CanvasSettings::default()
        },
    };
    let (encoder, _) = RecordingEncoder::new(vec![]);
    let service = ExportService::new();
    let result = block_on(service.export_drawing_process(snapshot, 100, encoder));
    assert!(matches!(
        result,
        Err(ExportError::CanvasUnavailable { width: 0, height: 0 })
    ));
}

#[test]
fn test_encoder_failure_resets_exporting_flag() {
    let snapshot = ExportSnapshot {
        strokes: vec![red_dot(10.0, 10.0)],
        settings: settings(20.0),
    };
    let service = ExportService::new();
    let result = block_on(service.export_drawing_process(snapshot.clone(), 100, FailingEncoder));
    assert!(matches!(result, Err(ExportError::Io(_))));
    assert!(!service.is_exporting());

    // a new export can be started afterwards
    let (encoder, _) = RecordingEncoder::new(vec![]);
    assert!(block_on(service.export_drawing_process(snapshot, 100, encoder)).is_ok());
}

#[test]
fn test_spawned_export_produces_gif() {
    let snapshot = ExportSnapshot {
        strokes: vec![red_dot(10.0, 10.0), red_dot(30.0, 30.0)],
        settings: settings(20.0),
    };
    let service = ExportService::new();
    let mut job = service.spawn(
        spin_canvas::ExportRequest::DrawingProcess { frame_delay_ms: 100 },
        snapshot,
    );

    let artifact = loop {
        if let Some(result) = job.try_take() {
            break result.unwrap();
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    };

    assert_eq!(job.kind(), ExportKind::DrawingProcess);
    assert_eq!(artifact.frame_count, 2);
    assert!(artifact.bytes.starts_with(b"GIF89a"));

    let dir = std::env::temp_dir().join(format!("spin-canvas-export-{}", std::process::id()));
    let path = artifact.save_to(&dir).unwrap();
    assert!(path.ends_with("drawing-process.gif"));
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    std::fs::remove_dir_all(&dir).unwrap();
}
