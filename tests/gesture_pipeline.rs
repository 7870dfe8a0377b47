//! ジェスチャパイプライン統合テスト
//!
//! フレームソース・手検出・ポインタをすべてフェイクに差し替え、
//! ティックループのend-to-end動作を検証する。
//! ドラッグ判定は実時間（500ms保持）でテストする。

use handmouse::application::pipeline::{PipelineConfig, PipelineRunner};
use handmouse::application::recovery::RecoveryState;
use handmouse::application::runtime_state::RuntimeSettings;
use handmouse::domain::{
    DomainResult, Frame, FrameSourcePort, GestureConfig, HandDetectorPort, HandLandmarks,
    NormalizedPoint, PointerAction, PointerPort, TrackingConfig,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const FRAME_W: u32 = 640;
const FRAME_H: u32 = 480;

/// 常にフレームを供給するソース
struct EndlessSource;

impl FrameSourcePort for EndlessSource {
    fn read_frame(&mut self) -> DomainResult<Option<Frame>> {
        Ok(Some(Frame::new(
            vec![0u8; (FRAME_W * FRAME_H * 3) as usize],
            FRAME_W,
            FRAME_H,
        )))
    }

    fn reinitialize(&mut self) -> DomainResult<()> {
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (FRAME_W, FRAME_H)
    }
}

/// 台本を順に返し、尽きたら最後の状態を繰り返す検出器
struct ScriptedDetector {
    script: Vec<Option<HandLandmarks>>,
    position: usize,
}

impl ScriptedDetector {
    fn new(script: Vec<Option<HandLandmarks>>) -> Self {
        Self {
            script,
            position: 0,
        }
    }
}

impl HandDetectorPort for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> DomainResult<Option<HandLandmarks>> {
        let index = self.position.min(self.script.len() - 1);
        self.position += 1;
        Ok(self.script[index])
    }
}

/// 操作を共有バッファに記録するポインタ（ランナーに所有権を渡した後も観測できる）
#[derive(Clone)]
struct SharedPointer {
    actions: Arc<Mutex<Vec<PointerAction>>>,
}

impl SharedPointer {
    fn new() -> Self {
        Self {
            actions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn recorded(&self) -> Vec<PointerAction> {
        self.actions.lock().unwrap().clone()
    }

    fn push(&self, action: PointerAction) {
        self.actions.lock().unwrap().push(action);
    }
}

impl PointerPort for SharedPointer {
    fn move_to(&mut self, x: f64, y: f64) -> DomainResult<()> {
        self.push(PointerAction::MoveTo { x, y });
        Ok(())
    }

    fn button_down(&mut self) -> DomainResult<()> {
        self.push(PointerAction::ButtonDown);
        Ok(())
    }

    fn button_up(&mut self) -> DomainResult<()> {
        self.push(PointerAction::ButtonUp);
        Ok(())
    }

    fn click(&mut self) -> DomainResult<()> {
        self.push(PointerAction::Click);
        Ok(())
    }

    fn double_click(&mut self) -> DomainResult<()> {
        self.push(PointerAction::DoubleClick);
        Ok(())
    }

    fn pause(&mut self, _duration: Duration) {
        // テストでは待機しない
    }

    fn screen_size(&self) -> DomainResult<(u32, u32)> {
        Ok((1920, 1080))
    }
}

fn pinched(x: f64, y: f64) -> Option<HandLandmarks> {
    Some(HandLandmarks::new(
        NormalizedPoint::new(x, y),
        NormalizedPoint::new(x, y),
        NormalizedPoint::new(x - 0.3, y),
    ))
}

fn open(x: f64, y: f64) -> Option<HandLandmarks> {
    Some(HandLandmarks::new(
        NormalizedPoint::new(x + 0.2, y),
        NormalizedPoint::new(x, y),
        NormalizedPoint::new(x - 0.2, y),
    ))
}

fn build_runner(
    detector: ScriptedDetector,
    pointer: SharedPointer,
) -> PipelineRunner<EndlessSource, ScriptedDetector, SharedPointer> {
    let tracking = TrackingConfig::default();
    let gesture = GestureConfig::default();
    let settings = RuntimeSettings::new(&tracking, &gesture);
    PipelineRunner::new(
        EndlessSource,
        detector,
        pointer,
        tracking,
        gesture,
        PipelineConfig {
            tick_interval: Duration::from_millis(1),
            stats_interval: Duration::from_secs(3600),
        },
        settings,
        RecoveryState::with_default_strategy(),
    )
    .expect("failed to build pipeline")
}

#[test]
fn short_pinch_produces_single_click() {
    let pointer = SharedPointer::new();
    let detector = ScriptedDetector::new(vec![pinched(0.5, 0.5), open(0.5, 0.5)]);
    let mut runner = build_runner(detector, pointer.clone());

    runner.tick().unwrap();
    std::thread::sleep(Duration::from_millis(50));
    runner.tick().unwrap();

    let actions = pointer.recorded();
    assert!(actions.contains(&PointerAction::Click));
    assert!(!actions.contains(&PointerAction::ButtonDown));
}

#[test]
fn held_pinch_produces_drag_with_matching_release() {
    let pointer = SharedPointer::new();
    let detector = ScriptedDetector::new(vec![
        pinched(0.5, 0.5),
        pinched(0.5, 0.5),
        open(0.5, 0.5),
    ]);
    let mut runner = build_runner(detector, pointer.clone());

    runner.tick().unwrap();
    std::thread::sleep(Duration::from_millis(550));
    runner.tick().unwrap();
    runner.tick().unwrap();

    let actions = pointer.recorded();
    let downs = actions
        .iter()
        .filter(|a| **a == PointerAction::ButtonDown)
        .count();
    let ups = actions
        .iter()
        .filter(|a| **a == PointerAction::ButtonUp)
        .count();
    assert_eq!(downs, 1);
    assert_eq!(ups, 1);
    // DownはUpより先
    let down_pos = actions
        .iter()
        .position(|a| *a == PointerAction::ButtonDown)
        .unwrap();
    let up_pos = actions
        .iter()
        .position(|a| *a == PointerAction::ButtonUp)
        .unwrap();
    assert!(down_pos < up_pos);
    // ドラッグ経路ではクリックは発生しない
    assert!(!actions.contains(&PointerAction::Click));
}

#[test]
fn stop_during_drag_releases_button() {
    let pointer = SharedPointer::new();
    // 手はずっとピンチしたまま（台本の最後を繰り返す）
    let detector = ScriptedDetector::new(vec![pinched(0.5, 0.5)]);
    let runner = build_runner(detector, pointer.clone());
    let stop = runner.stop_handle();

    let handle = std::thread::spawn(move || runner.run());

    // ドラッグ開始まで待ってから停止を要求
    std::thread::sleep(Duration::from_millis(700));
    stop.stop();
    let result = handle.join().expect("pipeline thread panicked");
    assert!(result.is_ok());

    let actions = pointer.recorded();
    assert!(actions.contains(&PointerAction::ButtonDown));
    // 停止時の後始末でボタンが必ず解放される
    assert_eq!(actions.last(), Some(&PointerAction::ButtonUp));
}

#[test]
fn fingertip_motion_moves_cursor_with_scaling() {
    let pointer = SharedPointer::new();
    let detector = ScriptedDetector::new(vec![open(0.2, 0.2), open(0.6, 0.6)]);
    let mut runner = build_runner(detector, pointer.clone());

    // 1ティック目は前回位置がないため移動しない
    runner.tick().unwrap();
    assert!(pointer.recorded().is_empty());

    // 2ティック目で移動平均が大きく動き、閾値を超えてMoveToが出る
    runner.tick().unwrap();
    let actions = pointer.recorded();
    let moved = actions
        .iter()
        .any(|a| matches!(a, PointerAction::MoveTo { .. }));
    assert!(moved);
}

#[test]
fn disabled_pipeline_releases_drag_and_stays_idle() {
    let pointer = SharedPointer::new();
    let detector = ScriptedDetector::new(vec![pinched(0.5, 0.5)]);
    let runner = build_runner(detector, pointer.clone());
    let settings = runner.settings_handle();
    let stop = runner.stop_handle();

    let handle = std::thread::spawn(move || runner.run());

    // ドラッグに入るまで待つ
    std::thread::sleep(Duration::from_millis(700));
    assert!(pointer.recorded().contains(&PointerAction::ButtonDown));

    // 無効化するとドラッグが解放され、以後は何も注入されない
    settings.set_enabled(false);
    std::thread::sleep(Duration::from_millis(100));
    assert!(pointer.recorded().contains(&PointerAction::ButtonUp));

    let count_before = pointer.recorded().len();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(pointer.recorded().len(), count_before);

    stop.stop();
    handle.join().expect("pipeline thread panicked").unwrap();
}
