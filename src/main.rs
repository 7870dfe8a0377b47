mod application;
mod domain;
mod infrastructure;
mod logging;

use crate::application::pipeline::{PipelineConfig, PipelineRunner};
use crate::application::recovery::{RecoveryState, RecoveryStrategy};
use crate::application::runtime_state::RuntimeSettings;
use crate::domain::config::AppConfig;
use crate::domain::ports::FrameSourcePort; // traitメソッド使用のため
use crate::infrastructure::camera::CameraFrameSource;
use crate::infrastructure::mock_detector::MockHandDetector;
use crate::infrastructure::pointer::EnigoPointer;
use crate::logging::init_logging;
use anyhow::Context;
use std::path::PathBuf;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("handmouse starting...");

    match run() {
        Ok(_) => {
            tracing::info!("handmouse terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> anyhow::Result<()> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    config.validate().context("Invalid configuration")?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Camera: index={}, requested={}x{}",
        config.camera.index,
        config.camera.width,
        config.camera.height
    );
    tracing::info!(
        "Tracking: window={}, threshold={}, dead_zone={}, scaling=({}, {})",
        config.tracking.smoothing_window_size,
        config.tracking.movement_threshold,
        config.tracking.dead_zone_radius,
        config.tracking.scaling_factor_x,
        config.tracking.scaling_factor_y
    );
    tracing::info!(
        "Gesture: click_threshold={}, drag_hold={}ms, click_max={}ms",
        config.gesture.click_threshold,
        config.gesture.drag_hold_ms,
        config.gesture.click_max_ms
    );

    // Webカメラの初期化
    tracing::info!("Initializing camera...");
    let source =
        CameraFrameSource::new(config.camera.clone()).context("Failed to initialize camera")?;
    let (frame_width, frame_height) = source.resolution();
    tracing::info!("Camera ready: {}x{}", frame_width, frame_height);

    // 手検出アダプタの初期化（実際の検出モデルは未接続）
    tracing::info!("Initializing mock hand detector...");
    let detector = MockHandDetector::new();

    // OSポインタの初期化
    tracing::info!("Initializing pointer...");
    let pointer = EnigoPointer::new().context("Failed to initialize pointer")?;

    // 再初期化戦略の設定
    let recovery_strategy = RecoveryStrategy {
        consecutive_failure_threshold: config.camera.max_consecutive_failures,
        initial_backoff: config.camera.reinit_initial_delay(),
        max_backoff: config.camera.reinit_max_delay(),
        max_cumulative_failure: std::time::Duration::from_secs(60),
    };
    let recovery = RecoveryState::new(recovery_strategy);

    // パイプライン設定
    let pipeline_config = PipelineConfig {
        tick_interval: config.pipeline.tick_interval(),
        stats_interval: config.pipeline.stats_interval(),
    };

    // 実行中に変更可能なチューニング値（外部UIスライダー相当）
    let settings = RuntimeSettings::new(&config.tracking, &config.gesture);

    tracing::info!("Starting pipeline: capture -> detect -> stabilize -> recognize -> inject");

    let runner = PipelineRunner::new(
        source,
        detector,
        pointer,
        config.tracking.clone(),
        config.gesture.clone(),
        pipeline_config,
        settings,
        recovery,
    )
    .context("Failed to build pipeline")?;

    #[cfg(feature = "debug-display")]
    let runner = {
        use crate::infrastructure::debug_display::DebugDisplay;
        let display = DebugDisplay::new(frame_width, frame_height)
            .context("Failed to open debug window")?;
        runner.with_display(Box::new(display))
    };

    // Enterキーで停止（UIレイヤーの終了ボタン相当）
    let stop = runner.stop_handle();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        tracing::info!("Stop requested from stdin");
        stop.stop();
    });

    // パイプラインの起動（ブロッキング）
    runner.run()?;

    Ok(())
}
