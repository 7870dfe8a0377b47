//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{DomainError, DomainResult};

/// アプリケーション設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// カメラ設定
    pub camera: CameraConfig,
    /// カーソル移動（スタビライザー）設定
    pub tracking: TrackingConfig,
    /// ジェスチャ認識設定
    pub gesture: GestureConfig,
    /// パイプライン設定
    pub pipeline: PipelineConfig,
}

/// カメラ設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CameraConfig {
    /// カメラデバイスのインデックス
    ///
    /// 通常は0（デフォルトWebカメラ）
    pub index: u32,

    /// 要求する解像度（幅、ピクセル）
    ///
    /// デバイスが対応していない場合は最も近いものが選ばれる
    pub width: u32,

    /// 要求する解像度（高さ、ピクセル）
    pub height: u32,

    /// 連続読み取り失敗の許容回数
    ///
    /// この回数を超えたら再初期化を実行
    /// デフォルト: 30回
    pub max_consecutive_failures: u32,

    /// 再初期化時の初期待機時間（ミリ秒）
    ///
    /// デフォルト: 100ms
    pub reinit_initial_delay_ms: u64,

    /// 再初期化時の最大待機時間（ミリ秒、指数バックオフの上限）
    ///
    /// デフォルト: 5000ms
    pub reinit_max_delay_ms: u64,
}

impl CameraConfig {
    /// デフォルトの要求解像度
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 480;
    /// デフォルトの連続失敗閾値
    pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 30;
    /// デフォルトの再初期化初期遅延（ミリ秒）
    pub const DEFAULT_REINIT_INITIAL_DELAY_MS: u64 = 100;
    /// デフォルトの再初期化最大遅延（ミリ秒）
    pub const DEFAULT_REINIT_MAX_DELAY_MS: u64 = 5000;

    pub fn reinit_initial_delay(&self) -> Duration {
        Duration::from_millis(self.reinit_initial_delay_ms)
    }

    pub fn reinit_max_delay(&self) -> Duration {
        Duration::from_millis(self.reinit_max_delay_ms)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_consecutive_failures: Self::DEFAULT_MAX_CONSECUTIVE_FAILURES,
            reinit_initial_delay_ms: Self::DEFAULT_REINIT_INITIAL_DELAY_MS,
            reinit_max_delay_ms: Self::DEFAULT_REINIT_MAX_DELAY_MS,
        }
    }
}

/// カーソル移動（スタビライザー）設定
///
/// movement_threshold / scaling_factor_x / scaling_factor_y は
/// UIスライダー相当の外部コラボレータから実行中に変更されうる。
/// 各ティックの先頭で読み取られ、次のティックから反映される。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrackingConfig {
    /// 平滑化ウィンドウのサンプル数（移動平均のN）
    ///
    /// デフォルト: 7フレーム
    pub smoothing_window_size: usize,

    /// カーソルを動かす最小移動量（スクリーンピクセル）
    ///
    /// UI上は「Sensitivity」。これ以下の移動はジッタとして抑制する
    /// デフォルト: 10.0
    pub movement_threshold: f64,

    /// デッドゾーン半径（スクリーンピクセル）
    ///
    /// デフォルト: 5.0
    pub dead_zone_radius: f64,

    /// X軸のスケーリング倍率（1より大きいと小さな手の動きで画面全体を覆える）
    ///
    /// デフォルト: 1.5
    pub scaling_factor_x: f64,

    /// Y軸のスケーリング倍率
    ///
    /// デフォルト: 1.8
    pub scaling_factor_y: f64,
}

impl TrackingConfig {
    pub const DEFAULT_SMOOTHING_WINDOW_SIZE: usize = 7;
    pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 10.0;
    pub const DEFAULT_DEAD_ZONE_RADIUS: f64 = 5.0;
    pub const DEFAULT_SCALING_FACTOR_X: f64 = 1.5;
    pub const DEFAULT_SCALING_FACTOR_Y: f64 = 1.8;
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_window_size: Self::DEFAULT_SMOOTHING_WINDOW_SIZE,
            movement_threshold: Self::DEFAULT_MOVEMENT_THRESHOLD,
            dead_zone_radius: Self::DEFAULT_DEAD_ZONE_RADIUS,
            scaling_factor_x: Self::DEFAULT_SCALING_FACTOR_X,
            scaling_factor_y: Self::DEFAULT_SCALING_FACTOR_Y,
        }
    }
}

/// ジェスチャ認識設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GestureConfig {
    /// ピンチ接触と見なす指先間距離（フレームピクセル）
    ///
    /// デフォルト: 40.0
    pub click_threshold: f64,

    /// ドラッグ開始までの保持時間（ミリ秒）
    ///
    /// 人差し指―親指ピンチをこの時間以上保持するとドラッグ開始
    /// デフォルト: 500ms
    pub drag_hold_ms: u64,

    /// クリックと判定する最大接触時間（ミリ秒）
    ///
    /// [click_max_ms, drag_hold_ms) の接触はデッドバンド（何もしない）
    /// デフォルト: 300ms
    pub click_max_ms: u64,

    /// クリック直後の再トリガー抑止待機（ミリ秒）
    ///
    /// デフォルト: 200ms
    pub click_pause_ms: u64,
}

impl GestureConfig {
    pub const DEFAULT_CLICK_THRESHOLD: f64 = 40.0;
    pub const DEFAULT_DRAG_HOLD_MS: u64 = 500;
    pub const DEFAULT_CLICK_MAX_MS: u64 = 300;
    pub const DEFAULT_CLICK_PAUSE_MS: u64 = 200;

    pub fn drag_hold(&self) -> Duration {
        Duration::from_millis(self.drag_hold_ms)
    }

    pub fn click_max(&self) -> Duration {
        Duration::from_millis(self.click_max_ms)
    }

    pub fn click_pause(&self) -> Duration {
        Duration::from_millis(self.click_pause_ms)
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_threshold: Self::DEFAULT_CLICK_THRESHOLD,
            drag_hold_ms: Self::DEFAULT_DRAG_HOLD_MS,
            click_max_ms: Self::DEFAULT_CLICK_MAX_MS,
            click_pause_ms: Self::DEFAULT_CLICK_PAUSE_MS,
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    /// ティック間の待機時間（ミリ秒）
    ///
    /// 実効的には「フレーム取得が許す限り高速」
    pub tick_interval_ms: u64,

    /// 統計情報の出力間隔（秒）
    pub stats_interval_sec: u64,
}

impl PipelineConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1;
    pub const DEFAULT_STATS_INTERVAL_SEC: u64 = 10;

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_sec)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            stats_interval_sec: Self::DEFAULT_STATS_INTERVAL_SEC,
        }
    }
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            DomainError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        // カメラ解像度の検証
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(DomainError::Configuration(
                "Camera width and height must be greater than 0".to_string(),
            ));
        }

        // 平滑化ウィンドウの検証
        if self.tracking.smoothing_window_size == 0 {
            return Err(DomainError::Configuration(
                "smoothing_window_size must be at least 1".to_string(),
            ));
        }

        // 閾値の検証
        if self.tracking.movement_threshold < 0.0 || self.tracking.dead_zone_radius < 0.0 {
            return Err(DomainError::Configuration(
                "movement_threshold and dead_zone_radius must be non-negative".to_string(),
            ));
        }
        if self.tracking.scaling_factor_x <= 0.0 || self.tracking.scaling_factor_y <= 0.0 {
            return Err(DomainError::Configuration(
                "Scaling factors must be positive".to_string(),
            ));
        }

        // ジェスチャ閾値の検証
        if self.gesture.click_threshold <= 0.0 {
            return Err(DomainError::Configuration(
                "click_threshold must be positive".to_string(),
            ));
        }
        if self.gesture.click_max_ms > self.gesture.drag_hold_ms {
            return Err(DomainError::Configuration(
                "click_max_ms must not exceed drag_hold_ms".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.tracking.smoothing_window_size, 7);
        assert_eq!(config.tracking.movement_threshold, 10.0);
        assert_eq!(config.tracking.scaling_factor_x, 1.5);
        assert_eq!(config.tracking.scaling_factor_y, 1.8);
        assert_eq!(config.gesture.click_threshold, 40.0);
        assert_eq!(config.gesture.drag_hold_ms, 500);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // 不正な解像度
        config.camera.width = 0;
        assert!(config.validate().is_err());

        config.camera.width = 640;

        // 不正な平滑化ウィンドウ
        config.tracking.smoothing_window_size = 0;
        assert!(config.validate().is_err());

        config.tracking.smoothing_window_size = 7;

        // クリック上限がドラッグ閾値を超える
        config.gesture.click_max_ms = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_thresholds() {
        let mut config = AppConfig::default();

        config.tracking.movement_threshold = -1.0;
        assert!(config.validate().is_err());

        config.tracking.movement_threshold = 10.0;
        config.tracking.scaling_factor_y = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gesture_durations() {
        let config = GestureConfig::default();
        assert_eq!(config.drag_hold(), Duration::from_millis(500));
        assert_eq!(config.click_max(), Duration::from_millis(300));
        assert_eq!(config.click_pause(), Duration::from_millis(200));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        AppConfig::write_default(&path).unwrap();
        let loaded = AppConfig::from_file(&path).unwrap();

        loaded.validate().unwrap();
        assert_eq!(loaded.tracking.smoothing_window_size, 7);
        assert_eq!(loaded.gesture.click_threshold, 40.0);
    }

    #[test]
    fn test_config_loads() {
        // config.tomlが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml").expect("config.tomlが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");

        assert!(
            config.tracking.smoothing_window_size >= 1,
            "smoothing_window_sizeは1以上である必要があります"
        );
        assert!(
            config.gesture.click_threshold > 0.0,
            "click_thresholdは0より大きい必要があります"
        );
    }

    #[test]
    fn test_config_example_loads() {
        // config.toml.exampleが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml.example")
            .expect("config.toml.exampleが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");
    }

    #[test]
    fn test_partial_toml_parsing() {
        let toml = r#"
            [camera]
            index = 1
            width = 1280
            height = 720
            max_consecutive_failures = 60
            reinit_initial_delay_ms = 100
            reinit_max_delay_ms = 5000

            [tracking]
            smoothing_window_size = 5
            movement_threshold = 12.0
            dead_zone_radius = 4.0
            scaling_factor_x = 2.0
            scaling_factor_y = 2.5

            [gesture]
            click_threshold = 50.0
            drag_hold_ms = 500
            click_max_ms = 300
            click_pause_ms = 200

            [pipeline]
            tick_interval_ms = 1
            stats_interval_sec = 10
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.camera.index, 1);
        assert_eq!(config.tracking.smoothing_window_size, 5);
        assert_eq!(config.gesture.click_threshold, 50.0);
        assert!(config.validate().is_ok());
    }
}
