//! ランタイム状態管理（Application層）
//!
//! 有効/無効の切り替えと、実行中に変更可能なチューニング値
//! （UIスライダー相当の外部コラボレータが書き込む）を管理します。
//!
//! 設定コラボレータが任意のタイミングで値を書き込み、パイプラインは
//! 各ティックの先頭で一度だけスナップショットを読む。隠れたグローバル
//! 状態を避けつつ実行中チューニングを可能にする設計。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::domain::{GestureConfig, TrackingConfig};

/// 実行中に変更可能なチューニング値のスナップショット
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// カーソルを動かす最小移動量（スクリーンピクセル、UI上はSensitivity）
    pub movement_threshold: f64,
    /// X軸スケーリング倍率
    pub scaling_factor_x: f64,
    /// Y軸スケーリング倍率
    pub scaling_factor_y: f64,
    /// ピンチ接触と見なす指先間距離（フレームピクセル）
    pub click_threshold: f64,
}

impl Tuning {
    /// 設定ファイルの値から初期チューニングを作成
    pub fn from_config(tracking: &TrackingConfig, gesture: &GestureConfig) -> Self {
        Self {
            movement_threshold: tracking.movement_threshold,
            scaling_factor_x: tracking.scaling_factor_x,
            scaling_factor_y: tracking.scaling_factor_y,
            click_threshold: gesture.click_threshold,
        }
    }
}

/// ランタイム設定（スレッド間で共有可能）
///
/// enabledはロックフリーのAtomicBool（読み取りは数CPUサイクル）。
/// チューニング値はMutexで保護するが、ティックあたり1回の
/// スナップショット読み取りしか行わないため競合は実質発生しない。
#[derive(Clone)]
pub struct RuntimeSettings {
    /// パイプライン全体の有効/無効（UIのStart/Stopボタン相当）
    enabled: Arc<AtomicBool>,
    /// 実行中チューニング値
    tuning: Arc<Mutex<Tuning>>,
}

impl RuntimeSettings {
    /// 設定ファイルの値から作成（デフォルトで有効）
    pub fn new(tracking: &TrackingConfig, gesture: &GestureConfig) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
            tuning: Arc::new(Mutex::new(Tuning::from_config(tracking, gesture))),
        }
    }

    /// パイプラインが有効かどうかを確認（ロックフリー）
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// 有効/無効をトグル（新しい状態を返す）
    pub fn toggle_enabled(&self) -> bool {
        let new_value = !self.enabled.load(Ordering::Relaxed);
        self.enabled.store(new_value, Ordering::Relaxed);
        new_value
    }

    /// 有効/無効を設定
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// 現在のチューニング値のスナップショットを取得（ティック先頭で1回）
    pub fn snapshot(&self) -> Tuning {
        *self.tuning.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 移動閾値を設定（スライダー範囲: 1〜30）
    pub fn set_movement_threshold(&self, value: f64) {
        self.lock_tuning().movement_threshold = value;
    }

    /// X軸スケーリング倍率を設定（スライダー範囲: 1.0〜5.0）
    pub fn set_scaling_factor_x(&self, value: f64) {
        self.lock_tuning().scaling_factor_x = value;
    }

    /// Y軸スケーリング倍率を設定（スライダー範囲: 1.0〜5.0）
    pub fn set_scaling_factor_y(&self, value: f64) {
        self.lock_tuning().scaling_factor_y = value;
    }

    /// クリック閾値を設定（スライダー範囲: 10〜100）
    pub fn set_click_threshold(&self, value: f64) {
        self.lock_tuning().click_threshold = value;
    }

    fn lock_tuning(&self) -> std::sync::MutexGuard<'_, Tuning> {
        self.tuning.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
