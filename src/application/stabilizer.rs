//! カーソル移動スタビライザー（Application層）
//!
//! 生の人差し指先端位置を、平滑化・スケーリング・デッドゾーン適用済みの
//! スクリーン座標に変換し、このフレームでカーソルを動かすかどうかを決める。
//!
//! # アルゴリズム
//! 1. 正規化座標 → フレームピクセル → 軸別スケーリングでスクリーン座標へ
//! 2. スクリーン境界にクランプ（ラップも拒否もしない）
//! 3. 直近N件の移動平均（ローパスフィルタ）でジッタを抑制
//! 4. 前回確定位置との距離が閾値を超えたときのみ移動を確定
//!
//! 手が検出されないフレームで履歴と確定位置をリセットする。

use std::collections::VecDeque;

use crate::domain::{FrameContext, NormalizedPoint, ScreenPoint, TrackingConfig};

/// 1ティック分のスタビライザー出力
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorUpdate {
    /// カーソルを移動させる場合の移動先。Noneは「このティックは動かさない」
    pub target: Option<ScreenPoint>,
    /// 表示用の平滑化済み位置。手が見えている間は移動の有無に関わらずSome
    pub smoothed: Option<ScreenPoint>,
}

impl CursorUpdate {
    /// 「移動なし・表示なし」の出力（手が不在のティック）
    fn absent() -> Self {
        Self {
            target: None,
            smoothed: None,
        }
    }
}

/// カーソル移動スタビライザー
///
/// 状態は平滑化履歴と最後に確定したカーソル位置のみ。
/// 設定はティックごとに参照で受け取る（実行中のスライダー変更を即反映するため）。
#[derive(Debug)]
pub struct MotionStabilizer {
    /// 直近の平滑化対象スクリーン座標（FIFO、最大smoothing_window_size件）
    history: VecDeque<ScreenPoint>,
    /// 最後にカーソル移動を確定した位置。リセット後はNone
    last_cursor: Option<ScreenPoint>,
}

impl MotionStabilizer {
    /// 新しいスタビライザーを作成
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            last_cursor: None,
        }
    }

    /// 1ティック分の更新
    ///
    /// # Arguments
    /// - `fingertip`: 人差し指先端の正規化座標。Noneは「手なし」
    /// - `ctx`: フレーム／スクリーン寸法
    /// - `cfg`: 現在のトラッキング設定（ティック先頭のスナップショット）
    pub fn update(
        &mut self,
        fingertip: Option<NormalizedPoint>,
        ctx: &FrameContext,
        cfg: &TrackingConfig,
    ) -> CursorUpdate {
        let Some(tip) = fingertip else {
            // 手なし: 履歴と確定位置をリセット
            self.reset();
            return CursorUpdate::absent();
        };

        // 正規化座標 → フレームピクセル → スクリーン座標（軸別スケーリング）
        let (x_px, y_px) = tip.to_frame_pixels(ctx.frame_width, ctx.frame_height);
        let screen_x =
            (ctx.screen_width as f64 / ctx.frame_width as f64) * x_px * cfg.scaling_factor_x;
        let screen_y =
            (ctx.screen_height as f64 / ctx.frame_height as f64) * y_px * cfg.scaling_factor_y;

        // スクリーン境界にクランプ（範囲外のランドマークもここで吸収される）
        let point = ScreenPoint::new(
            screen_x.clamp(0.0, ctx.screen_width as f64),
            screen_y.clamp(0.0, ctx.screen_height as f64),
        );

        // 有界履歴に追加（古いものから破棄）
        self.history.push_back(point);
        while self.history.len() > cfg.smoothing_window_size {
            self.history.pop_front();
        }

        // 移動平均（成分ごと）
        let n = self.history.len() as f64;
        let avg = ScreenPoint::new(
            self.history.iter().map(|p| p.x).sum::<f64>() / n,
            self.history.iter().map(|p| p.y).sum::<f64>() / n,
        );

        // リセット後の最初のサンプル: 比較対象がないため移動しない
        let Some(last) = self.last_cursor else {
            self.last_cursor = Some(avg);
            return CursorUpdate {
                target: None,
                smoothed: Some(avg),
            };
        };

        let movement = avg.distance_to(&last);

        // 移動閾値判定。閾値以下でもデッドゾーン半径を超えていれば移動を許す
        // （デッドゾーン分岐はdead_zone_radius < movement_thresholdのときのみ
        //  効果を持つ）
        let should_move = if movement > cfg.movement_threshold {
            true
        } else {
            movement > cfg.dead_zone_radius
        };

        if should_move {
            self.last_cursor = Some(avg);
            CursorUpdate {
                target: Some(avg),
                smoothed: Some(avg),
            }
        } else {
            CursorUpdate {
                target: None,
                smoothed: Some(avg),
            }
        }
    }

    /// 履歴と確定位置をクリア
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_cursor = None;
    }

    /// 現在の履歴長（不変条件: 常にsmoothing_window_size以下）
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for MotionStabilizer {
    fn default() -> Self {
        Self::new()
    }
}
