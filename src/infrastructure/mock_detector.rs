//! モック手検出実装
//!
//! HandDetectorPortのモック。実際の手検出モデルを使わず、
//! 円軌道を描く合成ランドマークを生成します。
//! 検出モデルのアダプタが未接続の環境でもパイプライン全体を
//! 動かして確認できるようにするためのもの。

use crate::domain::{DomainResult, Frame, HandDetectorPort, HandLandmarks, NormalizedPoint};
use std::time::Instant;

/// 合成ランドマーク生成器
///
/// 人差し指の先端がフレーム中央を中心とした円軌道を周回する。
/// 親指・中指は人差し指から十分離しておき、ピンチを発生させない
/// （デモ実行時に実際のクリックが注入されないようにする）。
pub struct MockHandDetector {
    started: Instant,
    /// 1周にかける秒数
    period_secs: f64,
    /// 円軌道の半径（正規化座標）
    radius: f64,
}

impl MockHandDetector {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            period_secs: 8.0,
            radius: 0.2,
        }
    }
}

impl Default for MockHandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetectorPort for MockHandDetector {
    fn detect(&mut self, _frame: &Frame) -> DomainResult<Option<HandLandmarks>> {
        let elapsed = self.started.elapsed().as_secs_f64();
        let angle = elapsed / self.period_secs * std::f64::consts::TAU;

        let index = NormalizedPoint::new(
            0.5 + self.radius * angle.cos(),
            0.5 + self.radius * angle.sin(),
        );
        // 指先間距離をclick_thresholdより大きく保つ
        let thumb = NormalizedPoint::new(index.x - 0.15, index.y + 0.1);
        let middle = NormalizedPoint::new(index.x + 0.1, index.y - 0.05);

        Ok(Some(HandLandmarks::new(thumb, index, middle)))
    }
}
