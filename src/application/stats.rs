//! 統計情報管理モジュール
//!
//! ティックレート、各処理段階のレイテンシ、再初期化回数などの統計を
//! 収集・出力します。

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// 統計情報の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// フレーム取得時間
    Capture,
    /// ランドマーク検出時間
    Detect,
    /// スタビライザー＋ジェスチャ認識＋注入時間
    Track,
    /// エンドツーエンドのレイテンシ（取得→注入完了）
    EndToEnd,
}

/// パーセンタイル統計値
#[derive(Debug, Clone)]
pub struct PercentileStats {
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub count: usize,
}

/// 統計情報コレクター
#[derive(Debug)]
pub struct StatsCollector {
    /// ティックレート計測用のタイムスタンプ（最大1秒分保持）
    tick_times: VecDeque<Instant>,
    /// 各処理段階の所要時間（最大1000サンプル保持）
    durations: HashMap<StatKind, VecDeque<Duration>>,
    /// 手を検出したティック数
    hand_ticks: u64,
    /// 総ティック数
    total_ticks: u64,
    /// 最後の統計出力時刻
    last_report: Instant,
    /// 統計出力間隔
    report_interval: Duration,
}

impl StatsCollector {
    /// ティックレート計算の時間範囲（秒）
    const TICK_WINDOW_SECS: u64 = 1;
    /// 最大サンプル保持数（パーセンタイル計算用）
    const MAX_DURATION_SAMPLES: usize = 1000;

    /// 新しいStatsCollectorを作成
    ///
    /// # Arguments
    /// * `report_interval` - 統計出力間隔（例: 10秒）
    pub fn new(report_interval: Duration) -> Self {
        Self {
            tick_times: VecDeque::new(),
            durations: HashMap::new(),
            hand_ticks: 0,
            total_ticks: 0,
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// ティック完了を記録
    ///
    /// # Arguments
    /// * `hand_detected` - このティックで手を検出したか
    pub fn record_tick(&mut self, hand_detected: bool) {
        let now = Instant::now();
        self.tick_times.push_back(now);
        self.total_ticks += 1;
        if hand_detected {
            self.hand_ticks += 1;
        }

        let window = Duration::from_secs(Self::TICK_WINDOW_SECS);
        while let Some(&front) = self.tick_times.front() {
            if now.duration_since(front) > window {
                self.tick_times.pop_front();
            } else {
                break;
            }
        }
    }

    /// 処理時間を記録
    pub fn record_duration(&mut self, kind: StatKind, duration: Duration) {
        let queue = self.durations.entry(kind).or_default();
        queue.push_back(duration);

        if queue.len() > Self::MAX_DURATION_SAMPLES {
            queue.pop_front();
        }
    }

    /// 現在のティックレート（ticks/sec）を計算
    pub fn current_tick_rate(&self) -> f64 {
        if self.tick_times.len() < 2 {
            return 0.0;
        }

        let count = self.tick_times.len() as f64;
        if let (Some(&first), Some(&last)) = (self.tick_times.front(), self.tick_times.back()) {
            let elapsed = last.duration_since(first).as_secs_f64();
            if elapsed > 0.0 {
                return count / elapsed;
            }
        }
        0.0
    }

    /// 手の検出率（0.0〜1.0）
    pub fn hand_detection_ratio(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.hand_ticks as f64 / self.total_ticks as f64
    }

    /// パーセンタイル統計を計算
    ///
    /// # Returns
    /// パーセンタイル統計値。データがない場合は None
    pub fn percentile_stats(&self, kind: StatKind) -> Option<PercentileStats> {
        let queue = self.durations.get(&kind)?;
        if queue.is_empty() {
            return None;
        }

        let mut sorted: Vec<Duration> = queue.iter().copied().collect();
        sorted.sort();

        let count = sorted.len();
        let p50 = sorted[count * 50 / 100];
        let p95 = sorted[count * 95 / 100];
        let p99 = sorted[count * 99 / 100];

        Some(PercentileStats {
            p50,
            p95,
            p99,
            count,
        })
    }

    /// 統計レポートを出力すべきか判定
    pub fn should_report(&self) -> bool {
        self.last_report.elapsed() >= self.report_interval
    }

    /// 統計レポートを出力してタイマーをリセット
    pub fn report_and_reset(&mut self) {
        tracing::info!("=== Pipeline Statistics ===");
        tracing::info!("Tick rate: {:.1}/s", self.current_tick_rate());
        tracing::info!(
            "Hand detection: {:.1}% ({} / {} ticks)",
            self.hand_detection_ratio() * 100.0,
            self.hand_ticks,
            self.total_ticks
        );

        for kind in [
            StatKind::Capture,
            StatKind::Detect,
            StatKind::Track,
            StatKind::EndToEnd,
        ] {
            if let Some(stats) = self.percentile_stats(kind) {
                tracing::info!(
                    "{:?}: p50={:.2}ms, p95={:.2}ms, p99={:.2}ms (n={})",
                    kind,
                    stats.p50.as_secs_f64() * 1000.0,
                    stats.p95.as_secs_f64() * 1000.0,
                    stats.p99.as_secs_f64() * 1000.0,
                    stats.count
                );
            }
        }

        tracing::info!("===========================");

        self.last_report = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rate_calculation() {
        let mut stats = StatsCollector::new(Duration::from_secs(10));

        // 100ms間隔で4ティック記録（期待レート: ~10/s）
        for _ in 0..4 {
            stats.record_tick(true);
            std::thread::sleep(Duration::from_millis(100));
        }

        let rate = stats.current_tick_rate();
        assert!(rate > 5.0 && rate < 15.0, "rate should be around 10, got {}", rate);
    }

    #[test]
    fn test_hand_detection_ratio() {
        let mut stats = StatsCollector::new(Duration::from_secs(10));

        stats.record_tick(true);
        stats.record_tick(true);
        stats.record_tick(false);
        stats.record_tick(false);

        assert_eq!(stats.hand_detection_ratio(), 0.5);
    }

    #[test]
    fn test_percentile_stats() {
        let mut stats = StatsCollector::new(Duration::from_secs(10));

        // 100サンプルの処理時間を記録
        for i in 0..100 {
            stats.record_duration(StatKind::Track, Duration::from_millis(i));
        }

        let percentile = stats.percentile_stats(StatKind::Track).unwrap();
        assert_eq!(percentile.count, 100);
        assert!(percentile.p50.as_millis() >= 45 && percentile.p50.as_millis() <= 55);
        assert!(percentile.p95.as_millis() >= 90 && percentile.p95.as_millis() <= 99);
        assert_eq!(percentile.p99.as_millis(), 99);
    }

    #[test]
    fn test_percentile_stats_empty() {
        let stats = StatsCollector::new(Duration::from_secs(10));
        assert!(stats.percentile_stats(StatKind::Capture).is_none());
    }

    #[test]
    fn test_duration_samples_bounded() {
        let mut stats = StatsCollector::new(Duration::from_secs(10));

        for i in 0..1500 {
            stats.record_duration(StatKind::EndToEnd, Duration::from_micros(i));
        }

        let percentile = stats.percentile_stats(StatKind::EndToEnd).unwrap();
        assert_eq!(percentile.count, 1000);
    }

    #[test]
    fn test_should_report() {
        let stats = StatsCollector::new(Duration::from_millis(100));

        assert!(!stats.should_report());

        std::thread::sleep(Duration::from_millis(150));

        assert!(stats.should_report());
    }
}
