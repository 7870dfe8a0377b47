//! パイプライン制御モジュール
//!
//! シングルスレッドのティック駆動ループを制御します。
//! 1ティック = フレーム取得 → ミラー → 手検出 → スタビライザー →
//! ジェスチャ認識 → カーソル/ボタン操作の注入 → 表示更新。
//!
//! 並行ティックは存在しない。時間のかかるティック（ブロッキングする
//! キャプチャ等）は単に次のティックを遅らせる。
//!
//! # 停止時の保証
//! ループを抜ける前に必ず保持中のマウスボタンを解放する
//! （ドラッグ状態のままOSポインタを取り残さない）。

use crate::application::{
    gesture::GestureRecognizer,
    recovery::RecoveryState,
    runtime_state::RuntimeSettings,
    stabilizer::MotionStabilizer,
    stats::{StatKind, StatsCollector},
};
use crate::domain::{
    apply_actions, DisplaySinkPort, DomainError, DomainResult, FrameContext, FrameSourcePort,
    GestureConfig, GestureLabel, HandDetectorPort, PointerAction, PointerPort, ScreenPoint,
    TrackingConfig,
};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// パイプライン実行設定
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// ティック間の待機時間
    pub tick_interval: Duration,
    /// 統計出力間隔
    pub stats_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1),
            stats_interval: Duration::from_secs(10),
        }
    }
}

/// 停止ハンドル（別スレッドからループ停止を要求する）
#[derive(Clone)]
pub struct StopHandle(Sender<()>);

impl StopHandle {
    /// ループの停止を要求する（冪等）
    pub fn stop(&self) {
        let _ = self.0.try_send(());
    }
}

/// 1ティックの観測結果（テスト・表示用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// このティックでフレームを取得できたか
    pub frame_read: bool,
    /// 手を検出したか
    pub hand_detected: bool,
    /// このティックのジェスチャラベル
    pub label: GestureLabel,
    /// 表示用の平滑化カーソル位置
    pub cursor: Option<ScreenPoint>,
}

impl TickOutcome {
    fn no_frame() -> Self {
        Self {
            frame_read: false,
            hand_detected: false,
            label: GestureLabel::None,
            cursor: None,
        }
    }
}

/// パイプライン実行コンテキスト
pub struct PipelineRunner<S, D, P>
where
    S: FrameSourcePort,
    D: HandDetectorPort,
    P: PointerPort,
{
    source: S,
    detector: D,
    pointer: P,
    display: Option<Box<dyn DisplaySinkPort + Send>>,
    stabilizer: MotionStabilizer,
    recognizer: GestureRecognizer,
    settings: RuntimeSettings,
    tracking: TrackingConfig,
    gesture: GestureConfig,
    recovery: RecoveryState,
    stats: StatsCollector,
    config: PipelineConfig,
    /// 起動時に一度取得したスクリーン解像度（定数扱い）
    screen: (u32, u32),
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
    /// 無効化エッジ検出用（無効化された瞬間にドラッグを解放する）
    was_enabled: bool,
}

impl<S, D, P> PipelineRunner<S, D, P>
where
    S: FrameSourcePort,
    D: HandDetectorPort,
    P: PointerPort,
{
    /// 新しいPipelineRunnerを作成
    ///
    /// スクリーン解像度をポインタポートから一度だけ取得する。
    pub fn new(
        source: S,
        detector: D,
        pointer: P,
        tracking: TrackingConfig,
        gesture: GestureConfig,
        config: PipelineConfig,
        settings: RuntimeSettings,
        recovery: RecoveryState,
    ) -> DomainResult<Self> {
        let screen = pointer.screen_size()?;
        let (stop_tx, stop_rx) = bounded(1);

        Ok(Self {
            source,
            detector,
            pointer,
            display: None,
            stabilizer: MotionStabilizer::new(),
            recognizer: GestureRecognizer::new(),
            settings,
            tracking,
            gesture,
            recovery,
            stats: StatsCollector::new(config.stats_interval),
            config,
            screen,
            stop_tx,
            stop_rx,
            was_enabled: true,
        })
    }

    /// 表示シンクを接続する
    pub fn with_display(mut self, display: Box<dyn DisplaySinkPort + Send>) -> Self {
        self.display = Some(display);
        self
    }

    /// 停止ハンドルを取得する
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop_tx.clone())
    }

    /// 実行時設定ハンドルを取得する（有効/無効トグルとチューニング変更用）
    pub fn settings_handle(&self) -> RuntimeSettings {
        self.settings.clone()
    }

    /// パイプラインを起動（ブロッキング）
    ///
    /// 停止要求か致命的エラーまでティックを回し続ける。
    /// どの経路で抜ける場合も、先に保持中のボタンを解放する。
    pub fn run(mut self) -> DomainResult<()> {
        tracing::info!(
            "Pipeline started: screen={}x{}, tick_interval={:?}",
            self.screen.0,
            self.screen.1,
            self.config.tick_interval
        );

        loop {
            match self.stop_rx.try_recv() {
                Ok(()) => break,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }

            if !self.settings.is_enabled() {
                if self.was_enabled {
                    // 無効化された瞬間: 手のロストと同じ扱いでドラッグを解放
                    self.release_held_buttons();
                    self.stabilizer.reset();
                    self.was_enabled = false;
                    tracing::info!("Pipeline paused");
                }
                std::thread::sleep(self.config.tick_interval);
                continue;
            }
            if !self.was_enabled {
                self.was_enabled = true;
                tracing::info!("Pipeline resumed");
            }

            if let Err(e) = self.tick() {
                tracing::error!("Fatal pipeline error: {:?}", e);
                self.release_held_buttons();
                return Err(e);
            }

            std::thread::sleep(self.config.tick_interval);
        }

        self.release_held_buttons();
        tracing::info!("Pipeline stopped");
        Ok(())
    }

    /// 1ティック分の処理を実行
    ///
    /// # Returns
    /// - `Ok(TickOutcome)`: ティック完了（フレームなし・手なしも正常）
    /// - `Err(DomainError)`: 致命的エラー（カメラが再初期化不能）
    ///
    /// 検出器・注入の失敗はこのティック内で打ち切り、エラーログのみで
    /// 次のティックに回復を委ねる（状態はすべてリセット安全）。
    pub fn tick(&mut self) -> DomainResult<TickOutcome> {
        let tick_started = Instant::now();

        // 1. フレーム取得（失敗は「このティックはフレームなし」扱い）
        let frame = match self.source.read_frame() {
            Ok(Some(mut frame)) => {
                self.recovery.record_success();
                frame.mirror_horizontal();
                frame
            }
            Ok(None) => return Ok(TickOutcome::no_frame()),
            Err(e) => {
                tracing::warn!("Frame read failed: {:?}", e);
                self.handle_read_failure()?;
                return Ok(TickOutcome::no_frame());
            }
        };
        self.stats
            .record_duration(StatKind::Capture, tick_started.elapsed());

        // 2. 手検出（失敗はこのティックのみ中断、状態は保持）
        let detect_started = Instant::now();
        let hand = match self.detector.detect(&frame) {
            Ok(hand) => hand,
            Err(e) => {
                tracing::error!("Hand detection failed: {:?}", e);
                return Ok(TickOutcome::no_frame());
            }
        };
        self.stats
            .record_duration(StatKind::Detect, detect_started.elapsed());

        // 3. チューニング値のスナップショット（スライダー変更を次ティックから反映）
        let tuning = self.settings.snapshot();
        let mut tracking = self.tracking.clone();
        tracking.movement_threshold = tuning.movement_threshold;
        tracking.scaling_factor_x = tuning.scaling_factor_x;
        tracking.scaling_factor_y = tuning.scaling_factor_y;
        let mut gesture = self.gesture.clone();
        gesture.click_threshold = tuning.click_threshold;

        // 4. スタビライザー（カーソル移動の決定）
        let track_started = Instant::now();
        let ctx = FrameContext::new(frame.width, frame.height, self.screen.0, self.screen.1);
        let cursor = self
            .stabilizer
            .update(hand.map(|h| h.index_tip), &ctx, &tracking);

        // 5. ジェスチャ認識
        let pinch = hand.map(|h| h.pinch_distances(frame.width, frame.height));
        let outcome = self.recognizer.update(pinch, &gesture, Instant::now());

        // 6. 注入: カーソル移動を先に、ジェスチャ操作をその後に実行
        //    （失敗はこのティックのみ中断）
        let mut actions: Vec<PointerAction> = Vec::with_capacity(outcome.actions.len() + 1);
        if let Some(target) = cursor.target {
            actions.push(PointerAction::MoveTo {
                x: target.x,
                y: target.y,
            });
        }
        actions.extend_from_slice(&outcome.actions);

        if let Err(e) = apply_actions(&mut self.pointer, &actions) {
            tracing::error!("Pointer injection failed: {:?}", e);
        }
        self.stats
            .record_duration(StatKind::Track, track_started.elapsed());
        self.stats
            .record_duration(StatKind::EndToEnd, tick_started.elapsed());

        // 7. 統計・表示
        self.stats.record_tick(hand.is_some());
        if self.stats.should_report() {
            self.stats.report_and_reset();
        }

        if let Some(display) = self.display.as_mut() {
            if let Err(e) = display.present(&frame, outcome.label, cursor.smoothed) {
                tracing::warn!("Display update failed: {:?}", e);
            }
        }

        Ok(TickOutcome {
            frame_read: true,
            hand_detected: hand.is_some(),
            label: outcome.label,
            cursor: cursor.smoothed,
        })
    }

    /// ドラッグ中であれば強制的にボタンを解放する（停止・一時停止時の後始末）
    pub fn release_held_buttons(&mut self) {
        let outcome = self.recognizer.release_all();
        if outcome.actions.is_empty() {
            return;
        }

        tracing::info!("Releasing held mouse button (forced drag end)");
        if let Err(e) = apply_actions(&mut self.pointer, &outcome.actions) {
            // 解放の失敗は記録するしかない（OSポインタは外部状態）
            tracing::error!("Failed to release mouse button: {:?}", e);
        }
    }

    /// 注入済みポート参照（テスト用）
    #[cfg(test)]
    pub(crate) fn pointer(&self) -> &P {
        &self.pointer
    }

    /// フレーム読み取り失敗の後処理
    ///
    /// 連続失敗が閾値に達したらバックオフを挟んで再初期化を試みる。
    /// 累積失敗時間が上限を超えたら致命的エラーとして伝播する。
    fn handle_read_failure(&mut self) -> DomainResult<()> {
        if !self.recovery.record_failure() {
            return Ok(());
        }

        if self.recovery.is_cumulative_failure_exceeded() {
            return Err(DomainError::Capture(
                "Camera could not be reinitialized within the failure budget".to_string(),
            ));
        }

        let backoff = self.recovery.current_backoff();
        tracing::warn!(
            "Reinitializing frame source (attempt #{}, backoff {:?})",
            self.recovery.total_reinitializations() + 1,
            backoff
        );
        std::thread::sleep(backoff);
        self.recovery.record_reinitialization_attempt();

        if let Err(e) = self.source.reinitialize() {
            tracing::warn!("Frame source reinitialization failed: {:?}", e);
        }

        Ok(())
    }
}
