//! ピンチジェスチャ認識器（Application層）
//!
//! 2つの独立したピンチチャネル（人差し指―親指、中指―親指）を
//! タイマー付きの接触/解放状態機械として追跡し、クリック・ドラッグ開始・
//! ドラッグ終了・ダブルクリックのイベントを生成する。
//!
//! # チャネル仕様
//! - 人差し指―親指: クリックとドラッグ。接触0.5秒以上でドラッグ開始、
//!   解放時に接触0.3秒未満ならクリック。[0.3, 0.5)秒はデッドバンド
//! - 中指―親指: ダブルクリックのみ。解放時に接触0.3秒未満で発火
//!
//! 時刻は`now`引数で受け取る。状態遷移がスリープなしでテストできる。

use std::time::{Duration, Instant};

use crate::domain::{GestureConfig, GestureLabel, PinchDistances, PointerAction};

/// ピンチチャネルの接触状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchPhase {
    /// 非接触
    Released,
    /// 接触中（接触開始時刻つき）
    Touching { since: Instant },
}

/// 1ティックでのチャネルの状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TouchEdge {
    /// 遷移なし
    None,
    /// 接触開始（立ち上がりエッジ）
    Began,
    /// 接触終了（立ち下がりエッジ、総接触時間つき）
    Ended { held_for: Duration },
}

/// ピンチチャネル（距離閾値で駆動される2状態デバウンス機械）
#[derive(Debug)]
struct TouchChannel {
    phase: TouchPhase,
}

impl TouchChannel {
    fn new() -> Self {
        Self {
            phase: TouchPhase::Released,
        }
    }

    /// 接触判定を反映してエッジを返す
    fn update(&mut self, in_contact: bool, now: Instant) -> TouchEdge {
        match (self.phase, in_contact) {
            (TouchPhase::Released, true) => {
                self.phase = TouchPhase::Touching { since: now };
                TouchEdge::Began
            }
            (TouchPhase::Touching { since }, false) => {
                self.phase = TouchPhase::Released;
                TouchEdge::Ended {
                    held_for: now.duration_since(since),
                }
            }
            _ => TouchEdge::None,
        }
    }

    /// 接触中であれば接触開始時刻を返す
    fn touching_since(&self) -> Option<Instant> {
        match self.phase {
            TouchPhase::Touching { since } => Some(since),
            TouchPhase::Released => None,
        }
    }

    /// 進行中のタイマーを破棄して強制的に非接触にする（手のロスト時）
    fn force_release(&mut self) {
        self.phase = TouchPhase::Released;
    }
}

/// 1ティック分のジェスチャ認識結果
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOutcome {
    /// 表示用ラベル。両チャネルが同時に発火した場合は中指チャネルが優先
    pub label: GestureLabel,
    /// 注入コラボレータに依頼する操作列（生成順に実行する）
    pub actions: Vec<PointerAction>,
}

impl GestureOutcome {
    fn idle() -> Self {
        Self {
            label: GestureLabel::None,
            actions: Vec::new(),
        }
    }
}

/// ピンチジェスチャ認識器
#[derive(Debug)]
pub struct GestureRecognizer {
    /// 人差し指―親指チャネル（クリック／ドラッグ）
    index_thumb: TouchChannel,
    /// 中指―親指チャネル（ダブルクリック）
    middle_thumb: TouchChannel,
    /// ドラッグモード（マウスボタンを押下したまま持ち越す状態）
    drag_mode: bool,
}

impl GestureRecognizer {
    /// 新しい認識器を作成
    pub fn new() -> Self {
        Self {
            index_thumb: TouchChannel::new(),
            middle_thumb: TouchChannel::new(),
            drag_mode: false,
        }
    }

    /// ドラッグモード中かどうか
    pub fn drag_active(&self) -> bool {
        self.drag_mode
    }

    /// 1ティック分の更新
    ///
    /// # Arguments
    /// - `pinch`: 指先間距離。Noneは「手なし」で、両チャネルを強制解放する
    /// - `cfg`: 現在のジェスチャ設定（ティック先頭のスナップショット）
    /// - `now`: このティックの時刻
    pub fn update(
        &mut self,
        pinch: Option<PinchDistances>,
        cfg: &GestureConfig,
        now: Instant,
    ) -> GestureOutcome {
        let Some(pinch) = pinch else {
            return self.release_all();
        };

        let mut outcome = GestureOutcome::idle();

        // --- 人差し指―親指チャネル（クリックとドラッグ） ---
        let in_contact = pinch.index_thumb < cfg.click_threshold;
        match self.index_thumb.update(in_contact, now) {
            TouchEdge::Began => {}
            TouchEdge::None => {
                // 接触継続中: ドラッグ開始判定（1回の接触につき高々1度だけ発火）
                if !self.drag_mode {
                    if let Some(since) = self.index_thumb.touching_since() {
                        if now.duration_since(since) >= cfg.drag_hold() {
                            outcome.actions.push(PointerAction::ButtonDown);
                            self.drag_mode = true;
                            outcome.label = GestureLabel::Dragging;
                        }
                    }
                }
            }
            TouchEdge::Ended { held_for } => {
                if self.drag_mode {
                    outcome.actions.push(PointerAction::ButtonUp);
                    self.drag_mode = false;
                    outcome.label = GestureLabel::DragEnded;
                } else if held_for < cfg.click_max() {
                    outcome.actions.push(PointerAction::Click);
                    outcome.actions.push(PointerAction::Pause(cfg.click_pause()));
                    outcome.label = GestureLabel::Click;
                }
                // [click_max, drag_hold) はデッドバンド: クリックには長すぎ、
                // ドラッグには届かなかった接触。何もしない
            }
        }

        // --- 中指―親指チャネル（ダブルクリック） ---
        let in_contact = pinch.middle_thumb < cfg.click_threshold;
        if let TouchEdge::Ended { held_for } = self.middle_thumb.update(in_contact, now) {
            if held_for < cfg.click_max() {
                outcome.actions.push(PointerAction::DoubleClick);
                outcome.actions.push(PointerAction::Pause(cfg.click_pause()));
                // 同一ティックで両チャネルが発火した場合は中指側を表示する
                outcome.label = GestureLabel::DoubleClick;
            }
        }

        outcome
    }

    /// 両チャネルを強制解放する（手のロスト時・停止時）
    ///
    /// ドラッグモード中だった場合は必ずButtonUpを生成し、
    /// OSポインタがドラッグ状態のまま取り残されないことを保証する。
    pub fn release_all(&mut self) -> GestureOutcome {
        self.index_thumb.force_release();
        self.middle_thumb.force_release();

        if self.drag_mode {
            self.drag_mode = false;
            GestureOutcome {
                label: GestureLabel::DragEnded,
                actions: vec![PointerAction::ButtonUp],
            }
        } else {
            GestureOutcome::idle()
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
