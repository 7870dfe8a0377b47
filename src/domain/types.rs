/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// すべての処理で共有される不変の型。

use std::time::{Duration, Instant};

/// フレーム寸法で正規化された2D座標（[0,1]×[0,1]が公称範囲）
///
/// 検出器が範囲外の値を返すことがあるが、拒否せずスクリーン座標変換後の
/// クランプで吸収する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    /// 新しい正規化座標を作成
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// フレームのピクセル座標に変換
    pub fn to_frame_pixels(&self, frame_width: u32, frame_height: u32) -> (f64, f64) {
        (self.x * frame_width as f64, self.y * frame_height as f64)
    }
}

/// スクリーンのピクセル座標（絶対座標）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// 新しいスクリーン座標を作成
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2点間のユークリッド距離
    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 1フレーム分の手ランドマークスナップショット（正規化座標）
///
/// 外部検出器が毎フレーム生成する。フレームをまたいで保持されない。
/// ジェスチャ認識に必要な3点のみを扱う（MediaPipe番号では4/8/12）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    /// 親指先端
    pub thumb_tip: NormalizedPoint,
    /// 人差し指先端
    pub index_tip: NormalizedPoint,
    /// 中指先端
    pub middle_tip: NormalizedPoint,
}

impl HandLandmarks {
    /// 新しいランドマークスナップショットを作成
    pub fn new(
        thumb_tip: NormalizedPoint,
        index_tip: NormalizedPoint,
        middle_tip: NormalizedPoint,
    ) -> Self {
        Self {
            thumb_tip,
            index_tip,
            middle_tip,
        }
    }

    /// 2つのピンチチャネルの指先間距離を計算
    ///
    /// 距離はフレームのピクセル空間で測る（click_thresholdと同じ空間）。
    /// スクリーン空間ではない点に注意。
    pub fn pinch_distances(&self, frame_width: u32, frame_height: u32) -> PinchDistances {
        let (ix, iy) = self.index_tip.to_frame_pixels(frame_width, frame_height);
        let (tx, ty) = self.thumb_tip.to_frame_pixels(frame_width, frame_height);
        let (mx, my) = self.middle_tip.to_frame_pixels(frame_width, frame_height);

        PinchDistances {
            index_thumb: ((ix - tx).powi(2) + (iy - ty).powi(2)).sqrt(),
            middle_thumb: ((mx - tx).powi(2) + (my - ty).powi(2)).sqrt(),
        }
    }
}

/// 指先間距離（フレームピクセル空間）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDistances {
    /// 人差し指―親指間の距離
    pub index_thumb: f64,
    /// 中指―親指間の距離
    pub middle_thumb: f64,
}

/// 座標変換に使うフレーム／スクリーン寸法
///
/// スクリーン寸法は起動時に一度取得して定数扱い。
/// フレーム寸法はフレームごとに変わりうる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub frame_width: u32,
    pub frame_height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl FrameContext {
    /// 新しいFrameContextを作成
    pub fn new(frame_width: u32, frame_height: u32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            screen_width,
            screen_height,
        }
    }
}

/// キャプチャされたフレームデータ
#[derive(Debug, Clone)]
pub struct Frame {
    /// フレーム取得時刻
    pub timestamp: Instant,
    /// フレーム画像データ（RGB24形式、連続メモリ）
    pub data: Vec<u8>,
    /// 画像の幅
    pub width: u32,
    /// 画像の高さ
    pub height: u32,
}

impl Frame {
    /// 新しいフレームを作成
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            timestamp: Instant::now(),
            data,
            width,
            height,
        }
    }

    /// 水平方向に反転（ミラー）する
    ///
    /// Webカメラ映像は鏡像にした方が直感的に操作できるため、
    /// 処理前に必ず適用する。
    pub fn mirror_horizontal(&mut self) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        let row_bytes = w * 3;
        for row in self.data.chunks_exact_mut(row_bytes) {
            let mut left = 0usize;
            let mut right = w - 1;
            while left < right {
                for c in 0..3 {
                    row.swap(left * 3 + c, right * 3 + c);
                }
                left += 1;
                right -= 1;
            }
        }
    }
}

/// 1ティックのジェスチャラベル
///
/// 毎ティック計算し直すエフェメラルな値。表示用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureLabel {
    /// ジェスチャなし
    #[default]
    None,
    /// シングルクリック
    Click,
    /// ダブルクリック
    DoubleClick,
    /// ドラッグ開始（遷移したティックのみ表示される）
    Dragging,
    /// ドラッグ終了
    DragEnded,
}

impl GestureLabel {
    /// 表示用の文字列を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Click => "Click",
            Self::DoubleClick => "Double Click",
            Self::Dragging => "Dragging",
            Self::DragEnded => "Drag Ended",
        }
    }
}

/// 注入コラボレータに依頼するポインタ操作
///
/// ジェスチャ認識器が1ティックで0個以上を生成する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// 絶対座標への移動
    MoveTo { x: f64, y: f64 },
    /// マウス左ボタン押下（ドラッグ開始）
    ButtonDown,
    /// マウス左ボタン解放（ドラッグ終了）
    ButtonUp,
    /// シングルクリック
    Click,
    /// ダブルクリック
    DoubleClick,
    /// 連続クリック抑止の待機
    Pause(Duration),
}
