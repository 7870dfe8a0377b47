/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、Application層がDIで注入する。

use std::time::Duration;

use crate::domain::{DomainResult, Frame, GestureLabel, HandLandmarks, PointerAction, ScreenPoint};

/// フレームソースポート: Webカメラからのフレーム取得を抽象化
pub trait FrameSourcePort {
    /// 1フレーム読み取る
    ///
    /// # Returns
    /// - `Ok(Some(Frame))`: フレームの取得成功
    /// - `Ok(None)`: このティックでは新しいフレームなし
    /// - `Err(DomainError)`: 読み取り失敗（連続すると再初期化対象）
    fn read_frame(&mut self) -> DomainResult<Option<Frame>>;

    /// キャプチャセッションを再初期化
    ///
    /// カメラ切断などで読み取りが失敗し続けた場合に呼び出される。
    fn reinitialize(&mut self) -> DomainResult<()>;

    /// 実際に配信されている解像度を取得
    fn resolution(&self) -> (u32, u32);
}

/// 検出ポート: 手ランドマーク検出を抽象化
///
/// フレームを受け取り、高々1つの手のランドマークを正規化座標で返す。
pub trait HandDetectorPort {
    /// フレームから手を検出する
    ///
    /// # Returns
    /// - `Ok(Some(HandLandmarks))`: 手を検出
    /// - `Ok(None)`: 手なし（エラーではない。リセット処理のトリガー）
    /// - `Err(DomainError)`: 検出器の内部エラー（このティックのみ中断）
    fn detect(&mut self, frame: &Frame) -> DomainResult<Option<HandLandmarks>>;
}

/// ポインタポート: OSカーソル操作を抽象化
///
/// moveTo/mouseDown/mouseUp/click/doubleClickの小さなcapability界面。
/// テストでは操作を記録するフェイク実装に差し替えられる。
pub trait PointerPort {
    /// カーソルを絶対スクリーン座標へ移動
    fn move_to(&mut self, x: f64, y: f64) -> DomainResult<()>;

    /// マウス左ボタンを押下（ドラッグ開始）
    fn button_down(&mut self) -> DomainResult<()>;

    /// マウス左ボタンを解放（ドラッグ終了）
    fn button_up(&mut self) -> DomainResult<()>;

    /// シングルクリック
    fn click(&mut self) -> DomainResult<()>;

    /// ダブルクリック
    fn double_click(&mut self) -> DomainResult<()>;

    /// クリック直後の再トリガー抑止待機
    ///
    /// デフォルトはスレッドスリープ。モックは無待機で記録のみ行う。
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// プライマリディスプレイの解像度を取得（起動時に一度だけ使用）
    fn screen_size(&self) -> DomainResult<(u32, u32)>;
}

/// 表示ポート: 処理済みフレームと状態表示を抽象化
///
/// コアの対象外だが、デバッグ表示アダプタが実装する。
pub trait DisplaySinkPort {
    /// フレームと現在のジェスチャ・カーソル位置を表示する
    fn present(
        &mut self,
        frame: &Frame,
        label: GestureLabel,
        cursor: Option<ScreenPoint>,
    ) -> DomainResult<()>;
}

/// ポインタ操作列をポートに対して順番に実行するヘルパー
///
/// 認識器が生成した操作列とOS注入の境界。1つでも失敗したら
/// そこで打ち切る（残りはこのティックでは実行しない）。
pub fn apply_actions(pointer: &mut dyn PointerPort, actions: &[PointerAction]) -> DomainResult<()> {
    for action in actions {
        match *action {
            PointerAction::MoveTo { x, y } => pointer.move_to(x, y)?,
            PointerAction::ButtonDown => pointer.button_down()?,
            PointerAction::ButtonUp => pointer.button_up()?,
            PointerAction::Click => pointer.click()?,
            PointerAction::DoubleClick => pointer.double_click()?,
            PointerAction::Pause(duration) => pointer.pause(duration),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[derive(Default)]
    struct RecordingPointer {
        log: Vec<String>,
        fail_on_click: bool,
    }

    impl PointerPort for RecordingPointer {
        fn move_to(&mut self, x: f64, y: f64) -> DomainResult<()> {
            self.log.push(format!("move({x},{y})"));
            Ok(())
        }

        fn button_down(&mut self) -> DomainResult<()> {
            self.log.push("down".to_string());
            Ok(())
        }

        fn button_up(&mut self) -> DomainResult<()> {
            self.log.push("up".to_string());
            Ok(())
        }

        fn click(&mut self) -> DomainResult<()> {
            if self.fail_on_click {
                return Err(DomainError::Injection("click failed".to_string()));
            }
            self.log.push("click".to_string());
            Ok(())
        }

        fn double_click(&mut self) -> DomainResult<()> {
            self.log.push("double".to_string());
            Ok(())
        }

        fn pause(&mut self, duration: Duration) {
            // テストでは実際に待機しない
            self.log.push(format!("pause({}ms)", duration.as_millis()));
        }

        fn screen_size(&self) -> DomainResult<(u32, u32)> {
            Ok((1920, 1080))
        }
    }

    #[test]
    fn test_apply_actions_in_order() {
        let mut pointer = RecordingPointer::default();
        let actions = [
            PointerAction::MoveTo { x: 10.0, y: 20.0 },
            PointerAction::Click,
            PointerAction::Pause(Duration::from_millis(200)),
        ];

        apply_actions(&mut pointer, &actions).unwrap();

        assert_eq!(pointer.log, vec!["move(10,20)", "click", "pause(200ms)"]);
    }

    #[test]
    fn test_apply_actions_stops_on_error() {
        let mut pointer = RecordingPointer {
            fail_on_click: true,
            ..Default::default()
        };
        let actions = [
            PointerAction::ButtonDown,
            PointerAction::Click,
            PointerAction::ButtonUp,
        ];

        let result = apply_actions(&mut pointer, &actions);

        assert!(matches!(result, Err(DomainError::Injection(_))));
        // 失敗した操作以降は実行されない
        assert_eq!(pointer.log, vec!["down"]);
    }
}
