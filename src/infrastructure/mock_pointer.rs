//! モックポインタ実装
//!
//! PointerPortのモック。OSに注入する代わりに操作列を記録します。
//! 統合テストおよびOS入力が使えない環境でのドライラン用。

use crate::domain::{DomainResult, PointerAction, PointerPort};
use std::time::Duration;

/// 操作を記録するポインタ
pub struct MockPointer {
    actions: Vec<PointerAction>,
    screen: (u32, u32),
}

impl MockPointer {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            screen: (1920, 1080),
        }
    }

    /// スクリーン解像度を指定して作成
    pub fn with_screen(width: u32, height: u32) -> Self {
        Self {
            actions: Vec::new(),
            screen: (width, height),
        }
    }

    /// 記録された操作列を取得
    pub fn actions(&self) -> &[PointerAction] {
        &self.actions
    }

    /// 記録をクリア
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl Default for MockPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerPort for MockPointer {
    fn move_to(&mut self, x: f64, y: f64) -> DomainResult<()> {
        self.actions.push(PointerAction::MoveTo { x, y });
        Ok(())
    }

    fn button_down(&mut self) -> DomainResult<()> {
        self.actions.push(PointerAction::ButtonDown);
        Ok(())
    }

    fn button_up(&mut self) -> DomainResult<()> {
        self.actions.push(PointerAction::ButtonUp);
        Ok(())
    }

    fn click(&mut self) -> DomainResult<()> {
        self.actions.push(PointerAction::Click);
        Ok(())
    }

    fn double_click(&mut self) -> DomainResult<()> {
        self.actions.push(PointerAction::DoubleClick);
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        // 記録のみ。実際には待機しない
        self.actions.push(PointerAction::Pause(duration));
    }

    fn screen_size(&self) -> DomainResult<(u32, u32)> {
        Ok(self.screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pointer_records_in_order() {
        let mut pointer = MockPointer::new();
        pointer.move_to(100.0, 200.0).unwrap();
        pointer.button_down().unwrap();
        pointer.button_up().unwrap();

        assert_eq!(
            pointer.actions(),
            &[
                PointerAction::MoveTo { x: 100.0, y: 200.0 },
                PointerAction::ButtonDown,
                PointerAction::ButtonUp,
            ]
        );
    }

    #[test]
    fn test_mock_pointer_screen_size() {
        let pointer = MockPointer::with_screen(2560, 1440);
        assert_eq!(pointer.screen_size().unwrap(), (2560, 1440));
    }
}
