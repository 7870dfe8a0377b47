//! OSポインタ実装（enigo）
//!
//! PointerPortの実装。enigo経由でOSのマウスカーソルを移動させ、
//! 左ボタンの押下・解放・クリックを注入します。

use crate::domain::{DomainError, DomainResult, PointerPort};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::time::Duration;

/// enigoによるポインタ注入
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    /// OSの入力システムに接続する
    pub fn new() -> DomainResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| {
            DomainError::Initialization(format!("Failed to initialize input system: {}", e))
        })?;

        Ok(Self { enigo })
    }
}

impl PointerPort for EnigoPointer {
    fn move_to(&mut self, x: f64, y: f64) -> DomainResult<()> {
        self.enigo
            .move_mouse(x as i32, y as i32, Coordinate::Abs)
            .map_err(|e| DomainError::Injection(format!("Failed to move cursor: {}", e)))
    }

    fn button_down(&mut self) -> DomainResult<()> {
        self.enigo
            .button(Button::Left, Direction::Press)
            .map_err(|e| DomainError::Injection(format!("Failed to press button: {}", e)))
    }

    fn button_up(&mut self) -> DomainResult<()> {
        self.enigo
            .button(Button::Left, Direction::Release)
            .map_err(|e| DomainError::Injection(format!("Failed to release button: {}", e)))
    }

    fn click(&mut self) -> DomainResult<()> {
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| DomainError::Injection(format!("Failed to click: {}", e)))
    }

    fn double_click(&mut self) -> DomainResult<()> {
        // OSのダブルクリック間隔内に収まるよう連続クリックする
        self.click()?;
        self.click()
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn screen_size(&self) -> DomainResult<(u32, u32)> {
        let (width, height) = self
            .enigo
            .main_display()
            .map_err(|e| DomainError::Injection(format!("Failed to query display size: {}", e)))?;

        Ok((width as u32, height as u32))
    }
}
