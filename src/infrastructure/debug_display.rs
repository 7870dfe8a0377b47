//! デバッグ表示実装（minifb）
//!
//! DisplaySinkPortの実装。ミラー済みフレームをウィンドウに表示し、
//! タイトルバーに現在のジェスチャラベルとカーソル位置を出す。
//! `debug-display` フィーチャ有効時のみコンパイルされる。

use crate::domain::{DisplaySinkPort, DomainError, DomainResult, Frame, GestureLabel, ScreenPoint};
use minifb::{Window, WindowOptions};

/// minifbウィンドウへの表示
pub struct DebugDisplay {
    window: Window,
    /// 0x00RRGGBB形式のピクセルバッファ（毎フレーム再利用）
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl DebugDisplay {
    /// フレーム解像度に合わせたウィンドウを開く
    pub fn new(width: u32, height: u32) -> DomainResult<Self> {
        let width = width as usize;
        let height = height as usize;

        let window = Window::new(
            "handmouse (debug)",
            width,
            height,
            WindowOptions::default(),
        )
        .map_err(|e| DomainError::Initialization(format!("Failed to open window: {}", e)))?;

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    /// ウィンドウがまだ開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }
}

impl DisplaySinkPort for DebugDisplay {
    fn present(
        &mut self,
        frame: &Frame,
        label: GestureLabel,
        cursor: Option<ScreenPoint>,
    ) -> DomainResult<()> {
        if frame.width as usize != self.width || frame.height as usize != self.height {
            return Err(DomainError::Other(format!(
                "Frame size mismatch: expected {}x{}, got {}x{}",
                self.width, self.height, frame.width, frame.height
            )));
        }

        // RGB24 → 0x00RRGGBB
        for (dst, rgb) in self.buffer.iter_mut().zip(frame.data.chunks_exact(3)) {
            let r = rgb[0] as u32;
            let g = rgb[1] as u32;
            let b = rgb[2] as u32;
            *dst = (r << 16) | (g << 8) | b;
        }

        let title = match cursor {
            Some(p) => format!(
                "handmouse (debug) - {} - cursor ({:.0}, {:.0})",
                label.as_str(),
                p.x,
                p.y
            ),
            None => format!("handmouse (debug) - {}", label.as_str()),
        };
        self.window.set_title(&title);

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| DomainError::Other(format!("Failed to update window: {}", e)))
    }
}
