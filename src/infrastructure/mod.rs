//! インフラストラクチャ層
//!
//! Domain層のポートに対する具体実装。
//! Webカメラ（nokhwa）・OSポインタ（enigo）・デバッグ表示（minifb）と、
//! テスト・ドライラン用のモック実装を提供します。

pub mod camera;
#[cfg(feature = "debug-display")]
pub mod debug_display;
pub mod mock_detector;
pub mod mock_pointer;
pub mod pointer;

pub use camera::CameraFrameSource;
#[cfg(feature = "debug-display")]
pub use debug_display::DebugDisplay;
pub use mock_detector::MockHandDetector;
pub use mock_pointer::MockPointer;
pub use pointer::EnigoPointer;
