//! アプリケーション層
//!
//! ドメインのポートだけに依存するユースケース実装。
//! カーソル安定化・ジェスチャ認識・ティックループ制御を提供します。

pub mod gesture;
pub mod pipeline;
pub mod recovery;
pub mod runtime_state;
pub mod stabilizer;
pub mod stats;

pub use gesture::{GestureOutcome, GestureRecognizer};
pub use pipeline::{PipelineConfig, PipelineRunner, StopHandle, TickOutcome};
pub use recovery::{RecoveryState, RecoveryStrategy};
pub use runtime_state::{RuntimeSettings, Tuning};
pub use stabilizer::{CursorUpdate, MotionStabilizer};
pub use stats::{PercentileStats, StatKind, StatsCollector};
