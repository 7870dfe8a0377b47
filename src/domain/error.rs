/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - 「手が検出されない」はエラーではなく正常な状態（Option::Noneで表現）

use thiserror::Error;

/// Domain層の統一エラー型
#[derive(Error, Debug)]
pub enum DomainError {
    /// カメラ・フレーム取得関連のエラー
    #[error("Capture error: {0}")]
    Capture(String),

    /// ランドマーク検出関連のエラー
    #[error("Detection error: {0}")]
    Detection(String),

    /// カーソル注入（OS入力）関連のエラー
    #[error("Injection error: {0}")]
    Injection(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 初期化エラー
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// その他のエラー
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;
