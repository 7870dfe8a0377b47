//! handmouse - Library
//!
//! このライブラリは、バイナリターゲット（schema生成など）と
//! 統合テストでプロジェクトのモジュールにアクセスするために提供されています。

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;
