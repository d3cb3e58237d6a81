//! callkit-core
//!
//! Type-erased callables and a deferred work queue.
//!
//! # モジュール構成
//! - **signature**: シグネチャ抽出（ArgList, Callable, Functor, Method, SplitOff, Signature）
//! - **holder**: 型消去コンテナ（CallableBox）
//! - **queue**: 遅延実行キュー（DeferredQueue, QueueBuilder, QueuePhase）
//! - **observability**: キューのカウンタ（QueueStats）
//! - **error**: エラー型（CallError）

pub mod error;
pub mod holder;
pub mod observability;
pub mod queue;
pub mod signature;

pub use self::error::CallError;
pub use self::holder::CallableBox;
pub use self::observability::QueueStats;
pub use self::queue::{DeferredQueue, EntryId, QueueBuilder, QueueConfig, QueuePhase};
pub use self::signature::{ArgList, ByMut, ByRef, Callable, Functor, Method, Signature, SplitOff, TypeInfo};
