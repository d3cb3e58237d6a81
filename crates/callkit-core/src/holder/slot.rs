//! Slot - 型消去された呼び出し口
//!
//! # 学習ポイント
//! - Object-safe trait（`ReturningView` / `DiscardingView`）
//! - Type erasure パターン (`StoredCall<Args, R, F>` → `dyn ErasedSlot`)
//! - 一つの値に二つのビュー（戻り値あり / 戻り値破棄）を実装する
//!
//! 引数と戻り値は `&mut dyn Any` 越しに `Option<Args>` / `Option<R>` として受け渡します。
//! シグネチャの照合は `CallableBox` 側で先に済ませ、ここでの downcast は最後の確認です。

use std::any::Any;
use std::marker::PhantomData;

use crate::signature::{ArgList, Signature};

/// 戻り値を呼び出し元へ返すビュー（`fn(Args..) -> R`）
pub(crate) trait ReturningView {
    fn returning_signature(&self) -> &Signature;

    /// `args` must be an `Option<Args>` holding the arguments and `out` an
    /// empty `Option<R>`. Returns `false` without calling when either
    /// payload has the wrong type.
    fn call_returning(&mut self, args: &mut dyn Any, out: &mut dyn Any) -> bool;
}

/// 戻り値を捨てるビュー（`fn(Args..)`）
pub(crate) trait DiscardingView {
    fn discarding_signature(&self) -> &Signature;

    /// Same contract as [`ReturningView::call_returning`] without an output slot.
    fn call_discarding(&mut self, args: &mut dyn Any) -> bool;
}

/// 二つのビューを同じ値で提供する
pub(crate) trait ErasedSlot: ReturningView + DiscardingView {}

impl<T: ReturningView + DiscardingView> ErasedSlot for T {}

/// 正規化された `FnMut(Args) -> R` を一つだけ保持する
pub(crate) struct StoredCall<Args, R, F> {
    func: F,
    returning: Signature,
    discarding: Signature,
    _marker: PhantomData<fn(Args) -> R>,
}

impl<Args, R, F> StoredCall<Args, R, F>
where
    Args: ArgList,
    R: 'static,
    F: FnMut(Args) -> R,
{
    pub(crate) fn new(func: F) -> Self {
        let returning = Signature::of::<Args, R>();
        let discarding = returning.without_output();
        Self {
            func,
            returning,
            discarding,
            _marker: PhantomData,
        }
    }
}

impl<Args, R, F> ReturningView for StoredCall<Args, R, F>
where
    Args: ArgList,
    R: 'static,
    F: FnMut(Args) -> R,
{
    fn returning_signature(&self) -> &Signature {
        &self.returning
    }

    fn call_returning(&mut self, args: &mut dyn Any, out: &mut dyn Any) -> bool {
        let Some(args) = args.downcast_mut::<Option<Args>>() else {
            return false;
        };
        let Some(out) = out.downcast_mut::<Option<R>>() else {
            return false;
        };
        let Some(args) = args.take() else {
            return false;
        };
        *out = Some((self.func)(args));
        true
    }
}

impl<Args, R, F> DiscardingView for StoredCall<Args, R, F>
where
    Args: ArgList,
    R: 'static,
    F: FnMut(Args) -> R,
{
    fn discarding_signature(&self) -> &Signature {
        &self.discarding
    }

    fn call_discarding(&mut self, args: &mut dyn Any) -> bool {
        let Some(args) = args.downcast_mut::<Option<Args>>() else {
            return false;
        };
        let Some(args) = args.take() else {
            return false;
        };
        (self.func)(args);
        true
    }
}
