//! Holder - 任意のシグネチャの callable を保持する型消去コンテナ
//!
//! # 二層構造
//! - **表層（Typed）**: `Callable<Args>`, `Functor`, `Method` - 構築時に型が決まる
//! - **内部（Dyn）**: `ErasedSlot` - object-safe, type erasure
//!
//! 呼び出し時は要求されたシグネチャを保持中のシグネチャと `TypeId` 単位で比較し、
//! 一致しなければ callable を一切実行せずに `CallError::ArgumentTypeMismatch` を返します。

mod slot;

use std::fmt;

use tracing::{debug, trace};

use self::slot::{DiscardingView, ErasedSlot, ReturningView, StoredCall};
use crate::error::CallError;
use crate::signature::method::BoundMethod;
use crate::signature::{ArgList, Callable, Functor, Method, Signature, SplitOff, TypeInfo};

/// CallableBox は一つの callable を所有し、二つのビュー越しに呼び出す
///
/// # 使用例
/// ```ignore
/// fn add(a: i32, b: i32) -> i32 { a + b }
///
/// let mut holder = CallableBox::new(add);
/// assert_eq!(holder.invoke_typed::<i32, _>((2, 3))?, 5);
/// holder.invoke((2, 3))?; // 戻り値は捨てる
///
/// // 型が合わない呼び出しは実行されない
/// assert!(holder.invoke((2_i64, 3_i64)).is_err());
/// ```
///
/// # 構築方法
/// - `new(callable)`: fn item / fn pointer / closure
/// - `from_functor(functor)`: 関数オブジェクト
/// - `bind(callable, (a, b))`: 先頭引数を束縛（カリー化）
/// - `bind_method(receiver, Type::method)`: レシーバを束縛したメソッド
pub struct CallableBox {
    slot: Box<dyn ErasedSlot>,
}

impl CallableBox {
    pub fn new<C, Args>(callable: C) -> Self
    where
        C: Callable<Args>,
        Args: ArgList,
    {
        let mut callable = callable;
        Self::from_fn(move |args: Args| callable.call(args))
    }

    pub fn from_functor<T>(functor: T) -> Self
    where
        T: Functor,
        T::Args: ArgList,
    {
        let mut functor = functor;
        Self::from_fn(move |args: T::Args| functor.call(args))
    }

    /// Bind the leading arguments of `callable`.
    ///
    /// `bound` is cloned into every call; the stored signature only lists the
    /// remaining arguments.
    ///
    /// ```ignore
    /// let mut greet = CallableBox::bind(log_line, (String::from("main"),));
    /// greet.invoke((42,))?; // log_line("main".into(), 42)
    /// ```
    pub fn bind<C, Full, Bound>(callable: C, bound: Bound) -> Self
    where
        C: Callable<Full>,
        Full: SplitOff<Bound> + 'static,
        <Full as SplitOff<Bound>>::Rest: ArgList,
        Bound: Clone + 'static,
    {
        let mut callable = callable;
        Self::from_fn(move |rest: <Full as SplitOff<Bound>>::Rest| {
            callable.call(Full::join(bound.clone(), rest))
        })
    }

    /// Take ownership of `receiver` and bind it as the implicit first argument of `method`.
    pub fn bind_method<Recv, M, Args, Ret, Marker>(receiver: Recv, method: M) -> Self
    where
        Recv: 'static,
        M: Method<Recv, Args, Ret, Marker>,
        Args: ArgList,
        Ret: 'static,
        Marker: 'static,
    {
        let mut bound = BoundMethod::new(receiver, method);
        Self::from_fn(move |args: Args| bound.call(args))
    }

    fn from_fn<Args, R, F>(func: F) -> Self
    where
        Args: ArgList,
        R: 'static,
        F: FnMut(Args) -> R + 'static,
    {
        let slot = StoredCall::new(func);
        trace!(signature = %slot.returning_signature(), "callable stored");
        Self {
            slot: Box::new(slot),
        }
    }

    /// 構築時に確定した戻り値ありシグネチャ
    pub fn signature(&self) -> &Signature {
        self.slot.returning_signature()
    }

    /// Would `invoke` accept arguments of type `Args`?
    pub fn accepts<Args: ArgList>(&self) -> bool {
        self.slot.discarding_signature() == &Signature::discarding::<Args>()
    }

    /// Does the stored callable return `R`?
    pub fn returns<R: 'static>(&self) -> bool {
        self.signature().output() == Some(&TypeInfo::of::<R>())
    }

    /// 戻り値を捨てて呼び出す
    ///
    /// 引数型リストが完全に一致した場合のみ実行します。
    pub fn invoke<Args: ArgList>(&mut self, args: Args) -> Result<(), CallError> {
        let requested = Signature::discarding::<Args>();
        if self.slot.discarding_signature() != &requested {
            return Err(self.reject(requested));
        }

        let mut payload = Some(args);
        if !self.slot.call_discarding(&mut payload) {
            return Err(self.reject(requested));
        }
        trace!(signature = %self.signature(), "invoked");
        Ok(())
    }

    /// 戻り値を `R` として受け取って呼び出す
    ///
    /// `fn(Args..) -> R` 全体が完全に一致した場合のみ実行します。
    pub fn invoke_typed<R, Args>(&mut self, args: Args) -> Result<R, CallError>
    where
        R: 'static,
        Args: ArgList,
    {
        let requested = Signature::of::<Args, R>();
        if self.slot.returning_signature() != &requested {
            return Err(self.reject(requested));
        }

        let mut payload = Some(args);
        let mut out: Option<R> = None;
        if !self.slot.call_returning(&mut payload, &mut out) {
            return Err(self.reject(requested));
        }
        trace!(signature = %self.signature(), "invoked typed");
        out.ok_or_else(|| self.reject(requested))
    }

    fn reject(&self, requested: Signature) -> CallError {
        let expected = if requested.is_discarding() {
            self.slot.discarding_signature()
        } else {
            self.slot.returning_signature()
        };
        debug!(%expected, %requested, "rejected call with mismatched signature");
        CallError::mismatch(expected, requested)
    }
}

impl fmt::Debug for CallableBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableBox")
            .field("signature", &self.signature().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tracing_test::traced_test;

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    fn tagged(a: i32, b: i32, text: String) -> u64 {
        (a as u64) + (b as u64) + text.len() as u64
    }

    struct Receiver {
        x: i32,
        seen: Rc<RefCell<Vec<(i32, i32)>>>,
    }

    impl Receiver {
        fn print(&self, p: i32) -> String {
            self.seen.borrow_mut().push((self.x, p));
            String::from("ret_from_receiver_print")
        }

        fn bump(&mut self, by: i32) -> i32 {
            self.x += by;
            self.x
        }
    }

    struct Beeper {
        id: u32,
        beeps: Rc<Cell<u32>>,
    }

    impl Functor for Beeper {
        type Args = ();
        type Output = ();

        fn call(&mut self, (): ()) {
            assert_eq!(self.id, 123654);
            self.beeps.set(self.beeps.get() + 1);
        }
    }

    fn counting_add(hits: Rc<Cell<u32>>) -> CallableBox {
        CallableBox::new(move |a: i32, b: i32| {
            hits.set(hits.get() + 1);
            a + b
        })
    }

    #[test]
    fn free_function_returns_its_result() {
        let mut holder = CallableBox::new(add);
        assert_eq!(holder.invoke_typed::<i32, _>((2, 3)), Ok(5));
        assert_eq!(holder.signature().to_string(), "fn(i32, i32) -> i32");
    }

    #[test]
    fn invoke_and_invoke_typed_have_the_same_side_effects() {
        let hits = Rc::new(Cell::new(0));
        let mut holder = counting_add(hits.clone());

        holder.invoke((1, 12)).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(holder.invoke_typed::<i32, _>((1, 12)).unwrap(), 13);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn owned_string_argument_and_wide_return() {
        let mut holder = CallableBox::new(tagged);
        let ret = holder
            .invoke_typed::<u64, _>((123, 3211, String::from("another text")))
            .unwrap();
        assert_eq!(ret, 123 + 3211 + 12);
        holder
            .invoke((123, 3211, String::from("another text")))
            .unwrap();
    }

    #[test]
    fn bound_method_leaves_receiver_unchanged() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let receiver = Receiver {
            x: 8955,
            seen: seen.clone(),
        };
        let mut holder = CallableBox::bind_method(receiver, Receiver::print);

        holder.invoke((2222,)).unwrap();
        let ret = holder.invoke_typed::<String, _>((7531,)).unwrap();

        assert_eq!(ret, "ret_from_receiver_print");
        assert_eq!(*seen.borrow(), vec![(8955, 2222), (8955, 7531)]);
    }

    #[test]
    fn mutable_method_state_lives_in_the_box() {
        let receiver = Receiver {
            x: 0,
            seen: Rc::new(RefCell::new(Vec::new())),
        };
        let mut holder = CallableBox::bind_method(receiver, Receiver::bump);

        holder.invoke((5,)).unwrap();
        assert_eq!(holder.invoke_typed::<i32, _>((5,)), Ok(10));
    }

    #[test]
    fn curried_leading_argument() {
        let mut holder = CallableBox::bind(add, (1,));
        assert_eq!(holder.signature().to_string(), "fn(i32) -> i32");
        assert_eq!(holder.invoke_typed::<i32, _>((12,)), Ok(13));
        assert_eq!(holder.invoke_typed::<i32, _>((20,)), Ok(21));
    }

    #[test]
    fn fully_bound_call_takes_no_arguments() {
        let mut holder = CallableBox::bind(tagged, (1, 2, String::from("abc")));
        assert!(holder.accepts::<()>());
        assert_eq!(holder.invoke_typed::<u64, _>(()), Ok(6));
    }

    #[test]
    fn closure_with_unit_return() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let mut holder = CallableBox::new(move || sink.borrow_mut().push("lambda function called"));

        holder.invoke(()).unwrap();
        holder.invoke_typed::<(), _>(()).unwrap();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn functor_without_arguments_rejects_one_argument() {
        let beeps = Rc::new(Cell::new(0));
        let mut holder = CallableBox::from_functor(Beeper {
            id: 123654,
            beeps: beeps.clone(),
        });

        holder.invoke(()).unwrap();
        assert_eq!(beeps.get(), 1);

        let err = holder.invoke((123,)).unwrap_err();
        assert!(matches!(err, CallError::ArgumentTypeMismatch { .. }));
        assert_eq!(beeps.get(), 1);
    }

    #[rstest]
    #[case::too_few(|h: &mut CallableBox| h.invoke((1,)))]
    #[case::too_many(|h: &mut CallableBox| h.invoke((1, 2, 3)))]
    #[case::element_type(|h: &mut CallableBox| h.invoke((1_i64, 2_i64)))]
    #[case::swapped_types(|h: &mut CallableBox| h.invoke((1_u8, 2)))]
    #[case::wrong_return(|h: &mut CallableBox| h.invoke_typed::<u32, _>((1, 2)).map(drop))]
    #[case::unit_return(|h: &mut CallableBox| h.invoke_typed::<(), _>((1, 2)))]
    #[case::right_return_wrong_args(|h: &mut CallableBox| h.invoke_typed::<i32, _>((1,)).map(drop))]
    fn mismatched_calls_never_run(#[case] call: fn(&mut CallableBox) -> Result<(), CallError>) {
        let hits = Rc::new(Cell::new(0));
        let mut holder = counting_add(hits.clone());

        let err = call(&mut holder).unwrap_err();

        assert!(matches!(err, CallError::ArgumentTypeMismatch { .. }));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn mismatch_error_names_both_signatures() {
        let mut holder = CallableBox::new(add);
        let err = holder.invoke_typed::<String, _>((2, 3)).unwrap_err();
        assert_eq!(
            err,
            CallError::ArgumentTypeMismatch {
                expected: Signature::of::<(i32, i32), i32>(),
                requested: Signature::of::<(i32, i32), String>(),
            }
        );

        let err = holder.invoke((2,)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument type mismatch: holder expects `fn(i32, i32)`, call requested `fn(i32)`"
        );
    }

    #[test]
    fn introspection_helpers() {
        let holder = CallableBox::new(add);
        assert!(holder.accepts::<(i32, i32)>());
        assert!(!holder.accepts::<(i32,)>());
        assert!(holder.returns::<i32>());
        assert!(!holder.returns::<()>());
        assert_eq!(
            format!("{holder:?}"),
            "CallableBox { signature: \"fn(i32, i32) -> i32\" }"
        );
    }

    #[traced_test]
    #[test]
    fn rejected_call_is_logged() {
        let mut holder = CallableBox::new(add);
        let _ = holder.invoke(("two", "three"));
        assert!(logs_contain("rejected call with mismatched signature"));
    }
}
