//! Callable / Functor - 呼び出し契約の抽出
//!
//! # 学習ポイント
//! - タプルを引数リストとして扱う blanket impl（arity ごとにマクロで生成）
//! - 関連型 `Output` による戻り値型の取り出し
//! - stable Rust では `Fn*` を自作型に実装できないので、関数オブジェクトは `Functor` で表す

/// `Callable<Args>` は「引数タプル `Args` を受け取って `Output` を返す」もの
///
/// fn item、fn pointer、closure はすべて blanket impl で対応します。
///
/// ```ignore
/// fn add(a: i32, b: i32) -> i32 { a + b }
/// // add: Callable<(i32, i32), Output = i32>
///
/// let mut total = 0;
/// let push = move |n: i32| { total += n; total };
/// // push: Callable<(i32,), Output = i32>
/// ```
///
/// closure の引数型は注釈が必要です（`|a: i32, b: i32| ...`）。
pub trait Callable<Args>: 'static {
    type Output: 'static;

    fn call(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg),*> Callable<($($arg,)*)> for Func
        where
            Func: FnMut($($arg),*) -> Ret + 'static,
            Ret: 'static,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn call(&mut self, ($($arg,)*): ($($arg,)*)) -> Ret {
                (self)($($arg),*)
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);

/// Functor は単一の呼び出し演算子を持つ関数オブジェクト
///
/// # 使用例
/// ```ignore
/// struct Ticker { count: u32 }
///
/// impl Functor for Ticker {
///     type Args = ();
///     type Output = u32;
///
///     fn call(&mut self, (): ()) -> u32 {
///         self.count += 1;
///         self.count
///     }
/// }
/// ```
pub trait Functor: 'static {
    type Args;
    type Output: 'static;

    fn call(&mut self, args: Self::Args) -> Self::Output;
}
