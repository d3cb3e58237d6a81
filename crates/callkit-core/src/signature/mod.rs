//! Signature - 呼び出し可能な値のシグネチャ抽出
//!
//! このモジュールは callable の「引数型リスト」と「戻り値型」を静的に取り出し、
//! 実行時に比較できる `Signature` タグへ変換します。
//!
//! # 二つの正規形
//! - **戻り値あり**: `fn(Args..) -> R` (`Signature::of`)
//! - **戻り値破棄**: `fn(Args..)` (`Signature::discarding`)
//!
//! # 対応する形
//! - fn item / fn pointer / closure → `Callable<Args>`
//! - 関数オブジェクト → `Functor`
//! - レシーバ付きメソッド → `Method<Recv, Args, Ret, Marker>`
//! - 先頭引数の束縛（カリー化） → `SplitOff<Bound>`
//!
//! 非対応の形（`'static` でない引数型、引数 7 個以上など）はコンパイルエラーになります。

pub mod callable;
pub mod method;
pub mod split;

pub use self::callable::{Callable, Functor};
pub use self::method::{ByMut, ByRef, Method};
pub use self::split::SplitOff;

use std::any::{TypeId, type_name};
use std::fmt;

use serde::Serialize;

/// One semantic type: its `TypeId` plus a readable name.
///
/// Equality looks at the `TypeId` only; the name is for messages.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeInfo {
    #[serde(skip)]
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 引数タプルの型リスト
///
/// 0〜6 要素の `'static` なタプルに実装されています。
pub trait ArgList: 'static {
    fn type_infos() -> Vec<TypeInfo>;
}

macro_rules! impl_arg_list {
    ($($arg:ident),*) => {
        impl<$($arg: 'static),*> ArgList for ($($arg,)*) {
            fn type_infos() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$arg>()),*]
            }
        }
    };
}

impl_arg_list!();
impl_arg_list!(A1);
impl_arg_list!(A1, A2);
impl_arg_list!(A1, A2, A3);
impl_arg_list!(A1, A2, A3, A4);
impl_arg_list!(A1, A2, A3, A4, A5);
impl_arg_list!(A1, A2, A3, A4, A5, A6);

/// Signature は callable の呼び出し契約
///
/// - `args`: 引数型の並び
/// - `output`: 戻り値型（`None` は「戻り値を破棄する」正規形）
///
/// 構築後は不変です。比較は `TypeId` 単位で厳密に行います。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    args: Vec<TypeInfo>,
    output: Option<TypeInfo>,
}

impl Signature {
    /// 戻り値ありの正規形 `fn(Args..) -> R`
    pub fn of<Args: ArgList, R: 'static>() -> Self {
        Self {
            args: Args::type_infos(),
            output: Some(TypeInfo::of::<R>()),
        }
    }

    /// 戻り値破棄の正規形 `fn(Args..)`
    pub fn discarding<Args: ArgList>() -> Self {
        Self {
            args: Args::type_infos(),
            output: None,
        }
    }

    /// Same argument list, output dropped.
    pub fn without_output(&self) -> Self {
        Self {
            args: self.args.clone(),
            output: None,
        }
    }

    pub fn args(&self) -> &[TypeInfo] {
        &self.args
    }

    pub fn output(&self) -> Option<&TypeInfo> {
        self.output.as_ref()
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_discarding(&self) -> bool {
        self.output.is_none()
    }

    /// 引数型リストだけを比較する（戻り値は見ない）
    pub fn same_args(&self, other: &Signature) -> bool {
        self.args == other.args
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")?;
        if let Some(output) = &self.output {
            write!(f, " -> {output}")?;
        }
        Ok(())
    }
}
