//! Method - レシーバ付きメソッドの呼び出し契約
//!
//! メソッドの呼び出し契約にはレシーバが暗黙に含まれるため、
//! シグネチャを使う前にレシーバと組み合わせる必要があります。
//! `Marker`（`ByRef` / `ByMut`）で `&self` と `&mut self` を区別します。

use std::marker::PhantomData;

/// `&self` receiver.
pub struct ByRef;

/// `&mut self` receiver.
pub struct ByMut;

/// `Method<Recv, Args, Ret, Marker>` は「`Recv` に対して `Args` で呼べて `Ret` を返すメソッド」
///
/// ```ignore
/// struct Greeter { x: i32 }
///
/// impl Greeter {
///     fn print(&self, p: i32) -> String { format!("{} {}", self.x, p) }
///     fn bump(&mut self, by: i32) -> i32 { self.x += by; self.x }
/// }
///
/// // Greeter::print: Method<Greeter, (i32,), String, ByRef>
/// // Greeter::bump:  Method<Greeter, (i32,), i32, ByMut>
/// ```
///
/// 戻り値型は関連型ではなく型パラメータ `Ret` です（`&Recv` が higher-ranked なため）。
pub trait Method<Recv, Args, Ret, Marker>: 'static {
    fn call_on(&mut self, receiver: &mut Recv, args: Args) -> Ret;
}

macro_rules! impl_method {
    ($($arg:ident),*) => {
        impl<Func, Recv, Ret, $($arg),*> Method<Recv, ($($arg,)*), Ret, ByRef> for Func
        where
            Func: FnMut(&Recv, $($arg),*) -> Ret + 'static,
        {
            #[allow(non_snake_case)]
            fn call_on(&mut self, receiver: &mut Recv, ($($arg,)*): ($($arg,)*)) -> Ret {
                (self)(&*receiver, $($arg),*)
            }
        }

        impl<Func, Recv, Ret, $($arg),*> Method<Recv, ($($arg,)*), Ret, ByMut> for Func
        where
            Func: FnMut(&mut Recv, $($arg),*) -> Ret + 'static,
        {
            #[allow(non_snake_case)]
            fn call_on(&mut self, receiver: &mut Recv, ($($arg,)*): ($($arg,)*)) -> Ret {
                (self)(receiver, $($arg),*)
            }
        }
    };
}

impl_method!();
impl_method!(A1);
impl_method!(A1, A2);
impl_method!(A1, A2, A3);
impl_method!(A1, A2, A3, A4);
impl_method!(A1, A2, A3, A4, A5);
impl_method!(A1, A2, A3, A4, A5, A6);

/// A method together with the receiver it was bound to.
///
/// The receiver is owned; calls borrow it for the duration of the call only.
pub struct BoundMethod<Recv, M, Args, Ret, Marker> {
    receiver: Recv,
    method: M,
    _marker: PhantomData<fn(Args, Marker) -> Ret>,
}

impl<Recv, M, Args, Ret, Marker> BoundMethod<Recv, M, Args, Ret, Marker>
where
    M: Method<Recv, Args, Ret, Marker>,
{
    pub fn new(receiver: Recv, method: M) -> Self {
        Self {
            receiver,
            method,
            _marker: PhantomData,
        }
    }

    pub fn call(&mut self, args: Args) -> Ret {
        self.method.call_on(&mut self.receiver, args)
    }

    pub fn receiver(&self) -> &Recv {
        &self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter {
        x: i32,
    }

    impl Greeter {
        fn print(&self, p: i32) -> String {
            format!("greeter {} {}", self.x, p)
        }

        fn bump(&mut self, by: i32) -> i32 {
            self.x += by;
            self.x
        }

        fn reset(&mut self) {
            self.x = 0;
        }
    }

    #[test]
    fn shared_method_leaves_receiver_untouched() {
        let mut bound = BoundMethod::new(Greeter { x: 8955 }, Greeter::print);
        assert_eq!(bound.call((2222,)), "greeter 8955 2222");
        assert_eq!(bound.receiver().x, 8955);
    }

    #[test]
    fn mutable_method_updates_owned_receiver() {
        let mut bound = BoundMethod::new(Greeter { x: 1 }, Greeter::bump);
        bound.call((2,));
        assert_eq!(bound.call((3,)), 6);
        assert_eq!(bound.receiver().x, 6);
    }

    #[test]
    fn zero_argument_method() {
        let mut bound = BoundMethod::new(Greeter { x: 42 }, Greeter::reset);
        bound.call(());
        assert_eq!(bound.receiver().x, 0);
    }
}
