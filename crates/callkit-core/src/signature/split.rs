//! Tuple splitting used to bind leading arguments.

/// Splits an argument tuple into a leading `Bound` part and the remaining `Rest`.
///
/// Implemented for every split point of tuples up to six elements, so
/// `(i32, String, bool): SplitOff<(i32,)>` has `Rest = (String, bool)`.
pub trait SplitOff<Bound>: Sized {
    type Rest: 'static;

    /// Rebuild the full tuple from its two halves.
    fn join(bound: Bound, rest: Self::Rest) -> Self;
}

macro_rules! impl_split_off {
    ([$($bound:ident),*] [$($rest:ident),*]) => {
        impl<$($bound,)* $($rest: 'static,)*> SplitOff<($($bound,)*)> for ($($bound,)* $($rest,)*) {
            type Rest = ($($rest,)*);

            #[allow(non_snake_case, clippy::unused_unit)]
            fn join(($($bound,)*): ($($bound,)*), ($($rest,)*): Self::Rest) -> Self {
                ($($bound,)* $($rest,)*)
            }
        }
    };
}

impl_split_off!([] []);
impl_split_off!([] [R1]);
impl_split_off!([] [R1, R2]);
impl_split_off!([] [R1, R2, R3]);
impl_split_off!([] [R1, R2, R3, R4]);
impl_split_off!([] [R1, R2, R3, R4, R5]);
impl_split_off!([] [R1, R2, R3, R4, R5, R6]);
impl_split_off!([B1] []);
impl_split_off!([B1] [R1]);
impl_split_off!([B1] [R1, R2]);
impl_split_off!([B1] [R1, R2, R3]);
impl_split_off!([B1] [R1, R2, R3, R4]);
impl_split_off!([B1] [R1, R2, R3, R4, R5]);
impl_split_off!([B1, B2] []);
impl_split_off!([B1, B2] [R1]);
impl_split_off!([B1, B2] [R1, R2]);
impl_split_off!([B1, B2] [R1, R2, R3]);
impl_split_off!([B1, B2] [R1, R2, R3, R4]);
impl_split_off!([B1, B2, B3] []);
impl_split_off!([B1, B2, B3] [R1]);
impl_split_off!([B1, B2, B3] [R1, R2]);
impl_split_off!([B1, B2, B3] [R1, R2, R3]);
impl_split_off!([B1, B2, B3, B4] []);
impl_split_off!([B1, B2, B3, B4] [R1]);
impl_split_off!([B1, B2, B3, B4] [R1, R2]);
impl_split_off!([B1, B2, B3, B4, B5] []);
impl_split_off!([B1, B2, B3, B4, B5] [R1]);
impl_split_off!([B1, B2, B3, B4, B5, B6] []);
