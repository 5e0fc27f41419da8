//! Traits over the Rust closures that can be registered as constructors and
//! functions.
//!
//! Each trait is implemented for closures of arity 0 to 6, so registration
//! methods can take closures directly and still know their argument tuple.

/// A closure that takes no receiver, such as a static function or a
/// constructor.
pub trait StaticFn<Args>: Send + Sync + 'static {
    /// Return type of the closure.
    type Output;

    /// Calls the closure with unpacked `args`.
    fn call(&self, args: Args) -> Self::Output;
}

/// A closure that takes a mutable receiver.
pub trait MethodFn<T, Args>: Send + Sync + 'static {
    /// Return type of the closure.
    type Output;

    /// Calls the closure on `receiver` with unpacked `args`.
    fn call(&self, receiver: &mut T, args: Args) -> Self::Output;
}

/// A closure that takes a shared receiver.
pub trait ConstMethodFn<T, Args>: Send + Sync + 'static {
    /// Return type of the closure.
    type Output;

    /// Calls the closure on `receiver` with unpacked `args`.
    fn call(&self, receiver: &T, args: Args) -> Self::Output;
}

macro_rules! closures {
    ($($name:ident),*) => {
        impl<Func, Ret, $($name),*> StaticFn<($($name,)*)> for Func
        where
            Func: Fn($($name),*) -> Ret + Send + Sync + 'static,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn call(&self, ($($name,)*): ($($name,)*)) -> Ret {
                self($($name),*)
            }
        }

        impl<Func, Ret, Recv, $($name),*> MethodFn<Recv, ($($name,)*)> for Func
        where
            Func: Fn(&mut Recv, $($name),*) -> Ret + Send + Sync + 'static,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn call(&self, receiver: &mut Recv, ($($name,)*): ($($name,)*)) -> Ret {
                self(receiver, $($name),*)
            }
        }

        impl<Func, Ret, Recv, $($name),*> ConstMethodFn<Recv, ($($name,)*)> for Func
        where
            Func: Fn(&Recv, $($name),*) -> Ret + Send + Sync + 'static,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn call(&self, receiver: &Recv, ($($name,)*): ($($name,)*)) -> Ret {
                self(receiver, $($name),*)
            }
        }
    };
}

closures!();
closures!(A);
closures!(A, B);
closures!(A, B, C);
closures!(A, B, C, D);
closures!(A, B, C, D, E);
closures!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use super::*;

    fn call_static<F: StaticFn<(i32, i32)>>(f: &F) -> F::Output {
        f.call((2, 3))
    }

    fn call_method<T, F: MethodFn<T, (i32,)>>(f: &F, receiver: &mut T) -> F::Output {
        f.call(receiver, (4,))
    }

    fn call_const<T, F: ConstMethodFn<T, ()>>(f: &F, receiver: &T) -> F::Output {
        f.call(receiver, ())
    }

    #[test]
    fn test_closures() {
        assert_eq!(call_static(&|a: i32, b: i32| a * b), 6);

        let mut total = 1i32;
        call_method(&|total: &mut i32, n: i32| *total += n, &mut total);
        assert_eq!(total, 5);

        assert_eq!(call_const(&|total: &i32| *total * 2, &total), 10);
    }
}
