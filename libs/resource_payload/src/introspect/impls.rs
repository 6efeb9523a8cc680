//! [`Resource`] implementations for standard library types.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use super::{Kind, Resolved, Resource};
use crate::payload::Value;

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resource for $ty {
                fn resolve(&self) -> Resolved<'_> {
                    Resolved::Scalar(Value::from(*self))
                }

                fn type_name(&self) -> Option<&'static str> {
                    None
                }
            }
        )*
    };
}

impl_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char);

impl Resource for isize {
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Scalar(Value::Int(*self as i64))
    }

    fn type_name(&self) -> Option<&'static str> {
        None
    }
}

impl Resource for usize {
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Scalar(Value::Uint(*self as u64))
    }

    fn type_name(&self) -> Option<&'static str> {
        None
    }
}

impl Resource for str {
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Scalar(Value::from(self))
    }

    fn type_name(&self) -> Option<&'static str> {
        None
    }
}

impl Resource for String {
    fn resolve(&self) -> Resolved<'_> {
        Resolved::Scalar(Value::from(self.as_str()))
    }

    fn type_name(&self) -> Option<&'static str> {
        None
    }
}

// sequences

fn elements<'a, T>(iter: impl IntoIterator<Item = &'a T>) -> Resolved<'a>
where
    T: Resource + 'a,
{
    Resolved::Collection(iter.into_iter().map(|t| t as &dyn Resource).collect())
}

// empty collections can only be named statically
fn element_name<'a, T>(mut iter: impl Iterator<Item = &'a T>) -> Option<&'static str>
where
    T: Resource + 'a,
{
    T::record_name().or_else(|| iter.next().and_then(T::type_name))
}

macro_rules! impl_sequence {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Resource> Resource for $ty {
                fn resolve(&self) -> Resolved<'_> {
                    elements(self)
                }

                fn type_name(&self) -> Option<&'static str> {
                    element_name(self.iter())
                }

                fn record_name() -> Option<&'static str> {
                    T::record_name()
                }
            }
        )*
    };
}

impl_sequence!(Vec<T>, VecDeque<T>, LinkedList<T>);

impl<T: Resource, const N: usize> Resource for [T; N] {
    fn resolve(&self) -> Resolved<'_> {
        elements(self)
    }

    fn type_name(&self) -> Option<&'static str> {
        element_name(self.iter())
    }

    fn record_name() -> Option<&'static str> {
        T::record_name()
    }
}

impl<T: Resource> Resource for [T] {
    fn resolve(&self) -> Resolved<'_> {
        elements(self)
    }

    fn type_name(&self) -> Option<&'static str> {
        element_name(self.iter())
    }
}

// indirection
//
// the generic impls only cover sized targets so that `record_name` can look
// through them. unsized targets that are useful in practice, string slices,
// slices, and trait objects, are implemented separately below.

macro_rules! impl_indirection {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Resource> Resource for $ty {
                fn resolve(&self) -> Resolved<'_> {
                    (**self).resolve()
                }

                fn type_name(&self) -> Option<&'static str> {
                    (**self).type_name()
                }

                fn record_name() -> Option<&'static str> {
                    T::record_name()
                }
            }
        )*
    };
}

impl_indirection!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);

macro_rules! impl_unsized_indirection {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Resource for $ty {
                fn resolve(&self) -> Resolved<'_> {
                    (**self).resolve()
                }

                fn type_name(&self) -> Option<&'static str> {
                    (**self).type_name()
                }
            }
        )*
    };
}

impl_unsized_indirection!(
    &str,
    Box<str>,
    Rc<str>,
    Arc<str>,
    &dyn Resource,
    Box<dyn Resource>,
    Rc<dyn Resource>,
    Arc<dyn Resource>,
);

impl<T: Resource> Resource for &[T] {
    fn resolve(&self) -> Resolved<'_> {
        elements(*self)
    }

    fn type_name(&self) -> Option<&'static str> {
        element_name(self.iter())
    }

    fn record_name() -> Option<&'static str> {
        T::record_name()
    }
}

impl<T: Resource> Resource for Box<[T]> {
    fn resolve(&self) -> Resolved<'_> {
        elements(self.iter())
    }

    fn type_name(&self) -> Option<&'static str> {
        element_name(self.iter())
    }

    fn record_name() -> Option<&'static str> {
        T::record_name()
    }
}

impl<T> Resource for Cow<'_, T>
where
    T: Resource + ToOwned + ?Sized,
{
    fn resolve(&self) -> Resolved<'_> {
        (**self).resolve()
    }

    fn type_name(&self) -> Option<&'static str> {
        (**self).type_name()
    }
}

/// An empty option is a layer that cannot be unwrapped.
impl<T: Resource> Resource for Option<T> {
    fn resolve(&self) -> Resolved<'_> {
        match self {
            Some(value) => value.resolve(),
            None => Resolved::Unresolvable(std::any::type_name::<Self>()),
        }
    }

    fn type_name(&self) -> Option<&'static str> {
        match self {
            Some(value) => value.type_name(),
            None => T::record_name(),
        }
    }

    fn record_name() -> Option<&'static str> {
        T::record_name()
    }
}

// unsupported kinds

macro_rules! impl_unsupported {
    ($kind:ident => $($ty:ty $([$($gen:tt)*])?),* $(,)?) => {
        $(
            impl $(<$($gen)*>)? Resource for $ty {
                fn resolve(&self) -> Resolved<'_> {
                    Resolved::Unsupported(Kind::$kind)
                }

                fn type_name(&self) -> Option<&'static str> {
                    None
                }
            }
        )*
    };
}

impl_unsupported!(Map =>
    HashMap<K, V, S> [K, V, S],
    BTreeMap<K, V> [K, V],
    HashSet<T, S> [T, S],
    BTreeSet<T> [T],
);
impl_unsupported!(Pointer => *const T [T: ?Sized], *mut T [T: ?Sized]);
impl_unsupported!(Channel => Sender<T> [T], SyncSender<T> [T], Receiver<T> [T]);
impl_unsupported!(Function => fn() -> R [R], fn(A) -> R [A, R], fn(A, B) -> R [A, B, R]);
impl_unsupported!(Invalid => (), PhantomData<T> [T: ?Sized]);
