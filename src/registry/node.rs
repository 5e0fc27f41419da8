//! The records stored in the registry.
//!
//! A [`TypeNode`] owns every member declared on a type. Members refer to other
//! types through their static [`TypeInfo`], never through another node, so
//! removing a type from the registry never leaves anything dangling.
//!
//! Behavior is stored as boxed closures captured at registration time. Each
//! closure kind gets a newtype whose constructor spells out the exact
//! signature, so closures passed to it get their higher-ranked signature
//! inferred.

use alloc::{boxed::Box, vec::Vec};

use metagraph_internals::{RawValueMut, RawValueRef, RawValueSync, TypeInfo};

use crate::{Any, ArgList, Handle, Id, Policy, Registry};

/// Everything registered about one type.
pub(crate) struct TypeNode {
    pub(crate) info: &'static TypeInfo,
    pub(crate) id: Option<Id>,
    pub(crate) props: Vec<PropNode>,
    pub(crate) bases: Vec<BaseNode>,
    pub(crate) convs: Vec<ConvNode>,
    pub(crate) ctors: Vec<CtorNode>,
    pub(crate) dtor: Option<DtorNode>,
    pub(crate) data: Vec<DataNode>,
    pub(crate) funcs: Vec<FuncNode>,
}

impl TypeNode {
    pub(crate) fn new(info: &'static TypeInfo) -> Self {
        Self {
            info,
            id: None,
            props: Vec::new(),
            bases: Vec::new(),
            convs: Vec::new(),
            ctors: Vec::new(),
            dtor: None,
            data: Vec::new(),
            funcs: Vec::new(),
        }
    }
}

/// Selects one member list of a node, for searches through the base graph.
pub(crate) type List<N> = fn(&TypeNode) -> &[N];

pub(crate) fn props(node: &TypeNode) -> &[PropNode] {
    &node.props
}

pub(crate) fn bases(node: &TypeNode) -> &[BaseNode] {
    &node.bases
}

pub(crate) fn convs(node: &TypeNode) -> &[ConvNode] {
    &node.convs
}

pub(crate) fn ctors(node: &TypeNode) -> &[CtorNode] {
    &node.ctors
}

pub(crate) fn data(node: &TypeNode) -> &[DataNode] {
    &node.data
}

pub(crate) fn funcs(node: &TypeNode) -> &[FuncNode] {
    &node.funcs
}

/// A key/value pair attached to a type or a member.
pub(crate) struct PropNode {
    pub(crate) key: RawValueSync,
    pub(crate) value: RawValueSync,
}

/// Projects a value of the derived type to its embedded base.
pub(crate) type Upcast = for<'a> fn(RawValueRef<'a>) -> Option<RawValueRef<'a>>;

/// Mutable counterpart of [`Upcast`].
pub(crate) type UpcastMut = for<'a> fn(RawValueMut<'a>) -> Option<RawValueMut<'a>>;

pub(crate) struct BaseNode {
    pub(crate) target: &'static TypeInfo,
    pub(crate) upcast: Upcast,
    pub(crate) upcast_mut: UpcastMut,
}

pub(crate) struct ConvNode {
    pub(crate) target: &'static TypeInfo,
    pub(crate) convert: ConvertFn,
}

pub(crate) struct CtorNode {
    pub(crate) signature: Signature,
    pub(crate) construct: ConstructFn,
    pub(crate) props: Vec<PropNode>,
}

pub(crate) struct DtorNode {
    pub(crate) destroy: DestroyFn,
}

pub(crate) struct DataNode {
    pub(crate) id: Id,
    pub(crate) is_const: bool,
    pub(crate) is_static: bool,
    pub(crate) ty: &'static TypeInfo,
    pub(crate) policy: Policy,
    /// Whether the getter can hand out an alias of the data.
    pub(crate) aliasable: bool,
    pub(crate) get: GetFn,
    pub(crate) set: SetFn,
    pub(crate) props: Vec<PropNode>,
}

pub(crate) struct FuncNode {
    pub(crate) id: Id,
    pub(crate) is_const: bool,
    pub(crate) is_static: bool,
    pub(crate) ret: &'static TypeInfo,
    pub(crate) signature: Signature,
    pub(crate) policy: Policy,
    /// Whether the function returns a reference that can be aliased.
    pub(crate) aliasable: bool,
    pub(crate) invoke: InvokeFn,
    pub(crate) props: Vec<PropNode>,
}

/// The argument types of a constructor or function.
#[derive(Clone, Copy)]
pub(crate) struct Signature {
    pub(crate) arity: usize,
    pub(crate) arg: fn(usize) -> Option<&'static TypeInfo>,
}

impl Signature {
    pub(crate) fn of<Args: ArgList>() -> Self {
        Self {
            arity: Args::ARITY,
            arg: Args::arg,
        }
    }

    pub(crate) fn args(self) -> impl ExactSizeIterator<Item = Option<&'static TypeInfo>> {
        (0..self.arity).map(move |index| (self.arg)(index))
    }

    pub(crate) fn same_as(self, other: Self) -> bool {
        self.arity == other.arity && self.args().eq(other.args())
    }
}

macro_rules! strategy {
    ($(#[$meta:meta])* $name:ident = $($signature:tt)+) => {
        $(#[$meta])*
        pub(crate) struct $name(Box<dyn $($signature)+ + Send + Sync>);

        impl $name {
            pub(crate) fn new<F>(f: F) -> Self
            where
                F: $($signature)+ + Send + Sync + 'static,
            {
                Self(Box::new(f))
            }
        }

        impl core::ops::Deref for $name {
            type Target = dyn $($signature)+ + Send + Sync;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }
    };
}

strategy!(
    /// Converts a value of the source type to an owned value of the target.
    ConvertFn = for<'r> Fn(&'r Registry, RawValueRef<'_>) -> Any<'r, 'static>
);
strategy!(
    /// Builds an owned value from arguments.
    ConstructFn = for<'r> Fn(&'r Registry, &mut [Any<'r, '_>]) -> Any<'r, 'static>
);
strategy!(
    /// Runs the destructor hook on a value of exactly the owning type.
    DestroyFn = Fn(Handle<'_>) -> bool
);
strategy!(
    /// Calls a function on a receiver.
    InvokeFn = for<'r, 'h> Fn(&'r Registry, Handle<'h>, &mut [Any<'r, '_>]) -> Any<'r, 'h>
);
strategy!(
    /// Reads data from a receiver, at an index for array data.
    GetFn = for<'r, 'h> Fn(&'r Registry, Handle<'h>, Option<usize>, Policy) -> Any<'r, 'h>
);
strategy!(
    /// Writes data of a receiver, at an index for array data.
    SetFn = Fn(&Registry, Handle<'_>, Option<usize>, &mut Any<'_, '_>) -> bool
);
