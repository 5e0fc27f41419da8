//! Inline-or-boxed storage for a single value.
//!
//! This module encapsulates the layout decision of [`Storage`]: a value whose
//! size and alignment fit a machine word is written directly into the storage
//! buffer, any other value is moved into a [`Box`] and the storage keeps the
//! pointer.
//!
//! # Safety Invariant
//!
//! Which union field is active is never stored in the [`Storage`] itself. It
//! is always [`fits_inline::<T>()`] for the type `T` the storage was created
//! with, and the vtable of the owning value records that answer. Every method
//! below takes the classification as a parameter and requires the caller to
//! pass the one matching the stored type.
//!
//! The address of an inline value is derived from the storage on every access
//! and never cached, so moving a [`Storage`] (and therefore swapping two
//! values) needs no pointer fix-up.

use alloc::boxed::Box;
use core::{mem::MaybeUninit, ptr::NonNull};

/// Buffer for values stored inline: one machine word.
type Buffer = MaybeUninit<usize>;

/// Returns `true` if values of type `T` are stored inline rather than boxed.
///
/// Every Rust move is a bitwise copy that cannot fail, so size and alignment
/// are the only criteria.
#[inline]
pub const fn fits_inline<T>() -> bool {
    size_of::<T>() <= size_of::<Buffer>() && align_of::<T>() <= align_of::<Buffer>()
}

/// Storage of a single value of some type `T`.
///
/// # Safety
///
/// When [`fits_inline::<T>()`] is `true`, `inline` is the active field and
/// holds an initialized `T`. Otherwise `heap` is the active field and comes
/// from `Box::<T>::into_raw`.
#[derive(Clone, Copy)]
pub(super) union Storage {
    /// The value itself.
    inline: Buffer,
    /// Pointer to the boxed value.
    heap: NonNull<()>,
}

impl Storage {
    /// Moves `value` into a new storage.
    #[inline]
    pub(super) fn new<T>(value: T) -> Self {
        if fits_inline::<T>() {
            let mut buffer = Buffer::uninit();
            // SAFETY: `fits_inline::<T>()` guarantees the buffer is large enough and
            // sufficiently aligned for a `T`, and the buffer is exclusively ours.
            unsafe {
                buffer.as_mut_ptr().cast::<T>().write(value);
            }
            Self { inline: buffer }
        } else {
            let ptr: *mut T = Box::into_raw(Box::new(value));
            // SAFETY: `Box::into_raw` returns a non-null pointer
            let ptr = unsafe { NonNull::new_unchecked(ptr) };
            Self { heap: ptr.cast() }
        }
    }

    /// Returns the address of the stored value, valid for reads.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `inline` equals [`fits_inline::<T>()`] for the type `T` this storage
    ///    was created with.
    #[inline]
    pub(super) unsafe fn as_ptr(&self, inline: bool) -> NonNull<()> {
        if inline {
            NonNull::from(self.inline_ref()).cast()
        } else {
            // SAFETY: `heap` is the active field as guaranteed by the caller.
            unsafe { self.heap }
        }
    }

    /// Returns the address of the stored value, valid for reads and writes.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `inline` equals [`fits_inline::<T>()`] for the type `T` this storage
    ///    was created with.
    #[inline]
    pub(super) unsafe fn as_mut_ptr(&mut self, inline: bool) -> NonNull<()> {
        if inline {
            NonNull::from(self.inline_mut()).cast()
        } else {
            // SAFETY: `heap` is the active field as guaranteed by the caller.
            unsafe { self.heap }
        }
    }

    /// Returns a shared reference to the inline buffer.
    #[inline]
    fn inline_ref(&self) -> &Buffer {
        // SAFETY: Every bit pattern is a valid `MaybeUninit`, so viewing the
        // storage as a buffer is always allowed. Reading through it is only done
        // by callers that know the inline field is active.
        unsafe { &self.inline }
    }

    /// Returns a mutable reference to the inline buffer.
    #[inline]
    fn inline_mut(&mut self) -> &mut Buffer {
        // SAFETY: Every bit pattern is a valid `MaybeUninit`, so viewing the
        // storage as a buffer is always allowed. Writing through it is only done
        // by callers that know the inline field is active.
        unsafe { &mut self.inline }
    }

    /// Drops the stored value in place, freeing the box if there is one.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `T` is the type this storage was created with.
    /// 2. The stored value has not been dropped or moved out before, and the
    ///    storage is not used after this call.
    #[inline]
    pub(super) unsafe fn drop_in_place<T>(&mut self) {
        if fits_inline::<T>() {
            let ptr = self.inline_mut().as_mut_ptr().cast::<T>();
            // SAFETY: The inline field is active and holds an initialized `T` that
            // is dropped exactly once, as guaranteed by the caller.
            unsafe { core::ptr::drop_in_place(ptr) }
        } else {
            // SAFETY: The heap field is active as guaranteed by the caller.
            let ptr = unsafe { self.heap }.cast::<T>();
            // SAFETY: The pointer comes from `Box::<T>::into_raw` and ownership is
            // transferred back exactly once, as guaranteed by the caller.
            let boxed = unsafe { Box::from_raw(ptr.as_ptr()) };
            core::mem::drop(boxed);
        }
    }

    /// Moves the stored value out.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `T` is the type this storage was created with.
    /// 2. The stored value has not been dropped or moved out before, and the
    ///    storage is not used after this call.
    #[inline]
    pub(super) unsafe fn read<T>(mut self) -> T {
        if fits_inline::<T>() {
            let ptr = self.inline_mut().as_ptr().cast::<T>();
            // SAFETY: The inline field is active and holds an initialized `T` that
            // is moved out exactly once, as guaranteed by the caller.
            unsafe { ptr.read() }
        } else {
            // SAFETY: The heap field is active as guaranteed by the caller.
            let ptr = unsafe { self.heap }.cast::<T>();
            // SAFETY: The pointer comes from `Box::<T>::into_raw` and ownership is
            // transferred back exactly once, as guaranteed by the caller.
            let boxed = unsafe { Box::from_raw(ptr.as_ptr()) };
            *boxed
        }
    }
}
