use std::alloc::Layout;
use std::error::Error;
use std::fmt;
use std::ptr;
use std::ptr::NonNull;

/// The `AllocError` error indicates that an allocator refused a request,
/// either because memory is exhausted or because the allocator has been
/// configured to fail.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AllocError;

impl Error for AllocError {}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

/// Source of memory for map nodes.
///
/// Unlike the global allocator, a refused request is reported as an error
/// rather than aborting, so containers built on it can fail atomically.
///
/// # Safety
///
/// Memory returned by `allocate` or `grow` must stay valid, and must not be
/// handed out again, until it is passed to `deallocate` (or to `grow` as the
/// old block) with the same layout it was obtained with.
pub unsafe trait Allocator {
    /// Attempts to allocate a block of memory.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Deallocates the memory referenced by `ptr`.
    /// # Safety
    ///
    /// `ptr` must denote a block currently allocated by this allocator, and
    /// `layout` must be the layout it was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Attempts to extend the memory block, moving its contents.
    ///
    /// On failure the old block is untouched and still owned by the caller.
    /// # Safety
    ///
    /// Same requirements as `deallocate` for `ptr` and `old_layout`, and
    /// `new_layout.size()` must not be smaller than `old_layout.size()`.
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );

        let new_ptr = self.allocate(new_layout)?;

        let len = old_layout.size();

        ptr::copy_nonoverlapping(
            ptr.as_ptr().cast::<u8>(),
            new_ptr.as_ptr().cast::<u8>(),
            len,
        );
        self.deallocate(ptr, old_layout);

        Ok(new_ptr)
    }
}

unsafe impl<A> Allocator for &A
where
    A: Allocator + ?Sized,
{
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the safety contract must be upheld by the caller
        unsafe { (**self).deallocate(ptr, layout) }
    }

    #[inline]
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        // SAFETY: the safety contract must be upheld by the caller
        unsafe { (**self).grow(ptr, old_layout, new_layout) }
    }
}

/// Default implementation of Allocator, backed by the global allocator.
#[derive(Clone, Default)]
pub struct Global {}
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        match layout.size() {
            0 => Ok(NonNull::slice_from_raw_parts(NonNull::dangling(), 0)),
            size => unsafe {
                let raw_ptr = std::alloc::alloc(layout);
                let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
                Ok(NonNull::slice_from_raw_parts(ptr, size))
            },
        }
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            std::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        if old_layout.size() == 0 {
            return self.allocate(new_layout);
        }
        let raw_ptr = std::alloc::realloc(ptr.as_ptr(), old_layout, new_layout.size());
        let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
        Ok(NonNull::slice_from_raw_parts(ptr, new_layout.size()))
    }
}
