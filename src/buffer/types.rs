use super::Buffer;
use crate::context::Context;
use crate::kernel::ArgKind;
use crate::queue::Queue;
use crate::raw::*;
use crate::util::{byte_len, live};
use crate::Result;
use libc::size_t;
use std::marker::PhantomData;
use std::mem::{size_of, size_of_val};
use std::ptr::null_mut;

/// Element types that may be stored in a buffer and passed to kernels as
/// scalars.
///
/// # Safety
///
/// Device code writes buffer contents as raw bytes, so implementors must be
/// plain `Copy` data for which every bit pattern is a valid value. The
/// associated `ARG_KIND` must have the same size as the type.
pub unsafe trait MemSafe: 'static + Sized + Copy + Unpin {
    /// The kernel argument kind of a scalar of this type
    const ARG_KIND: ArgKind;
}

unsafe impl MemSafe for cl_char {
    const ARG_KIND: ArgKind = ArgKind::Char;
}

unsafe impl MemSafe for cl_uchar {
    const ARG_KIND: ArgKind = ArgKind::UChar;
}

unsafe impl MemSafe for cl_short {
    const ARG_KIND: ArgKind = ArgKind::Short;
}

unsafe impl MemSafe for cl_ushort {
    const ARG_KIND: ArgKind = ArgKind::UShort;
}

unsafe impl MemSafe for cl_int {
    const ARG_KIND: ArgKind = ArgKind::Int;
}

unsafe impl MemSafe for cl_uint {
    const ARG_KIND: ArgKind = ArgKind::UInt;
}

unsafe impl MemSafe for cl_long {
    const ARG_KIND: ArgKind = ArgKind::Long;
}

unsafe impl MemSafe for cl_ulong {
    const ARG_KIND: ArgKind = ArgKind::ULong;
}

unsafe impl MemSafe for cl_float {
    const ARG_KIND: ArgKind = ArgKind::Float;
}

unsafe impl MemSafe for cl_double {
    const ARG_KIND: ArgKind = ArgKind::Double;
}

flag_enum! {
    /// How kernels may access a buffer
    pub enum MemAccess(cl_mem_flags) {
        ReadWrite = CL_MEM_READ_WRITE,
        WriteOnly = CL_MEM_WRITE_ONLY,
        ReadOnly = CL_MEM_READ_ONLY,
    }
}

impl Default for MemAccess {
    fn default() -> Self {
        MemAccess::ReadWrite
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BufferBuilder<'c> {
    context: &'c Context,
    access: MemAccess,
    alloc_host_ptr: bool,
}

impl<'c> BufferBuilder<'c> {
    /// Start building a new OpenCL buffer for the given context.
    pub fn new(context: &'c Context) -> Self {
        Self {
            context,
            access: MemAccess::default(),
            alloc_host_ptr: false,
        }
    }

    /// Set how kernels may access this buffer.
    pub fn access(self, access: MemAccess) -> Self {
        Self { access, ..self }
    }

    /// Make this buffer read-only for kernels.
    pub fn read_only(self) -> Self {
        self.access(MemAccess::ReadOnly)
    }

    /// Set the `CL_MEM_ALLOC_HOST_PTR` flag when creating this buffer.
    pub fn alloc_host_ptr(self) -> Self {
        Self {
            alloc_host_ptr: true,
            ..self
        }
    }

    fn flags(&self, extra_flags: cl_mem_flags) -> cl_mem_flags {
        let mut flags = self.access.raw() | extra_flags;

        if self.alloc_host_ptr {
            flags |= CL_MEM_ALLOC_HOST_PTR;
        }

        flags
    }

    fn build<'a, T: MemSafe>(
        self,
        len: usize,
        host_ptr: *mut T,
        extra_flags: cl_mem_flags,
    ) -> Result<Buffer<'a, T>> {
        let context = live(self.context.id, "context")?;
        let size: size_t = byte_len::<T>(len)?;
        let flags = self.flags(extra_flags);

        unsafe {
            let mut err = CL_SUCCESS;

            let handle = self.context.ocl.raw().CL10.clCreateBuffer(
                context,
                flags,
                size,
                host_ptr as _,
                &mut err as _,
            );

            wrap_result!("clCreateBuffer" => err)?;
            log::debug!(
                "Created buffer {:?} ({} bytes, {:?})",
                handle,
                size,
                BufferFlagsInfo::from_raw(flags)
            );

            Ok(Buffer {
                _lifetime: PhantomData,
                ocl: self.context.ocl.clone(),
                handle,
                len,
            })
        }
    }

    /// Build a buffer, copying initial data from the given slice, with the
    /// `CL_MEM_COPY_HOST_PTR` flag set.
    pub fn build_copying_slice<T: MemSafe>(self, slice: &[T]) -> Result<Buffer<'static, T>> {
        self.build(
            slice.len(),
            slice.as_ptr() as *mut _,
            CL_MEM_COPY_HOST_PTR,
        )
    }

    /// Build a buffer with space for `len` elements of type `T`. The initial
    /// contents of the buffer are unspecified.
    pub fn build_with_size<T: MemSafe>(self, len: usize) -> Result<Buffer<'static, T>> {
        self.build(len, null_mut(), 0)
    }

    /// Build a buffer with space for `slice.len()` elements, then write the
    /// contents of the slice into it with a blocking write on `queue`.
    pub fn build_writing_slice<T: MemSafe>(
        self,
        queue: &Queue,
        slice: &[T],
    ) -> Result<Buffer<'static, T>> {
        let buffer = self.build_with_size(slice.len())?;
        buffer.write(queue, slice)?;
        Ok(buffer)
    }

    /// Build a buffer using the given slice for storage, with the
    /// `CL_MEM_USE_HOST_PTR` flag set.
    ///
    /// The slice stays mutably borrowed for as long as the buffer exists, so
    /// its contents can only be accessed through the buffer's read and write
    /// commands in the meantime.
    pub fn build_using_slice<'a, T: MemSafe>(self, slice: &'a mut [T]) -> Result<Buffer<'a, T>> {
        debug_assert_eq!(size_of_val(slice), size_of::<T>() * slice.len());
        self.build(slice.len(), slice.as_mut_ptr(), CL_MEM_USE_HOST_PTR)
    }
}

impl Context {
    /// Start building a new OpenCL buffer for this context.
    pub fn buffer_builder(&self) -> BufferBuilder<'_> {
        BufferBuilder::new(self)
    }
}

bitfield! {
    /// Flags a buffer was created with, as reported by the `CL_MEM_FLAGS`
    /// info query.
    pub struct BufferFlagsInfo(cl_mem_flags) {
        pub const READ_WRITE = CL_MEM_READ_WRITE;
        pub const WRITE_ONLY = CL_MEM_WRITE_ONLY;
        pub const READ_ONLY = CL_MEM_READ_ONLY;
        pub const USE_HOST_PTR = CL_MEM_USE_HOST_PTR;
        pub const ALLOC_HOST_PTR = CL_MEM_ALLOC_HOST_PTR;
        pub const COPY_HOST_PTR = CL_MEM_COPY_HOST_PTR;
        pub const HOST_WRITE_ONLY = CL_MEM_HOST_WRITE_ONLY;
        pub const HOST_READ_ONLY = CL_MEM_HOST_READ_ONLY;
        pub const HOST_NO_ACCESS = CL_MEM_HOST_NO_ACCESS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_safe_arg_kinds_match_sizes() {
        fn check<T: MemSafe>() {
            assert_eq!(T::ARG_KIND.size(), size_of::<T>(), "{:?}", T::ARG_KIND);
        }

        check::<cl_char>();
        check::<cl_uchar>();
        check::<cl_short>();
        check::<cl_ushort>();
        check::<cl_int>();
        check::<cl_uint>();
        check::<cl_long>();
        check::<cl_ulong>();
        check::<cl_float>();
        check::<cl_double>();
    }

    #[test]
    fn test_buffer_flags_debug_fmt() {
        let flags = BufferFlagsInfo::READ_ONLY | BufferFlagsInfo::COPY_HOST_PTR;
        assert_eq!(format!("{:?}", flags), "BufferFlagsInfo(READ_ONLY | COPY_HOST_PTR)");
        assert_eq!(MemAccess::default().raw(), CL_MEM_READ_WRITE);
    }
}
