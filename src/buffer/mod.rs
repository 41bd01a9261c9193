//! Buffers
//!
//! A buffer is a block of memory owned by a context, holding a sequence of
//! elements of a single `MemSafe` type.

mod types;

use crate::queue::Queue;
use crate::raw::*;
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::{OpenCL, Result};
use libc::size_t;
use std::ffi::c_void;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::null_mut;
pub use types::*;

/// An OpenCL memory buffer holding `len` elements of type `T`.
///
/// The lifetime `'a` is only shorter than `'static` for buffers created with
/// `BufferBuilder::build_using_slice`, which borrow host memory for storage.
pub struct Buffer<'a, T: MemSafe> {
    _lifetime: PhantomData<&'a mut [T]>,
    pub(crate) ocl: OpenCL,
    pub(crate) handle: cl_mem,
    len: usize,
}

unsafe impl<T: MemSafe> Send for Buffer<'_, T> {}
unsafe impl<T: MemSafe> Sync for Buffer<'_, T> {}

impl<'a, T: MemSafe> Drop for Buffer<'a, T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error releasing OpenCL mem object {:?}: {:?}", self.handle, e);
        }
    }
}

impl<'a, T: MemSafe> Debug for Buffer<'a, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl<'a, T: MemSafe> PartialEq for Buffer<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl<'a, T: MemSafe> OclInfoInternal for Buffer<'a, T> {
    type Param = cl_mem_info;
    const DEBUG_CONTEXT: &'static str = "clGetMemObjectInfo";

    fn check_live(&self) -> Result<()> {
        live(self.handle, "buffer").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetMemObjectInfo(
            self.handle,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl<'a, T: MemSafe> Buffer<'a, T> {
    /// Get the raw handle for this buffer. The handle is null once the buffer
    /// has been closed.
    pub fn raw(&self) -> cl_mem {
        self.handle
    }

    /// Get the number of elements of type `T` this buffer holds.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether this buffer has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_null()
    }

    /// Release this buffer. Calling `close` on an already closed buffer does
    /// nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.handle.is_null() {
            return Ok(());
        }

        let handle = std::mem::replace(&mut self.handle, null_mut());

        unsafe {
            wrap_result!("clReleaseMemObject" => self.ocl.raw().CL10.clReleaseMemObject(handle))?;
        }

        log::trace!("Buffer released {:?}", handle);
        Ok(())
    }

    /// Perform a blocking read of the start of this buffer into `dest`.
    pub fn read(&self, queue: &Queue, dest: &mut [T]) -> Result<()> {
        queue.buffer_cmd(self).read(dest)
    }

    /// Perform a blocking write of `src` into the start of this buffer.
    pub fn write(&self, queue: &Queue, src: &[T]) -> Result<()> {
        queue.buffer_cmd(self).write(src)
    }

    info_funcs! {
        pub fn flags(&self) -> BufferFlagsInfo = CL_MEM_FLAGS;
        pub fn size(&self) -> size_t = CL_MEM_SIZE;
        pub fn host_ptr(&self) -> *mut c_void = CL_MEM_HOST_PTR;
        pub fn map_count(&self) -> cl_uint = CL_MEM_MAP_COUNT;
        pub fn reference_count(&self) -> cl_uint = CL_MEM_REFERENCE_COUNT;
        pub fn context_raw(&self) -> cl_context = CL_MEM_CONTEXT;
        pub fn offset(&self) -> size_t = CL_MEM_OFFSET;
    }
}
