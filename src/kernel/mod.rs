//! Kernels
//!
//! A kernel is a single function exported by a built program. Its arguments
//! are declared up front as a list of `ArgKind`s, and each value bound with
//! `Kernel::set` is checked against its declaration before it reaches
//! OpenCL.
//!
//! A kernel borrows every buffer and queue bound to it, so a buffer can't be
//! released (or its host storage freed) while a kernel may still launch with
//! it:
//!
//! ```compile_fail
//! use easycl::context::Context;
//! use easycl::kernel::{ArgKind, Kernel};
//! use easycl::program::Program;
//!
//! fn dangling<'c>(ctx: &'c Context, program: &Program) -> easycl::Result<Kernel<'c>> {
//!     let mut kernel = program.create_kernel("fill", vec![ArgKind::Buffer])?;
//!     {
//!         let mut host = vec![0i32; 4];
//!         let buffer = ctx.buffer_builder().build_using_slice(&mut host)?;
//!         kernel.set(0, &buffer)?;
//!     }
//!     Ok(kernel)
//! }
//! ```
//!
//! Keeping the buffer alive for as long as the kernel compiles:
//!
//! ```no_run
//! use easycl::buffer::Buffer;
//! use easycl::kernel::{ArgKind, Kernel};
//! use easycl::program::Program;
//!
//! fn bound<'b>(program: &Program, buffer: &'b Buffer<'_, i32>) -> easycl::Result<Kernel<'b>> {
//!     let mut kernel = program.create_kernel("fill", vec![ArgKind::Buffer])?;
//!     kernel.set(0, buffer)?;
//!     Ok(kernel)
//! }
//! ```

mod types;

use crate::ndrange::{EnqueueArgs, NDRange};
use crate::program::Program;
use crate::raw::*;
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::{Error, OpenCL, Result};
use libc::size_t;
use std::ffi::{c_void, CString};
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::{null, null_mut};
use tynm::type_name;
pub use types::*;

/// An OpenCL kernel, borrowing the values bound to its arguments for `'a`
pub struct Kernel<'a> {
    _bound: PhantomData<&'a ()>,
    pub(crate) ocl: OpenCL,
    pub(crate) handle: cl_kernel,
    name: String,
    args: Vec<ArgKind>,
}

unsafe impl Send for Kernel<'_> {}

impl Drop for Kernel<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error releasing OpenCL kernel {:?}: {:?}", self.name, e);
        }
    }
}

impl Debug for Kernel<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl OclInfoInternal for Kernel<'_> {
    type Param = cl_kernel_info;
    const DEBUG_CONTEXT: &'static str = "clGetKernelInfo";

    fn check_live(&self) -> Result<()> {
        live(self.handle, "kernel").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetKernelInfo(
            self.handle,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

/// Pass null for a range with no dimensions, letting OpenCL pick a default
fn range_ptr(range: &NDRange) -> *const size_t {
    if range.dims == 0 {
        null()
    } else {
        range.sizes.as_ptr()
    }
}

/// Look up the declared kind of argument `index`, checking that a value of
/// kind `actual` (with Rust type name `type_name`) may be bound to it.
fn check_arg(
    args: &[ArgKind],
    index: cl_uint,
    actual: ArgKind,
    type_name: impl FnOnce() -> String,
) -> Result<ArgKind> {
    let expected = *args
        .get(index as usize)
        .ok_or(Error::ArgIndexOutOfRange {
            index,
            num_args: args.len(),
        })?;

    if expected.accepts(actual) {
        Ok(expected)
    } else {
        Err(Error::ArgMismatch {
            index,
            expected,
            actual: type_name(),
        })
    }
}

impl<'a> Kernel<'a> {
    /// Get the raw handle for this kernel. The handle is null once the kernel
    /// has been closed.
    pub fn raw(&self) -> cl_kernel {
        self.handle
    }

    /// The name of the kernel function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared argument kinds of this kernel
    pub fn args(&self) -> &[ArgKind] {
        &self.args
    }

    /// Check whether this kernel has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_null()
    }

    /// Release this kernel. Calling `close` on an already closed kernel does
    /// nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.handle.is_null() {
            return Ok(());
        }

        let handle = std::mem::replace(&mut self.handle, null_mut());

        unsafe {
            wrap_result!("clReleaseKernel" => self.ocl.raw().CL10.clReleaseKernel(handle))?;
        }

        log::trace!("Kernel released {:?} ({:?})", self.name, handle);
        Ok(())
    }

    /// Bind a value to the argument at `index`.
    ///
    /// The index must be one of the declared arguments, and the value must be
    /// of the same category (scalar, buffer or queue) and size as the
    /// declaration. The value stays borrowed for as long as the kernel
    /// exists.
    pub fn set<A: KernelArg + 'a>(&mut self, index: cl_uint, value: &'a A) -> Result<&mut Self> {
        check_arg(&self.args, index, A::KIND, type_name::<A>)?;
        let kernel = live(self.handle, "kernel")?;
        let (size, ptr) = value.as_raw_kernel_arg()?;

        unsafe {
            wrap_result!("clSetKernelArg" => self.ocl.raw().CL10.clSetKernelArg(
                kernel,
                index,
                size,
                ptr
            ))?;
        }

        log::trace!("Set argument #{} of kernel {:?} ({:?})", index, self.name, A::KIND);
        Ok(self)
    }

    /// Enqueue this kernel for execution over the given ranges. Offset and
    /// local ranges with no dimensions are passed to OpenCL as null.
    pub fn enqueue(&self, args: &EnqueueArgs) -> Result<()> {
        let kernel = live(self.handle, "kernel")?;
        let queue = live(args.queue.id, "command queue")?;

        unsafe {
            wrap_result!("clEnqueueNDRangeKernel" => self.ocl.raw().CL10.clEnqueueNDRangeKernel(
                queue,
                kernel,
                args.global.dims,
                range_ptr(&args.offset),
                args.global.sizes.as_ptr(),
                range_ptr(&args.local),
                0,
                null(),
                null_mut()
            ))
        }
    }

    /// Get information about the argument at `idx`, as compiled. Requires
    /// OpenCL 1.2.
    pub fn arg_info(&self, idx: cl_uint) -> KernelArgInfo<'_> {
        KernelArgInfo { kernel: self, idx }
    }

    info_funcs! {
        pub fn function_name(&self) -> CString = CL_KERNEL_FUNCTION_NAME;
        pub fn num_args(&self) -> cl_uint = CL_KERNEL_NUM_ARGS;
        pub fn reference_count(&self) -> cl_uint = CL_KERNEL_REFERENCE_COUNT;
        pub fn context_raw(&self) -> cl_context = CL_KERNEL_CONTEXT;
        pub fn program_raw(&self) -> cl_program = CL_KERNEL_PROGRAM;
    }
}

impl Program {
    /// Create a kernel with a given name and declared argument kinds.
    ///
    /// If the number of declared arguments differs from the number OpenCL
    /// reports for the kernel function, a warning is logged.
    pub fn create_kernel<'a>(
        &self,
        name: &str,
        args: impl IntoIterator<Item = ArgKind>,
    ) -> Result<Kernel<'a>> {
        let program = live(self.handle, "program")?;
        let c_name = CString::new(name)?;

        let kernel = unsafe {
            let mut err = CL_SUCCESS;
            let handle =
                self.ocl
                    .raw()
                    .CL10
                    .clCreateKernel(program, c_name.as_ptr(), &mut err as _);
            wrap_result!("clCreateKernel" => err)?;

            Kernel {
                _bound: PhantomData,
                ocl: self.ocl.clone(),
                handle,
                name: name.to_owned(),
                args: args.into_iter().collect(),
            }
        };

        log::debug!("Created kernel {:?} ({:?})", kernel.name, kernel.handle);

        match kernel.num_args() {
            Ok(n) if n as usize != kernel.args.len() => log::warn!(
                "Kernel {:?} takes {} arguments, but {} were declared",
                kernel.name,
                n,
                kernel.args.len()
            ),
            Ok(_) => {}
            Err(e) => log::warn!(
                "Could not get argument count of kernel {:?}: {:?}",
                kernel.name,
                e
            ),
        }

        Ok(kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: &[ArgKind] = &[ArgKind::Buffer, ArgKind::Float, ArgKind::Queue];

    fn name() -> String {
        "f64".to_owned()
    }

    #[test]
    fn test_check_arg_accepts_declared_kind() {
        assert_eq!(check_arg(ARGS, 0, ArgKind::Buffer, name).unwrap(), ArgKind::Buffer);
        assert_eq!(check_arg(ARGS, 1, ArgKind::UInt, name).unwrap(), ArgKind::Float);
        assert_eq!(check_arg(ARGS, 2, ArgKind::Queue, name).unwrap(), ArgKind::Queue);
    }

    #[test]
    fn test_check_arg_index_out_of_range() {
        match check_arg(ARGS, 3, ArgKind::Float, name) {
            Err(Error::ArgIndexOutOfRange {
                index: 3,
                num_args: 3,
            }) => {}
            r => panic!("unexpected result {:?}", r),
        }

        assert!(check_arg(&[], 0, ArgKind::Int, name).is_err());
    }

    #[test]
    fn test_check_arg_mismatch() {
        match check_arg(ARGS, 1, ArgKind::Double, name) {
            Err(Error::ArgMismatch {
                index: 1,
                expected: ArgKind::Float,
                actual,
            }) => assert_eq!(actual, "f64"),
            r => panic!("unexpected result {:?}", r),
        }

        assert!(check_arg(ARGS, 0, ArgKind::ULong, name).is_err());
    }

    #[test]
    fn test_range_ptr_null_for_zero_dims() {
        assert!(range_ptr(&NDRange::d0()).is_null());

        let range = NDRange::d2(8, 4);
        assert_eq!(range_ptr(&range), range.sizes.as_ptr());
    }
}
