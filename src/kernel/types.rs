use super::Kernel;
use crate::buffer::{Buffer, MemSafe};
use crate::queue::Queue;
use crate::raw::*;
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::Result;
use libc::size_t;
use std::ffi::{c_void, CString};
use std::fmt::{self, Debug, Formatter};
use std::mem::size_of;

/// The declared kind of a kernel argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    /// A `__global` or `__constant` memory buffer
    Buffer,
    /// A device-side command queue (`queue_t`)
    Queue,
}

#[derive(PartialEq)]
enum ArgCategory {
    Scalar,
    Buffer,
    Queue,
}

impl ArgKind {
    /// The size in bytes of a value of this kind, as passed to
    /// `clSetKernelArg`
    pub fn size(self) -> usize {
        match self {
            ArgKind::Char => size_of::<cl_char>(),
            ArgKind::UChar => size_of::<cl_uchar>(),
            ArgKind::Short => size_of::<cl_short>(),
            ArgKind::UShort => size_of::<cl_ushort>(),
            ArgKind::Int => size_of::<cl_int>(),
            ArgKind::UInt => size_of::<cl_uint>(),
            ArgKind::Long => size_of::<cl_long>(),
            ArgKind::ULong => size_of::<cl_ulong>(),
            ArgKind::Float => size_of::<cl_float>(),
            ArgKind::Double => size_of::<cl_double>(),
            ArgKind::Buffer => size_of::<cl_mem>(),
            ArgKind::Queue => size_of::<cl_command_queue>(),
        }
    }

    /// Whether this is a primitive scalar kind
    pub fn is_scalar(self) -> bool {
        self.category() == ArgCategory::Scalar
    }

    fn category(self) -> ArgCategory {
        match self {
            ArgKind::Buffer => ArgCategory::Buffer,
            ArgKind::Queue => ArgCategory::Queue,
            _ => ArgCategory::Scalar,
        }
    }

    /// Check whether a value of kind `actual` can be bound to an argument
    /// declared as `self`. Scalars are matched by size only, so a `cl_uint`
    /// may be passed for an argument declared as `Int` or `Float`.
    pub fn accepts(self, actual: ArgKind) -> bool {
        self.category() == actual.category() && self.size() == actual.size()
    }
}

/// A trait implemented by types that can be used as an individual kernel
/// argument
pub trait KernelArg {
    /// The kind of argument this value binds to
    const KIND: ArgKind;

    /// Get the data of this kernel argument, as a size and pointer to be
    /// passed to `clSetKernelArg`
    fn as_raw_kernel_arg(&self) -> Result<(size_t, *const c_void)>;
}

// values can be used as individual kernel args
impl<T: MemSafe> KernelArg for T {
    const KIND: ArgKind = T::ARG_KIND;

    fn as_raw_kernel_arg(&self) -> Result<(size_t, *const c_void)> {
        Ok((size_of::<T>(), self as *const T as _))
    }
}

// buffers can be used as individual kernel args
impl<T: MemSafe> KernelArg for Buffer<'_, T> {
    const KIND: ArgKind = ArgKind::Buffer;

    fn as_raw_kernel_arg(&self) -> Result<(size_t, *const c_void)> {
        live(self.handle, "buffer")?;
        Ok((size_of::<cl_mem>(), &self.handle as *const cl_mem as _))
    }
}

impl KernelArg for Queue {
    const KIND: ArgKind = ArgKind::Queue;

    fn as_raw_kernel_arg(&self) -> Result<(size_t, *const c_void)> {
        live(self.id, "command queue")?;
        Ok((
            size_of::<cl_command_queue>(),
            &self.id as *const cl_command_queue as _,
        ))
    }
}

/// Information about a single kernel argument, as compiled. Requires OpenCL
/// 1.2, and the program must have been built with `-cl-kernel-arg-info`.
#[derive(Clone, Copy)]
pub struct KernelArgInfo<'a> {
    pub(super) kernel: &'a Kernel<'a>,
    pub(super) idx: cl_uint,
}

impl<'a> OclInfoInternal for KernelArgInfo<'a> {
    type Param = cl_kernel_arg_info;
    const DEBUG_CONTEXT: &'static str = "clGetKernelArgInfo";

    fn check_live(&self) -> Result<()> {
        self.kernel.check_live()?;
        check_ocl_version!(self.kernel.ocl, CL12 => "clGetKernelArgInfo").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        match self.kernel.ocl.raw().CL12.as_ref() {
            Some(api) => api.clGetKernelArgInfo(
                self.kernel.handle,
                self.idx,
                param_name,
                param_value_size,
                param_value,
                param_value_size_ret,
            ),
            None => CL_INVALID_OPERATION,
        }
    }
}

impl<'a> Debug for KernelArgInfo<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

flag_enum! {
    pub enum ArgAddressQualifier(cl_kernel_arg_address_qualifier) {
        Global = CL_KERNEL_ARG_ADDRESS_GLOBAL,
        Local = CL_KERNEL_ARG_ADDRESS_LOCAL,
        Constant = CL_KERNEL_ARG_ADDRESS_CONSTANT,
        Private = CL_KERNEL_ARG_ADDRESS_PRIVATE
    }
}

flag_enum! {
    pub enum ArgAccessQualifier(cl_kernel_arg_access_qualifier) {
        ReadOnly = CL_KERNEL_ARG_ACCESS_READ_ONLY,
        WriteOnly = CL_KERNEL_ARG_ACCESS_WRITE_ONLY,
        ReadWrite = CL_KERNEL_ARG_ACCESS_READ_WRITE,
        None = CL_KERNEL_ARG_ACCESS_NONE
    }
}

bitfield! {
    pub struct ArgTypeQualifier(cl_kernel_arg_type_qualifier) {
        pub const CONST = CL_KERNEL_ARG_TYPE_CONST;
        pub const RESTRICT = CL_KERNEL_ARG_TYPE_RESTRICT;
        pub const VOLATILE = CL_KERNEL_ARG_TYPE_VOLATILE;
        pub const NONE = CL_KERNEL_ARG_TYPE_NONE;
    }
}

impl<'a> KernelArgInfo<'a> {
    /// The index of this argument
    pub fn index(&self) -> cl_uint {
        self.idx
    }

    info_funcs! {
        pub fn address_qualifier(&self) -> ArgAddressQualifier = CL_KERNEL_ARG_ADDRESS_QUALIFIER;
        pub fn access_qualifier(&self) -> ArgAccessQualifier = CL_KERNEL_ARG_ACCESS_QUALIFIER;
        pub fn type_name(&self) -> CString = CL_KERNEL_ARG_TYPE_NAME;
        pub fn type_qualifier(&self) -> ArgTypeQualifier = CL_KERNEL_ARG_TYPE_QUALIFIER;
        pub fn arg_name(&self) -> CString = CL_KERNEL_ARG_NAME;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_sizes_match_c_types() {
        assert_eq!(ArgKind::Char.size(), 1);
        assert_eq!(ArgKind::UShort.size(), 2);
        assert_eq!(ArgKind::Float.size(), 4);
        assert_eq!(ArgKind::ULong.size(), 8);
        assert_eq!(ArgKind::Double.size(), 8);
        assert_eq!(ArgKind::Buffer.size(), size_of::<*mut c_void>());
        assert_eq!(ArgKind::Queue.size(), size_of::<*mut c_void>());
    }

    #[test]
    fn test_accepts_matches_category_and_size() {
        assert!(ArgKind::Int.accepts(ArgKind::Int));
        assert!(ArgKind::Int.accepts(ArgKind::UInt));
        assert!(ArgKind::Float.accepts(ArgKind::Int));
        assert!(!ArgKind::Int.accepts(ArgKind::Long));
        assert!(!ArgKind::Double.accepts(ArgKind::Float));

        // pointer-sized scalars still can't stand in for handles
        assert!(!ArgKind::Buffer.accepts(ArgKind::ULong));
        assert!(!ArgKind::ULong.accepts(ArgKind::Buffer));
        assert!(!ArgKind::Buffer.accepts(ArgKind::Queue));
        assert!(ArgKind::Queue.accepts(ArgKind::Queue));
    }

    #[test]
    fn test_scalar_raw_kernel_arg_points_at_value() {
        let value: cl_float = 2.5;
        let (size, ptr) = value.as_raw_kernel_arg().unwrap();

        assert_eq!(size, 4);
        assert_eq!(ptr, &value as *const cl_float as *const c_void);
        assert_eq!(<cl_float as KernelArg>::KIND, ArgKind::Float);
        assert!(<cl_ulong as KernelArg>::KIND.is_scalar());
    }

    #[test]
    fn test_type_qualifier_debug_fmt() {
        let q = ArgTypeQualifier::CONST | ArgTypeQualifier::RESTRICT;
        assert_eq!(format!("{:?}", q), "ArgTypeQualifier(CONST | RESTRICT)");
        assert_eq!(format!("{:?}", ArgTypeQualifier::NONE), "ArgTypeQualifier(0x0)");
    }
}
