//! Raw OpenCL types, constants, and dynamically-loaded function bindings.
//!
//! Everything in this module mirrors the OpenCL C headers. The safe wrapper
//! types in the rest of the crate are built on top of it.

#![allow(non_camel_case_types, non_snake_case)]

mod constants;
pub mod functions;

pub use constants::*;
pub use functions::RawOpenCL;
use libc::{intptr_t, size_t};
use std::fmt::{self, Display, Formatter};

pub type cl_char = i8;
pub type cl_uchar = u8;
pub type cl_short = i16;
pub type cl_ushort = u16;
pub type cl_int = i32;
pub type cl_uint = u32;
pub type cl_long = i64;
pub type cl_ulong = u64;
pub type cl_float = f32;
pub type cl_double = f64;

pub type cl_bool = cl_uint;
pub type cl_bitfield = cl_ulong;

opaque_type! {
    _cl_platform_id,
    _cl_device_id,
    _cl_context,
    _cl_command_queue,
    _cl_mem,
    _cl_program,
    _cl_kernel,
    _cl_event,
}

pub type cl_platform_id = *mut _cl_platform_id;
pub type cl_device_id = *mut _cl_device_id;
pub type cl_context = *mut _cl_context;
pub type cl_command_queue = *mut _cl_command_queue;
pub type cl_mem = *mut _cl_mem;
pub type cl_program = *mut _cl_program;
pub type cl_kernel = *mut _cl_kernel;
pub type cl_event = *mut _cl_event;

pub type cl_platform_info = cl_uint;
pub type cl_device_type = cl_bitfield;
pub type cl_device_info = cl_uint;
pub type cl_device_fp_config = cl_bitfield;
pub type cl_device_mem_cache_type = cl_uint;
pub type cl_device_local_mem_type = cl_uint;
pub type cl_device_exec_capabilities = cl_bitfield;
pub type cl_context_properties = intptr_t;
pub type cl_context_info = cl_uint;
pub type cl_command_queue_properties = cl_bitfield;
pub type cl_queue_properties = cl_bitfield;
pub type cl_command_queue_info = cl_uint;
pub type cl_mem_flags = cl_bitfield;
pub type cl_mem_info = cl_uint;
pub type cl_buffer_create_type = cl_uint;
pub type cl_program_info = cl_uint;
pub type cl_program_build_info = cl_uint;
pub type cl_build_status = cl_int;
pub type cl_program_binary_type = cl_uint;
pub type cl_kernel_info = cl_uint;
pub type cl_kernel_arg_info = cl_uint;
pub type cl_kernel_arg_address_qualifier = cl_uint;
pub type cl_kernel_arg_access_qualifier = cl_uint;
pub type cl_kernel_arg_type_qualifier = cl_bitfield;

/// Callback passed to `clCreateContext` for asynchronous error reports
pub type ContextNotifyFn =
    unsafe extern "C" fn(*const libc::c_char, *const libc::c_void, size_t, *mut libc::c_void);

/// Callback passed to program build, compile, and link calls
pub type ProgramNotifyFn = unsafe extern "C" fn(cl_program, *mut libc::c_void);

/// The highest OpenCL API version whose functions could be loaded from the
/// system library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpenCLVersion {
    CL10,
    CL11,
    CL12,
    CL20,
}

impl Display for OpenCLVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let version = match self {
            OpenCLVersion::CL10 => "1.0",
            OpenCLVersion::CL11 => "1.1",
            OpenCLVersion::CL12 => "1.2",
            OpenCLVersion::CL20 => "2.0",
        };
        write!(f, "OpenCL {}", version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(OpenCLVersion::CL10 < OpenCLVersion::CL11);
        assert!(OpenCLVersion::CL12 < OpenCLVersion::CL20);
        assert_eq!(OpenCLVersion::CL12.to_string(), "OpenCL 1.2");
    }

    #[test]
    fn test_error_names() {
        assert_eq!(error_name(CL_INVALID_KERNEL_NAME), Some("CL_INVALID_KERNEL_NAME"));
        assert_eq!(error_name(CL_DEVICE_NOT_FOUND), Some("CL_DEVICE_NOT_FOUND"));
        assert_eq!(error_name(12345), None);
    }
}
