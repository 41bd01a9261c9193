//! Devices
//!
//! A device is a piece of hardware exposed by a platform, such as a GPU or a
//! CPU. Root devices are owned by their platform and are never released, so
//! `Device` is a plain handle that can be freely cloned.

mod types;

use crate::context::Context;
use crate::platform::Platform;
use crate::raw::{cl_device_id, cl_device_info, cl_platform_id, cl_uint, cl_ulong};
use crate::util::sealed::OclInfoInternal;
use crate::{OpenCL, Result};
use libc::size_t;
use std::ffi::CString;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::os::raw::c_void;
pub use types::*;

/// An OpenCL device
#[derive(Clone)]
pub struct Device {
    pub(crate) ocl: OpenCL,
    pub(crate) id: cl_device_id,
}

unsafe impl Send for Device {}
unsafe impl Sync for Device {}

impl Debug for Device {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.id as usize)
    }
}

impl OclInfoInternal for Device {
    type Param = cl_device_info;
    const DEBUG_CONTEXT: &'static str = "clGetDeviceInfo";

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetDeviceInfo(
            self.id,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl Device {
    /// Create a new context containing only this device, on the platform this
    /// device belongs to.
    pub fn create_context(&self) -> Result<Context> {
        Context::new(&self.platform()?, self)
    }

    /// Get the raw handle for this device
    pub fn raw(&self) -> cl_device_id {
        self.id
    }

    /// Wrap the given raw device handle
    ///
    /// # Safety
    ///
    /// If the given handle is not a valid OpenCL device ID for the given
    /// library, behavior is undefined.
    pub unsafe fn from_raw(ocl: &OpenCL, id: cl_device_id) -> Self {
        Self {
            ocl: ocl.clone(),
            id,
        }
    }

    info_funcs! {
        pub fn device_type(&self) -> DeviceType = CL_DEVICE_TYPE;
        pub fn vendor_id(&self) -> cl_uint = CL_DEVICE_VENDOR_ID;
        pub fn max_compute_units(&self) -> cl_uint = CL_DEVICE_MAX_COMPUTE_UNITS;
        pub fn max_work_item_dimensions(&self) -> cl_uint = CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS;
        pub fn max_work_item_sizes(&self) -> Vec<size_t> = CL_DEVICE_MAX_WORK_ITEM_SIZES;
        pub fn max_work_group_size(&self) -> size_t = CL_DEVICE_MAX_WORK_GROUP_SIZE;
        pub fn max_clock_frequency(&self) -> cl_uint = CL_DEVICE_MAX_CLOCK_FREQUENCY;
        pub fn address_bits(&self) -> cl_uint = CL_DEVICE_ADDRESS_BITS;
        pub fn max_mem_alloc_size(&self) -> cl_ulong = CL_DEVICE_MAX_MEM_ALLOC_SIZE;
        pub fn mem_base_addr_align(&self) -> cl_uint = CL_DEVICE_MEM_BASE_ADDR_ALIGN;
        pub fn single_fp_config(&self) -> FPConfig = CL_DEVICE_SINGLE_FP_CONFIG;
        pub fn double_fp_config(&self) -> FPConfig = CL_DEVICE_DOUBLE_FP_CONFIG;
        pub fn global_mem_cache_type(&self) -> MemCacheType = CL_DEVICE_GLOBAL_MEM_CACHE_TYPE;
        pub fn global_mem_cacheline_size(&self) -> cl_uint = CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE;
        pub fn global_mem_cache_size(&self) -> cl_ulong = CL_DEVICE_GLOBAL_MEM_CACHE_SIZE;
        pub fn global_mem_size(&self) -> cl_ulong = CL_DEVICE_GLOBAL_MEM_SIZE;
        pub fn max_constant_buffer_size(&self) -> cl_ulong = CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE;
        pub fn local_mem_type(&self) -> LocalMemType = CL_DEVICE_LOCAL_MEM_TYPE;
        pub fn local_mem_size(&self) -> cl_ulong = CL_DEVICE_LOCAL_MEM_SIZE;
        pub fn error_correction_support(&self) -> bool = CL_DEVICE_ERROR_CORRECTION_SUPPORT;
        pub fn profiling_timer_resolution(&self) -> size_t = CL_DEVICE_PROFILING_TIMER_RESOLUTION;
        pub fn endian_little(&self) -> bool = CL_DEVICE_ENDIAN_LITTLE;
        pub fn available(&self) -> bool = CL_DEVICE_AVAILABLE;
        pub fn compiler_available(&self) -> bool = CL_DEVICE_COMPILER_AVAILABLE;
        pub fn linker_available(&self) -> bool = CL_DEVICE_LINKER_AVAILABLE;
        pub fn execution_capabilities(&self) -> ExecutionCapabilities = CL_DEVICE_EXECUTION_CAPABILITIES;
        pub fn queue_properties(&self) -> crate::queue::QueueProperties = CL_DEVICE_QUEUE_ON_HOST_PROPERTIES;
        pub fn platform_id(&self) -> cl_platform_id = CL_DEVICE_PLATFORM;
        pub fn name(&self) -> CString = CL_DEVICE_NAME;
        pub fn vendor(&self) -> CString = CL_DEVICE_VENDOR;
        pub fn driver_version(&self) -> CString = CL_DRIVER_VERSION;
        pub fn profile(&self) -> CString = CL_DEVICE_PROFILE;
        pub fn version(&self) -> CString = CL_DEVICE_VERSION;
        pub fn opencl_c_version(&self) -> CString = CL_DEVICE_OPENCL_C_VERSION;
        pub fn extensions(&self) -> CString = CL_DEVICE_EXTENSIONS;
        pub fn built_in_kernels(&self) -> CString = CL_DEVICE_BUILT_IN_KERNELS;
    }

    /// Get the platform this device belongs to.
    pub fn platform(&self) -> Result<Platform> {
        self.platform_id().map(|id| Platform {
            ocl: self.ocl.clone(),
            id,
        })
    }
}
