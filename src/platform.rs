//! Platforms
//!
//! An OpenCL platform is an OpenCL driver providing access to specialized
//! hardware. A system can have zero or more platforms, and each platform can
//! provide zero or more devices.

use crate::device::{Device, DeviceType};
use crate::raw::{cl_platform_id, cl_platform_info, CL_DEVICE_NOT_FOUND, CL_PLATFORM_NOT_FOUND_KHR};
use crate::util::sealed::OclInfoInternal;
use crate::{Error, OpenCL, Result};
use std::ffi::c_void;
use std::ffi::CString;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ptr::null_mut;

/// Take the first of a list of enumerated objects, failing with
/// `Error::NotFound` if there are none
fn first_of<T>(items: Vec<T>, kind: &'static str) -> Result<T> {
    items.into_iter().next().ok_or(Error::NotFound(kind))
}

/// An OpenCL platform
#[derive(Clone)]
pub struct Platform {
    pub(crate) ocl: OpenCL,
    pub(crate) id: cl_platform_id,
}

unsafe impl Send for Platform {}
unsafe impl Sync for Platform {}

impl Debug for Platform {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl PartialEq for Platform {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Platform {}

impl Hash for Platform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.id as usize)
    }
}

impl OclInfoInternal for Platform {
    type Param = cl_platform_info;
    const DEBUG_CONTEXT: &'static str = "clGetPlatformInfo";

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetPlatformInfo(
            self.id,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl Platform {
    /// Get a list of OpenCL platforms available on this system.
    pub fn all(ocl: &OpenCL) -> Result<Vec<Platform>> {
        unsafe {
            let mut num_platforms = 0u32;

            // ICD loaders report a missing platform as an error rather than
            // as zero platforms
            match ocl
                .raw()
                .CL10
                .clGetPlatformIDs(0, null_mut(), &mut num_platforms as _)
            {
                CL_PLATFORM_NOT_FOUND_KHR => return Ok(vec![]),
                e => wrap_result!("clGetPlatformIDs" => e)?,
            }

            if num_platforms == 0 {
                return Ok(vec![]);
            }

            let mut ids = vec![null_mut(); num_platforms as usize];

            wrap_result!("clGetPlatformIDs" => ocl.raw().CL10.clGetPlatformIDs(
                num_platforms,
                ids.as_mut_ptr(),
                &mut num_platforms as _,
            ))?;

            ids.truncate(num_platforms as usize);

            log::debug!("Number of platforms available: {}", ids.len());

            Ok(ids
                .into_iter()
                .map(|id| Platform {
                    ocl: ocl.clone(),
                    id,
                })
                .collect())
        }
    }

    /// Get the first OpenCL platform on this system.
    pub fn first(ocl: &OpenCL) -> Result<Platform> {
        let platform = first_of(Self::all(ocl)?, "platform")?;

        log::debug!("Obtained platform {:?}", platform.id);
        Ok(platform)
    }

    /// Get a list of OpenCL devices of the given type from this platform.
    pub fn get_devices(&self, typ: DeviceType) -> Result<Vec<Device>> {
        unsafe {
            let mut num_devices = 0u32;

            match self.ocl.raw().CL10.clGetDeviceIDs(
                self.id,
                typ.raw(),
                0,
                null_mut(),
                &mut num_devices as _,
            ) {
                CL_DEVICE_NOT_FOUND => return Ok(vec![]),
                e => wrap_result!("clGetDeviceIDs" => e)?,
            }

            if num_devices == 0 {
                return Ok(vec![]);
            }

            let mut ids = vec![null_mut(); num_devices as usize];

            wrap_result!("clGetDeviceIDs" => self.ocl.raw().CL10.clGetDeviceIDs(
                self.id,
                typ.raw(),
                num_devices,
                ids.as_mut_ptr(),
                &mut num_devices as _,
            ))?;

            ids.truncate(num_devices as usize);

            log::debug!("Number of {:?} devices available: {}", typ, ids.len());

            Ok(ids
                .into_iter()
                .map(|id| Device {
                    ocl: self.ocl.clone(),
                    id,
                })
                .collect())
        }
    }

    /// Get the first device of the given type from this platform.
    pub fn first_device(&self, typ: DeviceType) -> Result<Device> {
        let device = first_of(self.get_devices(typ)?, "device")?;

        log::debug!("Obtained device {:?}", device.id);
        Ok(device)
    }

    /// Get the first GPU device from this platform.
    pub fn default_device(&self) -> Result<Device> {
        self.first_device(DeviceType::GPU)
    }

    /// Get the raw handle for this platform
    pub fn raw(&self) -> cl_platform_id {
        self.id
    }

    /// Wrap the given raw platform handle
    ///
    /// # Safety
    ///
    /// If the given handle is not a valid OpenCL platform ID for the given
    /// library, behavior is undefined.
    pub unsafe fn from_raw(ocl: &OpenCL, id: cl_platform_id) -> Self {
        Self {
            ocl: ocl.clone(),
            id,
        }
    }

    info_funcs! {
        pub fn profile(&self) -> CString = CL_PLATFORM_PROFILE;
        pub fn version(&self) -> CString = CL_PLATFORM_VERSION;
        pub fn name(&self) -> CString = CL_PLATFORM_NAME;
        pub fn vendor(&self) -> CString = CL_PLATFORM_VENDOR;
        pub fn extensions(&self) -> CString = CL_PLATFORM_EXTENSIONS;
    }

    /// Unload the OpenCL C program compiler for this platform.
    pub fn unload_compiler(&self) -> Result<()> {
        let api = check_ocl_version!(self.ocl, CL12 => "clUnloadPlatformCompiler")?;

        unsafe {
            wrap_result!("clUnloadPlatformCompiler" => api.clUnloadPlatformCompiler(self.id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_empty_list_not_found() {
        match first_of(Vec::<u32>::new(), "platform") {
            Err(Error::NotFound("platform")) => {}
            r => panic!("unexpected result {:?}", r),
        }

        assert_eq!(first_of(vec![3, 1, 2], "device").unwrap(), 3);
    }
}
