use crate::device::Device;
use crate::platform::Platform;
use crate::raw::{
    cl_context, cl_context_info, cl_device_id, cl_uint, CL_CONTEXT_PLATFORM, CL_SUCCESS,
};
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::{OpenCL, Result};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::os::raw::c_void;
use std::ptr::null_mut;

/// An OpenCL context
pub struct Context {
    pub(crate) ocl: OpenCL,
    pub(crate) id: cl_context,
}

unsafe impl Send for Context {}
unsafe impl Sync for Context {}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Context {}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error releasing OpenCL context {:?}: {:?}", self.id, e);
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.id as usize)
    }
}

impl OclInfoInternal for Context {
    type Param = cl_context_info;
    const DEBUG_CONTEXT: &'static str = "clGetContextInfo";

    fn check_live(&self) -> Result<()> {
        live(self.id, "context").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetContextInfo(
            self.id,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl Context {
    /// Create a context for a single device, with the `CL_CONTEXT_PLATFORM`
    /// property set to the given platform.
    pub fn new(platform: &Platform, device: &Device) -> Result<Self> {
        unsafe {
            let props = [CL_CONTEXT_PLATFORM, platform.id as _, 0];
            let mut err = CL_SUCCESS;

            let id = device.ocl.raw().CL10.clCreateContext(
                props.as_ptr(),
                1,
                &device.id as *const _,
                None,
                null_mut(),
                &mut err as _,
            );

            wrap_result!("clCreateContext" => err)?;
            log::debug!("Created context {:?} for device {:?}", id, device.id);

            Ok(Context {
                ocl: device.ocl.clone(),
                id,
            })
        }
    }

    /// Get the raw handle for this context. The handle is null once the
    /// context has been closed.
    pub fn raw(&self) -> cl_context {
        self.id
    }

    /// Check whether this context has been released.
    pub fn is_closed(&self) -> bool {
        self.id.is_null()
    }

    /// Release this context. Calling `close` on an already closed context does
    /// nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.id.is_null() {
            return Ok(());
        }

        let id = std::mem::replace(&mut self.id, null_mut());

        unsafe {
            wrap_result!("clReleaseContext" => self.ocl.raw().CL10.clReleaseContext(id))?;
        }

        log::trace!("Context released {:?}", id);
        Ok(())
    }

    info_funcs! {
        pub fn reference_count(&self) -> cl_uint = CL_CONTEXT_REFERENCE_COUNT;
        pub fn num_devices(&self) -> cl_uint = CL_CONTEXT_NUM_DEVICES;
        pub fn device_ids(&self) -> Vec<cl_device_id> = CL_CONTEXT_DEVICES;
    }

    /// Get the devices in this context.
    pub fn devices(&self) -> Result<Vec<Device>> {
        Ok(self
            .device_ids()?
            .into_iter()
            .map(|id| Device {
                ocl: self.ocl.clone(),
                id,
            })
            .collect())
    }
}
