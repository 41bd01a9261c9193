//! Programs
//!
//! In OpenCL, a `Program` exports kernels that can be executed to perform work
//! on specialized hardware. Programs can either be built in one step, or
//! compiled and then linked separately on OpenCL 1.2 and newer.

mod types;

use crate::device::Device;
use crate::raw::*;
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::{OpenCL, Result};
use const_cstr::const_cstr;
use libc::size_t;
use std::ffi::{c_void, CStr, CString};
use std::fmt::{self, Debug, Formatter};
use std::ptr::{null, null_mut};
use types::{options_cstring, options_ptr, Headers};
pub use types::*;

const_cstr! {
    CREATE_LIBRARY = "-create-library";
}

/// An OpenCL program
pub struct Program {
    pub(crate) ocl: OpenCL,
    pub(crate) handle: cl_program,
    name: String,
    compiled: bool,
    linked: bool,
}

unsafe impl Send for Program {}
unsafe impl Sync for Program {}

impl Drop for Program {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error releasing OpenCL program {:?}: {:?}", self.name, e);
        }
    }
}

impl Debug for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl OclInfoInternal for Program {
    type Param = cl_program_info;
    const DEBUG_CONTEXT: &'static str = "clGetProgramInfo";

    fn check_live(&self) -> Result<()> {
        live(self.handle, "program").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetProgramInfo(
            self.handle,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl Program {
    /// Get the raw handle for this program. The handle is null once the
    /// program has been closed.
    pub fn raw(&self) -> cl_program {
        self.handle
    }

    /// The name given to this program when it was created
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `compile` was called on this program, or it was produced by
    /// `link`
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Whether this program was produced by `link`
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Check whether this program has been released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_null()
    }

    /// Release this program. Calling `close` on an already closed program
    /// does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.handle.is_null() {
            return Ok(());
        }

        let handle = std::mem::replace(&mut self.handle, null_mut());

        unsafe {
            wrap_result!("clReleaseProgram" => self.ocl.raw().CL10.clReleaseProgram(handle))?;
        }

        log::trace!("Program released {:?} ({:?})", self.name, handle);
        Ok(())
    }

    /// Build (compile and link) this program for all devices in its context.
    ///
    /// If the build fails, the build log of each device is logged at error
    /// level before the error is returned.
    pub fn build(&self, options: &str) -> Result<()> {
        let handle = live(self.handle, "program")?;
        let options = options_cstring(options)?;

        let result = unsafe {
            wrap_result!("clBuildProgram" => self.ocl.raw().CL10.clBuildProgram(
                handle,
                0,
                null(),
                options_ptr(&options),
                None,
                null_mut()
            ))
        };

        match result {
            Ok(()) => {
                log::debug!("Built program {:?}", self.name);
                Ok(())
            }
            Err(e) => {
                self.log_build_logs();
                Err(e)
            }
        }
    }

    /// Compile this program without linking it, making the given programs
    /// available as embedded headers. Each header is included by its program
    /// name. Requires OpenCL 1.2.
    pub fn compile(&mut self, options: &str, headers: &[&Program]) -> Result<()> {
        let api = check_ocl_version!(self.ocl, CL12 => "clCompileProgram")?;
        let handle = live(self.handle, "program")?;
        let options = options_cstring(options)?;

        let headers = Headers::new(headers.iter().map(|h| (h.handle, h.name.as_str())))?;

        if self.compiled {
            log::warn!("Program {:?} is already compiled", self.name);
        }

        unsafe {
            let result = wrap_result!("clCompileProgram" => api.clCompileProgram(
                handle,
                0,
                null(),
                options_ptr(&options),
                headers.len(),
                headers.handles_ptr(),
                headers.names_ptr(),
                None,
                null_mut()
            ));

            if let Err(e) = result {
                self.log_build_logs();
                return Err(e);
            }
        }

        self.compiled = true;
        log::debug!("Compiled program {:?}", self.name);
        Ok(())
    }

    /// Link this compiled program into a new executable program. Requires
    /// OpenCL 1.2.
    pub fn link(&self, options: &str) -> Result<Program> {
        let options = options_cstring(options)?;
        self.link_raw(options.as_deref())
    }

    /// Link this compiled program into a new library program, which can be
    /// linked again later. Requires OpenCL 1.2.
    pub fn link_library(&self) -> Result<Program> {
        self.link_raw(Some(CREATE_LIBRARY.as_cstr()))
    }

    fn link_raw(&self, options: Option<&CStr>) -> Result<Program> {
        let api = check_ocl_version!(self.ocl, CL12 => "clLinkProgram")?;
        let handle = live(self.handle, "program")?;
        let context = self.context_raw()?;

        if self.linked {
            log::warn!("Program {:?} is already linked", self.name);
        }

        unsafe {
            let mut err = CL_SUCCESS;

            let linked = api.clLinkProgram(
                context,
                0,
                null(),
                options.map(CStr::as_ptr).unwrap_or(null()),
                1,
                &handle as *const _,
                None,
                null_mut(),
                &mut err as _,
            );

            wrap_result!("clLinkProgram" => err)?;

            let program = Program {
                ocl: self.ocl.clone(),
                handle: linked,
                name: self.name.clone(),
                compiled: true,
                linked: true,
            };

            log::debug!("Linked program {:?} ({:?})", program.name, linked);
            Ok(program)
        }
    }

    fn log_build_logs(&self) {
        let devices = match self.devices() {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("Could not get devices of program {:?}: {:?}", self.name, e);
                return;
            }
        };

        for device in devices {
            match self.build_info(&device).log() {
                Ok(build_log) => log::error!(
                    "Build log for program {:?} on device {:?}:\n{}",
                    self.name,
                    device.id,
                    build_log.to_string_lossy()
                ),
                Err(e) => log::warn!(
                    "Could not get build log for program {:?} on device {:?}: {:?}",
                    self.name,
                    device.id,
                    e
                ),
            }
        }
    }

    info_funcs! {
        pub fn reference_count(&self) -> cl_uint = CL_PROGRAM_REFERENCE_COUNT;
        pub fn context_raw(&self) -> cl_context = CL_PROGRAM_CONTEXT;
        pub fn num_devices(&self) -> cl_uint = CL_PROGRAM_NUM_DEVICES;
        pub fn device_ids(&self) -> Vec<cl_device_id> = CL_PROGRAM_DEVICES;
        pub fn source(&self) -> CString = CL_PROGRAM_SOURCE;
        pub fn binary_sizes(&self) -> Vec<size_t> = CL_PROGRAM_BINARY_SIZES;
        pub fn num_kernels(&self) -> size_t = CL_PROGRAM_NUM_KERNELS;
        pub fn kernel_names(&self) -> CString = CL_PROGRAM_KERNEL_NAMES;
    }

    /// Get the devices this program is associated with.
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

    /// Get program build info for a given device
    pub fn build_info<'a>(&'a self, device: &Device) -> ProgramBuildInfo<'a> {
        ProgramBuildInfo {
            program: self,
            device: device.id,
        }
    }
}

/// Build information about a program for a single device
pub struct ProgramBuildInfo<'a> {
    program: &'a Program,
    device: cl_device_id,
}

impl OclInfoInternal for ProgramBuildInfo<'_> {
    type Param = cl_program_build_info;
    const DEBUG_CONTEXT: &'static str = "clGetProgramBuildInfo";

    fn check_live(&self) -> Result<()> {
        self.program.check_live()
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.program.ocl.raw().CL10.clGetProgramBuildInfo(
            self.program.handle,
            self.device,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl ProgramBuildInfo<'_> {
    info_funcs! {
        pub fn status(&self) -> ProgramBuildStatus = CL_PROGRAM_BUILD_STATUS;
        pub fn options(&self) -> CString = CL_PROGRAM_BUILD_OPTIONS;
        pub fn log(&self) -> CString = CL_PROGRAM_BUILD_LOG;
        pub fn binary_type(&self) -> ProgramBinaryType = CL_PROGRAM_BINARY_TYPE;
    }
}

impl Debug for ProgramBuildInfo<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_library_option() {
        assert_eq!(CREATE_LIBRARY.as_cstr().to_bytes(), b"-create-library");
    }
}
