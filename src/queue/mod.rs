//! Command queues
//!
//! Commands such as buffer transfers and kernel launches are submitted to a
//! device through a command queue. Buffer transfers made through this crate
//! are always blocking.

mod types;

use crate::buffer::{Buffer, MemSafe};
use crate::context::Context;
use crate::device::Device;
use crate::raw::*;
use crate::util::live;
use crate::util::sealed::OclInfoInternal;
use crate::{OpenCL, Result};
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::os::raw::c_void;
use std::ptr::null_mut;
pub use types::*;

/// An OpenCL command queue
pub struct Queue {
    pub(crate) ocl: OpenCL,
    pub(crate) id: cl_command_queue,
}

unsafe impl Send for Queue {}

impl Drop for Queue {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Error releasing OpenCL command queue {:?}: {:?}", self.id, e);
        }
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.info_fmt(f)
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Queue {}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.id as usize)
    }
}

impl OclInfoInternal for Queue {
    type Param = cl_command_queue_info;
    const DEBUG_CONTEXT: &'static str = "clGetCommandQueueInfo";

    fn check_live(&self) -> Result<()> {
        live(self.id, "command queue").map(drop)
    }

    unsafe fn raw_info_internal(
        &self,
        param_name: Self::Param,
        param_value_size: usize,
        param_value: *mut c_void,
        param_value_size_ret: *mut usize,
    ) -> i32 {
        self.ocl.raw().CL10.clGetCommandQueueInfo(
            self.id,
            param_name,
            param_value_size,
            param_value,
            param_value_size_ret,
        )
    }
}

impl Queue {
    /// Create a command queue for the given device with default properties.
    pub fn new(context: &Context, device: &Device) -> Result<Self> {
        QueueBuilder::new(context, device).build()
    }

    /// Get the raw handle for this queue. The handle is null once the queue
    /// has been closed.
    pub fn raw(&self) -> cl_command_queue {
        self.id
    }

    /// Check whether this queue has been released.
    pub fn is_closed(&self) -> bool {
        self.id.is_null()
    }

    /// Release this queue. Calling `close` on an already closed queue does
    /// nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.id.is_null() {
            return Ok(());
        }

        let id = std::mem::replace(&mut self.id, null_mut());

        unsafe {
            wrap_result!("clReleaseCommandQueue" => self.ocl.raw().CL10.clReleaseCommandQueue(id))?;
        }

        log::trace!("Command queue released {:?}", id);
        Ok(())
    }

    /// Begin a blocking read or write command on the given buffer.
    pub fn buffer_cmd<'q, 'a, T: MemSafe>(
        &'q self,
        buffer: &'q Buffer<'a, T>,
    ) -> BufferCmd<'q, 'a, T> {
        BufferCmd {
            queue: self,
            buffer,
            offset: None,
        }
    }

    /// Issue all previously queued commands to the device.
    pub fn flush(&self) -> Result<()> {
        let id = live(self.id, "command queue")?;
        unsafe { wrap_result!("clFlush" => self.ocl.raw().CL10.clFlush(id)) }
    }

    /// Block until all previously queued commands have completed.
    pub fn finish(&self) -> Result<()> {
        let id = live(self.id, "command queue")?;
        unsafe { wrap_result!("clFinish" => self.ocl.raw().CL10.clFinish(id)) }
    }

    info_funcs! {
        pub fn context_raw(&self) -> cl_context = CL_QUEUE_CONTEXT;
        pub fn device_raw(&self) -> cl_device_id = CL_QUEUE_DEVICE;
        pub fn reference_count(&self) -> cl_uint = CL_QUEUE_REFERENCE_COUNT;
        pub fn properties(&self) -> QueueProperties = CL_QUEUE_PROPERTIES;
    }

    /// Get the device this queue submits commands to.
    pub fn device(&self) -> Result<Device> {
        self.device_raw().map(|id| Device {
            ocl: self.ocl.clone(),
            id,
        })
    }
}
