use crate::buffer::{Buffer, MemSafe};
use crate::context::Context;
use crate::device::Device;
use crate::queue::Queue;
use crate::raw::*;
use crate::util::{byte_len, live};
use crate::Result;
use std::mem::size_of_val;
use std::ptr::null_mut;

bitfield! {
    pub struct QueueProperties(cl_command_queue_properties) {
        pub const OUT_OF_ORDER_EXEC_MODE_ENABLE = CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE;
        pub const PROFILING_ENABLE = CL_QUEUE_PROFILING_ENABLE;
        pub const ON_DEVICE = CL_QUEUE_ON_DEVICE;
        pub const ON_DEVICE_DEFAULT = CL_QUEUE_ON_DEVICE_DEFAULT;
    }
}

/// Build the zero-terminated property list passed to
/// `clCreateCommandQueueWithProperties`
fn queue_property_list(
    properties: QueueProperties,
    size: Option<cl_uint>,
) -> Vec<cl_queue_properties> {
    let mut list = Vec::with_capacity(5);

    if !properties.is_empty() {
        list.push(CL_QUEUE_PROPERTIES as cl_queue_properties);
        list.push(properties.raw());
    }

    if let Some(size) = size {
        list.push(CL_QUEUE_SIZE as cl_queue_properties);
        list.push(size as cl_queue_properties);
    }

    list.push(0);
    list
}

#[derive(Debug, Clone, Copy)]
pub struct QueueBuilder<'c, 'd> {
    context: &'c Context,
    device: &'d Device,
    properties: Option<QueueProperties>,
    size: Option<cl_uint>,
}

impl<'c, 'd> QueueBuilder<'c, 'd> {
    pub fn new(context: &'c Context, device: &'d Device) -> Self {
        Self {
            context,
            device,
            properties: None,
            size: None,
        }
    }

    pub fn properties(self, properties: QueueProperties) -> Self {
        Self {
            properties: Some(properties),
            ..self
        }
    }

    /// Set the size of an on-device queue. Requires OpenCL 2.0 and the
    /// `ON_DEVICE` queue property.
    pub fn size(self, size: cl_uint) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }

    pub fn build(self) -> Result<Queue> {
        let context = live(self.context.id, "context")?;
        let ocl = &self.context.ocl;
        let props = self.properties.unwrap_or_default();

        assert!(
            self.size.is_none() || props.contains(QueueProperties::ON_DEVICE),
            "cannot set queue size unless queue property ON_DEVICE is set"
        );

        unsafe {
            let mut err = CL_SUCCESS;

            let (id, call) = match ocl.raw().CL20.as_ref() {
                Some(api) => {
                    let list = queue_property_list(props, self.size);
                    let id = api.clCreateCommandQueueWithProperties(
                        context,
                        self.device.id,
                        list.as_ptr(),
                        &mut err as _,
                    );
                    (id, "clCreateCommandQueueWithProperties")
                }
                None => {
                    if self.size.is_some() {
                        check_ocl_version!(ocl, CL20 => "clCreateCommandQueueWithProperties")?;
                    }

                    let id = ocl.raw().CL10.clCreateCommandQueue(
                        context,
                        self.device.id,
                        props.raw(),
                        &mut err as _,
                    );
                    (id, "clCreateCommandQueue")
                }
            };

            wrap_result!(call => err)?;
            log::debug!("Created command queue {:?} with {:?}", id, props);

            Ok(Queue {
                ocl: ocl.clone(),
                id,
            })
        }
    }
}

/// A blocking transfer between host memory and a buffer
#[must_use]
pub struct BufferCmd<'q, 'a, T: MemSafe> {
    pub(super) queue: &'q Queue,
    pub(super) buffer: &'q Buffer<'a, T>,
    pub(super) offset: Option<usize>,
}

impl<'q, 'a, T: MemSafe> BufferCmd<'q, 'a, T> {
    /// Set the offset within the OpenCL buffer for this memory operation, in
    /// elements of `T`.
    ///
    /// Offsets in host memory should be set using slicing.
    pub fn offset(self, offset: usize) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    fn byte_offset(&self) -> Result<usize> {
        byte_len::<T>(self.offset.unwrap_or(0))
    }

    /// Perform a blocking read of the buffer into the given slice.
    pub fn read(self, dest: &mut [T]) -> Result<()> {
        let queue = live(self.queue.id, "command queue")?;
        let mem = live(self.buffer.handle, "buffer")?;
        let offset = self.byte_offset()?;

        unsafe {
            wrap_result!("clEnqueueReadBuffer" => self.queue.ocl.raw().CL10.clEnqueueReadBuffer(
                queue,
                mem,
                CL_BLOCKING,
                offset,
                size_of_val(dest),
                dest.as_mut_ptr() as _,
                0,
                null_mut(),
                null_mut()
            ))
        }
    }

    /// Perform a blocking write of the given slice into the buffer.
    pub fn write(self, src: &[T]) -> Result<()> {
        let queue = live(self.queue.id, "command queue")?;
        let mem = live(self.buffer.handle, "buffer")?;
        let offset = self.byte_offset()?;

        unsafe {
            wrap_result!("clEnqueueWriteBuffer" => self.queue.ocl.raw().CL10.clEnqueueWriteBuffer(
                queue,
                mem,
                CL_BLOCKING,
                offset,
                size_of_val(src),
                src.as_ptr() as _,
                0,
                null_mut(),
                null_mut(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_property_list() {
        assert_eq!(queue_property_list(QueueProperties::default(), None), vec![0]);
    }

    #[test]
    fn test_property_list_with_size() {
        let props = QueueProperties::ON_DEVICE | QueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE;

        assert_eq!(
            queue_property_list(props, Some(16)),
            vec![
                CL_QUEUE_PROPERTIES as cl_queue_properties,
                CL_QUEUE_ON_DEVICE | CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE,
                CL_QUEUE_SIZE as cl_queue_properties,
                16,
                0
            ]
        );
    }
}
