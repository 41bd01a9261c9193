//! Function tables for the dynamically-loaded OpenCL library.
//!
//! The OpenCL 1.0 functions are required; functions added by later versions
//! are grouped per version and loaded optionally, which is also how the
//! supported API version of the system library is determined.

use super::*;
use libc::{c_char, c_void, size_t};

raw_functions! {
    CL10: CL10 {
        fn clGetPlatformIDs(
            num_entries: cl_uint,
            platforms: *mut cl_platform_id,
            num_platforms: *mut cl_uint,
        ) -> cl_int;

        fn clGetPlatformInfo(
            platform: cl_platform_id,
            param_name: cl_platform_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clGetDeviceIDs(
            platform: cl_platform_id,
            device_type: cl_device_type,
            num_entries: cl_uint,
            devices: *mut cl_device_id,
            num_devices: *mut cl_uint,
        ) -> cl_int;

        fn clGetDeviceInfo(
            device: cl_device_id,
            param_name: cl_device_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clCreateContext(
            properties: *const cl_context_properties,
            num_devices: cl_uint,
            devices: *const cl_device_id,
            pfn_notify: Option<ContextNotifyFn>,
            user_data: *mut c_void,
            errcode_ret: *mut cl_int,
        ) -> cl_context;

        fn clReleaseContext(context: cl_context) -> cl_int;

        fn clGetContextInfo(
            context: cl_context,
            param_name: cl_context_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clCreateCommandQueue(
            context: cl_context,
            device: cl_device_id,
            properties: cl_command_queue_properties,
            errcode_ret: *mut cl_int,
        ) -> cl_command_queue;

        fn clReleaseCommandQueue(command_queue: cl_command_queue) -> cl_int;

        fn clGetCommandQueueInfo(
            command_queue: cl_command_queue,
            param_name: cl_command_queue_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clFlush(command_queue: cl_command_queue) -> cl_int;

        fn clFinish(command_queue: cl_command_queue) -> cl_int;

        fn clCreateBuffer(
            context: cl_context,
            flags: cl_mem_flags,
            size: size_t,
            host_ptr: *mut c_void,
            errcode_ret: *mut cl_int,
        ) -> cl_mem;

        fn clReleaseMemObject(memobj: cl_mem) -> cl_int;

        fn clGetMemObjectInfo(
            memobj: cl_mem,
            param_name: cl_mem_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clEnqueueReadBuffer(
            command_queue: cl_command_queue,
            buffer: cl_mem,
            blocking_read: cl_bool,
            offset: size_t,
            size: size_t,
            ptr: *mut c_void,
            num_events_in_wait_list: cl_uint,
            event_wait_list: *const cl_event,
            event: *mut cl_event,
        ) -> cl_int;

        fn clEnqueueWriteBuffer(
            command_queue: cl_command_queue,
            buffer: cl_mem,
            blocking_write: cl_bool,
            offset: size_t,
            size: size_t,
            ptr: *const c_void,
            num_events_in_wait_list: cl_uint,
            event_wait_list: *const cl_event,
            event: *mut cl_event,
        ) -> cl_int;

        fn clCreateProgramWithSource(
            context: cl_context,
            count: cl_uint,
            strings: *const *const c_char,
            lengths: *const size_t,
            errcode_ret: *mut cl_int,
        ) -> cl_program;

        fn clBuildProgram(
            program: cl_program,
            num_devices: cl_uint,
            device_list: *const cl_device_id,
            options: *const c_char,
            pfn_notify: Option<ProgramNotifyFn>,
            user_data: *mut c_void,
        ) -> cl_int;

        fn clReleaseProgram(program: cl_program) -> cl_int;

        fn clGetProgramInfo(
            program: cl_program,
            param_name: cl_program_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clGetProgramBuildInfo(
            program: cl_program,
            device: cl_device_id,
            param_name: cl_program_build_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clCreateKernel(
            program: cl_program,
            kernel_name: *const c_char,
            errcode_ret: *mut cl_int,
        ) -> cl_kernel;

        fn clSetKernelArg(
            kernel: cl_kernel,
            arg_index: cl_uint,
            arg_size: size_t,
            arg_value: *const c_void,
        ) -> cl_int;

        fn clReleaseKernel(kernel: cl_kernel) -> cl_int;

        fn clGetKernelInfo(
            kernel: cl_kernel,
            param_name: cl_kernel_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clEnqueueNDRangeKernel(
            command_queue: cl_command_queue,
            kernel: cl_kernel,
            work_dim: cl_uint,
            global_work_offset: *const size_t,
            global_work_size: *const size_t,
            local_work_size: *const size_t,
            num_events_in_wait_list: cl_uint,
            event_wait_list: *const cl_event,
            event: *mut cl_event,
        ) -> cl_int;
    }

    CL11: Option<CL11> {
        fn clCreateSubBuffer(
            buffer: cl_mem,
            flags: cl_mem_flags,
            buffer_create_type: cl_buffer_create_type,
            buffer_create_info: *const c_void,
            errcode_ret: *mut cl_int,
        ) -> cl_mem;
    }

    CL12: Option<CL12> {
        fn clCompileProgram(
            program: cl_program,
            num_devices: cl_uint,
            device_list: *const cl_device_id,
            options: *const c_char,
            num_input_headers: cl_uint,
            input_headers: *const cl_program,
            header_include_names: *const *const c_char,
            pfn_notify: Option<ProgramNotifyFn>,
            user_data: *mut c_void,
        ) -> cl_int;

        fn clLinkProgram(
            context: cl_context,
            num_devices: cl_uint,
            device_list: *const cl_device_id,
            options: *const c_char,
            num_input_programs: cl_uint,
            input_programs: *const cl_program,
            pfn_notify: Option<ProgramNotifyFn>,
            user_data: *mut c_void,
            errcode_ret: *mut cl_int,
        ) -> cl_program;

        fn clGetKernelArgInfo(
            kernel: cl_kernel,
            arg_index: cl_uint,
            param_name: cl_kernel_arg_info,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;

        fn clUnloadPlatformCompiler(platform: cl_platform_id) -> cl_int;
    }

    CL20: Option<CL20> {
        fn clCreateCommandQueueWithProperties(
            context: cl_context,
            device: cl_device_id,
            properties: *const cl_queue_properties,
            errcode_ret: *mut cl_int,
        ) -> cl_command_queue;
    }
}

impl RawOpenCL {
    /// Determine the highest OpenCL version for which every function group up
    /// to and including that version was loaded.
    pub fn version(&self) -> OpenCLVersion {
        if self.CL11.is_none() {
            OpenCLVersion::CL10
        } else if self.CL12.is_none() {
            OpenCLVersion::CL11
        } else if self.CL20.is_none() {
            OpenCLVersion::CL12
        } else {
            OpenCLVersion::CL20
        }
    }
}
