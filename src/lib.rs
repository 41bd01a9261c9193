//! Scoped-lifetime wrappers over a dynamically-loaded OpenCL runtime.
//!
//! Objects are acquired in a fixed order: a `Platform` is discovered from the
//! loaded `OpenCL` library, a `Device` is selected from the platform, and a
//! `Context` is created for the device. Command queues, buffers and programs
//! are then created from the context, and kernels from a built program.
//!
//! Every owning wrapper releases its OpenCL object exactly once, either
//! explicitly through `close` or when it is dropped.

pub extern crate dlopen;

#[macro_use]
mod macros;

pub mod buffer;
pub mod context;
pub mod device;
mod error;
pub mod kernel;
pub mod ndrange;
pub mod platform;
pub mod program;
pub mod queue;
pub mod raw;
mod runtime;
pub mod util;

pub use error::*;
pub use runtime::{load_opencl, OpenCL, LIBRARY_PATH_VAR};
