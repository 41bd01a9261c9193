use easycl::device::{Device, DeviceType};
use easycl::load_opencl;
use easycl::platform::Platform;

/// Find any device to run on, or `None` if this machine has no usable
/// OpenCL runtime.
pub fn any_device() -> Option<(Platform, Device)> {
    let ocl = match load_opencl() {
        Ok(ocl) => ocl,
        Err(e) => {
            eprintln!("Skipping, OpenCL not available: {}", e);
            return None;
        }
    };

    for platform in Platform::all(&ocl).ok()? {
        if let Some(device) = platform
            .get_devices(DeviceType::ALL)
            .ok()
            .and_then(|d| d.into_iter().next())
        {
            return Some((platform, device));
        }
    }

    eprintln!("Skipping, no OpenCL devices found");
    None
}
