extern crate easycl;

use easycl::device::DeviceType;
use easycl::load_opencl;
use easycl::platform::Platform;

pub fn main() {
    let ocl = load_opencl().unwrap();
    println!("Successfully loaded OpenCL ({})", ocl.version());

    for platform in Platform::all(&ocl).unwrap() {
        println!("Got platform {:#?}", platform);

        for device in platform.get_devices(DeviceType::ALL).unwrap() {
            println!("Got device: {:#?}", device);

            let ctx = device.create_context().unwrap();

            println!("Created context: {:#?}", ctx);
        }
    }
}
