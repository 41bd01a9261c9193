extern crate easycl;

use easycl::device::DeviceType;
use easycl::kernel::ArgKind;
use easycl::load_opencl;
use easycl::ndrange::{EnqueueArgs, NDRange};
use easycl::platform::Platform;
use easycl::program::ProgramBuilder;
use easycl::queue::QueueBuilder;

const KERNEL: &str = r#"
__kernel void sum(__constant int *a, __constant int *b, __global int *c) {
    size_t id = get_global_id(0);
    c[id] = a[id] + b[id];
}
"#;

pub fn main() {
    let ocl = load_opencl().unwrap();
    println!("Successfully loaded OpenCL ({})", ocl.version());

    for platform in Platform::all(&ocl).unwrap() {
        println!("Got platform {:#?}", platform);

        for device in platform.get_devices(DeviceType::ALL).unwrap() {
            println!("Got device: {:#?}", device);

            let ctx = device.create_context().unwrap();

            println!("Created context: {:#?}", ctx);

            let queue = QueueBuilder::new(&ctx, &device).build().unwrap();

            println!("Created command queue: {:#?}", queue);

            let program = ProgramBuilder::with_source(&ctx, KERNEL).build().unwrap();

            println!(
                "Compiled program: {:?} {:?}",
                program,
                program.kernel_names()
            );

            let a = ctx
                .buffer_builder()
                .read_only()
                .build_copying_slice(&[1, 2, 3])
                .unwrap();

            let b = ctx
                .buffer_builder()
                .read_only()
                .build_writing_slice(&queue, &[1, 2, 3])
                .unwrap();

            let c = ctx.buffer_builder().build_with_size::<i32>(3).unwrap();

            println!("Created buffers: {:#?}", (&a, &b, &c));

            let mut kernel = program
                .create_kernel("sum", vec![ArgKind::Buffer; 3])
                .unwrap();

            kernel.set(0, &a).unwrap().set(1, &b).unwrap().set(2, &c).unwrap();

            println!("Created and bound kernel: {:#?}", kernel);

            kernel
                .enqueue(&EnqueueArgs::new(&queue, NDRange::d1(3)))
                .unwrap();

            let mut data = [0i32; 3];
            c.read(&queue, &mut data).unwrap();

            println!("Kernel output: {:?}", data);

            assert_eq!(data, [2, 4, 6]);
        }
    }
}
