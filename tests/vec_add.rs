mod common;

use common::any_device;
use easycl::buffer::MemAccess;
use easycl::device::DeviceType;
use easycl::kernel::ArgKind;
use easycl::ndrange::{EnqueueArgs, NDRange};
use easycl::platform::Platform;
use easycl::program::ProgramBuilder;
use easycl::queue::Queue;
use easycl::raw::CL_BUILD_PROGRAM_FAILURE;
use easycl::Error;

const KERNEL: &str = r#"
__kernel void vec_add(__global const int *a, __global const int *b, __global int *c, int scale) {
    size_t id = get_global_id(0);
    c[id] = (a[id] + b[id]) * scale;
}
"#;

#[test]
fn vec_add() {
    let (platform, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ctx = easycl::context::Context::new(&platform, &device).unwrap();
    let queue = Queue::new(&ctx, &device).unwrap();

    let program = ProgramBuilder::with_source(&ctx, KERNEL)
        .name("vec_add.cl")
        .build()
        .unwrap();
    assert_eq!(program.name(), "vec_add.cl");

    let a = ctx
        .buffer_builder()
        .read_only()
        .build_copying_slice(&[1, 2, 3, 4])
        .unwrap();

    let mut b_host = [10, 20, 30, 40];
    let b = ctx
        .buffer_builder()
        .read_only()
        .build_using_slice(&mut b_host)
        .unwrap();

    let c = ctx
        .buffer_builder()
        .access(MemAccess::WriteOnly)
        .build_with_size::<i32>(4)
        .unwrap();

    let mut kernel = program
        .create_kernel(
            "vec_add",
            vec![ArgKind::Buffer, ArgKind::Buffer, ArgKind::Buffer, ArgKind::Int],
        )
        .unwrap();

    kernel
        .set(0, &a)
        .unwrap()
        .set(1, &b)
        .unwrap()
        .set(2, &c)
        .unwrap()
        .set(3, &2i32)
        .unwrap();

    kernel.enqueue(&EnqueueArgs::new(&queue, NDRange::d1(4))).unwrap();
    queue.flush().unwrap();
    queue.finish().unwrap();

    let mut out = [0i32; 4];
    c.read(&queue, &mut out).unwrap();
    assert_eq!(out, [22, 44, 66, 88]);

    // read back the tail only, at an element offset
    let mut tail = [0i32; 2];
    queue.buffer_cmd(&c).offset(2).read(&mut tail).unwrap();
    assert_eq!(tail, [66, 88]);
}

#[test]
fn set_rejects_undeclared_and_mismatched_args() {
    let (_, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ctx = device.create_context().unwrap();
    let program = ProgramBuilder::with_source(&ctx, KERNEL).build().unwrap();
    let mut kernel = program
        .create_kernel(
            "vec_add",
            vec![ArgKind::Buffer, ArgKind::Buffer, ArgKind::Buffer, ArgKind::Int],
        )
        .unwrap();

    match kernel.set(4, &1i32) {
        Err(Error::ArgIndexOutOfRange { index: 4, num_args: 4 }) => {}
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }

    match kernel.set(3, &1.0f64) {
        Err(Error::ArgMismatch { index: 3, expected: ArgKind::Int, .. }) => {}
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }

    match kernel.set(0, &7i32) {
        Err(Error::ArgMismatch { index: 0, expected: ArgKind::Buffer, .. }) => {}
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }
}

#[test]
fn close_is_idempotent() {
    let (_, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let mut ctx = device.create_context().unwrap();
    let mut queue = Queue::new(&ctx, &device).unwrap();
    let mut buffer = ctx.buffer_builder().build_with_size::<f32>(16).unwrap();
    let mut program = ProgramBuilder::with_source(&ctx, KERNEL).build().unwrap();
    let mut kernel = program.create_kernel("vec_add", vec![]).unwrap();

    assert_eq!(buffer.len(), 16);
    assert_eq!(buffer.size().unwrap(), 16 * 4);

    // a closed buffer can no longer be bound or read
    buffer.close().unwrap();
    assert!(buffer.is_closed());
    buffer.close().unwrap();

    let mut dest = [0f32; 16];
    match buffer.read(&queue, &mut dest) {
        Err(Error::Released("buffer")) => {}
        r => panic!("unexpected result {:?}", r),
    }

    kernel.close().unwrap();
    kernel.close().unwrap();
    assert!(kernel.is_closed());
    assert_eq!(kernel.arg_info(2).index(), 2);
    assert!(kernel.arg_info(2).address_qualifier().is_err());

    program.close().unwrap();
    program.close().unwrap();
    assert!(program.is_closed());

    queue.close().unwrap();
    queue.close().unwrap();
    assert!(queue.finish().is_err());

    ctx.close().unwrap();
    ctx.close().unwrap();
    assert!(ctx.is_closed());
}

#[test]
fn writing_slice_initializes_buffer() {
    let (_, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ctx = device.create_context().unwrap();
    let queue = Queue::new(&ctx, &device).unwrap();

    let buffer = ctx
        .buffer_builder()
        .build_writing_slice(&queue, &[1.5f32, 2.5, 3.5])
        .unwrap();
    assert_eq!(buffer.len(), 3);

    let mut out = [0f32; 3];
    buffer.read(&queue, &mut out).unwrap();
    assert_eq!(out, [1.5, 2.5, 3.5]);
}

#[test]
fn oversized_buffer_rejected() {
    let (_, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ctx = device.create_context().unwrap();

    match ctx.buffer_builder().build_with_size::<u64>(usize::MAX / 4) {
        Err(Error::InvalidDataLength { .. }) => {}
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn build_failure_returns_driver_error() {
    let (_, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ctx = device.create_context().unwrap();

    match ProgramBuilder::with_source(&ctx, "__kernel void broken( {")
        .name("broken.cl")
        .build()
    {
        Err(Error::ApiError(e)) => {
            assert_eq!(e.code(), CL_BUILD_PROGRAM_FAILURE);
            assert_eq!(e.context(), "clBuildProgram");
        }
        r => panic!("unexpected result {:?}", r),
    }
}

#[test]
fn first_platform_and_device() {
    let (platform, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    let ocl = easycl::load_opencl().unwrap();
    assert!(Platform::all(&ocl).unwrap().contains(&Platform::first(&ocl).unwrap()));

    let first = platform.first_device(DeviceType::ALL).unwrap();
    assert_eq!(first, device);

    // a platform without devices of the requested type reports NotFound
    for typ in &[DeviceType::GPU, DeviceType::CPU, DeviceType::ACCELERATOR] {
        if platform.get_devices(*typ).unwrap().is_empty() {
            match platform.first_device(*typ) {
                Err(Error::NotFound("device")) => {}
                r => panic!("unexpected result {:?}", r),
            }
        }
    }
}
