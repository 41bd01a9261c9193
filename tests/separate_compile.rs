mod common;

use common::any_device;
use easycl::kernel::ArgKind;
use easycl::load_opencl;
use easycl::ndrange::{EnqueueArgs, NDRange};
use easycl::platform::Platform;
use easycl::program::{ProgramBinaryType, ProgramBuilder};
use easycl::queue::Queue;
use easycl::raw::OpenCLVersion;

const HEADER: &str = "#define SCALE 3\n";

const SOURCE: &str = r#"
#include "scale.h"

__kernel void scale(__global int *data) {
    size_t id = get_global_id(0);
    data[id] *= SCALE;
}
"#;

/// Both the loaded library and the platform itself must be OpenCL 1.2 or newer
fn supports_separate_compilation(platform: &Platform) -> bool {
    let library = load_opencl().map(|ocl| ocl.version()).ok();
    let version = platform.version().unwrap_or_default();
    let version = version.to_string_lossy();

    library >= Some(OpenCLVersion::CL12)
        && !version.starts_with("OpenCL 1.0")
        && !version.starts_with("OpenCL 1.1")
}

#[test]
fn compile_with_header_then_link() {
    let (platform, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    if !supports_separate_compilation(&platform) {
        eprintln!("Skipping, separate compilation requires OpenCL 1.2");
        return;
    }

    let ctx = device.create_context().unwrap();
    let queue = Queue::new(&ctx, &device).unwrap();

    let header = ProgramBuilder::with_source(&ctx, HEADER)
        .name("scale.h")
        .create()
        .unwrap();
    let mut program = ProgramBuilder::with_source(&ctx, SOURCE)
        .name("scale.cl")
        .create()
        .unwrap();

    assert!(!program.is_compiled());
    program.compile("", &[&header]).unwrap();
    assert!(program.is_compiled());
    assert!(!program.is_linked());

    // compiling again only warns
    program.compile("", &[&header]).unwrap();
    assert!(program.is_compiled());

    let linked = program.link("").unwrap();
    assert!(linked.is_compiled());
    assert!(linked.is_linked());
    assert_eq!(linked.name(), "scale.cl");
    assert!(!program.is_linked());

    let buffer = ctx
        .buffer_builder()
        .build_copying_slice(&[1, 2, 3, 4])
        .unwrap();

    let mut kernel = linked.create_kernel("scale", vec![ArgKind::Buffer]).unwrap();
    kernel.set(0, &buffer).unwrap();
    kernel.enqueue(&EnqueueArgs::new(&queue, NDRange::d1(4))).unwrap();
    queue.finish().unwrap();

    let mut out = [0i32; 4];
    buffer.read(&queue, &mut out).unwrap();
    assert_eq!(out, [3, 6, 9, 12]);
}

#[test]
fn link_library() {
    let (platform, device) = match any_device() {
        Some(d) => d,
        None => return,
    };

    if !supports_separate_compilation(&platform) {
        eprintln!("Skipping, separate compilation requires OpenCL 1.2");
        return;
    }

    let ctx = device.create_context().unwrap();
    let header = ProgramBuilder::with_source(&ctx, HEADER)
        .name("scale.h")
        .create()
        .unwrap();
    let mut program = ProgramBuilder::with_source(&ctx, SOURCE)
        .name("scale.cl")
        .create()
        .unwrap();
    program.compile("", &[&header]).unwrap();

    let library = program.link_library().unwrap();
    assert!(library.is_linked());
    assert_eq!(library.name(), "scale.cl");
    assert_eq!(
        library.build_info(&device).binary_type().unwrap(),
        ProgramBinaryType::Library
    );
}
