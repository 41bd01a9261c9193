use super::Program;
use crate::context::Context;
use crate::raw::*;
use crate::util::live;
use crate::Result;
use std::borrow::Cow;
use libc::c_char;
use std::ffi::CString;
use std::ptr::null;

/// A partially built OpenCL program
#[must_use]
pub struct ProgramBuilder<'a> {
    ctx: &'a Context,
    sources: Vec<&'a [u8]>,
    name: Cow<'a, str>,
    opts: Option<Cow<'a, str>>,
}

impl<'a> ProgramBuilder<'a> {
    /// Begin building a program with a single source file
    pub fn with_source(ctx: &'a Context, src: &'a (impl AsRef<[u8]> + ?Sized)) -> Self {
        Self::with_sources(ctx, std::iter::once(src))
    }

    /// Begin building a program from several source strings, which OpenCL
    /// concatenates in order
    pub fn with_sources<S: AsRef<[u8]> + ?Sized + 'a>(
        ctx: &'a Context,
        sources: impl IntoIterator<Item = &'a S>,
    ) -> Self {
        Self {
            ctx,
            sources: sources.into_iter().map(<S as AsRef<[u8]>>::as_ref).collect(),
            name: Cow::Borrowed(""),
            opts: None,
        }
    }

    /// Set the name of the program. When the program is used as an embedded
    /// header for `Program::compile`, this is the name it is included by.
    pub fn name(&mut self, name: impl Into<Cow<'a, str>>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Append an option to be passed to the compiler
    pub fn opt(&mut self, opts: impl Into<Cow<'a, str>>) -> &mut Self {
        push_opt(&mut self.opts, opts.into());
        self
    }

    /// Create the program from its sources without building it
    pub fn create(&self) -> Result<Program> {
        let ctx = live(self.ctx.id, "context")?;
        let strings: Vec<_> = self.sources.iter().map(|s| s.as_ptr()).collect();
        let lengths: Vec<_> = self.sources.iter().map(|s| s.len()).collect();

        unsafe {
            let mut err = CL_SUCCESS;

            let handle = self.ctx.ocl.raw().CL10.clCreateProgramWithSource(
                ctx,
                strings.len() as cl_uint,
                strings.as_ptr() as _,
                lengths.as_ptr(),
                &mut err as _,
            );

            wrap_result!("clCreateProgramWithSource" => err)?;

            let program = Program {
                ocl: self.ctx.ocl.clone(),
                handle,
                name: self.name.clone().into_owned(),
                compiled: false,
                linked: false,
            };

            log::debug!("Created program {:?} ({:?})", program.name, handle);
            Ok(program)
        }
    }

    /// Create and build the program
    pub fn build(&self) -> Result<Program> {
        let program = self.create()?;
        program.build(self.opts.as_deref().unwrap_or(""))?;
        Ok(program)
    }
}

fn push_opt<'a>(opts: &mut Option<Cow<'a, str>>, opt: Cow<'a, str>) {
    match opts {
        Some(old) => {
            *old += " ";
            *old += opt;
        }
        o => *o = Some(opt),
    };
}

/// Convert a compiler/linker option string for OpenCL, passing null for an
/// empty string
pub(super) fn options_cstring(options: &str) -> Result<Option<CString>> {
    if options.is_empty() {
        Ok(None)
    } else {
        Ok(Some(CString::new(options)?))
    }
}

pub(super) fn options_ptr(options: &Option<CString>) -> *const c_char {
    options.as_ref().map(|o| o.as_ptr()).unwrap_or(null())
}

/// Embedded headers passed to `clCompileProgram`, as parallel lists of
/// program handles and include names
pub(super) struct Headers {
    handles: Vec<cl_program>,
    _names: Vec<CString>,
    name_ptrs: Vec<*const c_char>,
}

impl Headers {
    /// Collect headers from their program handles and names, failing if any
    /// header program was already released.
    pub(super) fn new<'n>(headers: impl IntoIterator<Item = (cl_program, &'n str)>) -> Result<Self> {
        let mut handles = vec![];
        let mut names = vec![];

        for (handle, name) in headers {
            handles.push(live(handle, "program")?);
            names.push(CString::new(name)?);
        }

        // pointers into the heap storage of each name, which doesn't move
        let name_ptrs = names.iter().map(|n| n.as_ptr()).collect();

        Ok(Self {
            handles,
            _names: names,
            name_ptrs,
        })
    }

    pub(super) fn len(&self) -> cl_uint {
        self.handles.len() as cl_uint
    }

    /// Pointer to the header handles, or null if there are none
    pub(super) fn handles_ptr(&self) -> *const cl_program {
        if self.handles.is_empty() {
            null()
        } else {
            self.handles.as_ptr()
        }
    }

    /// Pointer to the header include names, or null if there are none
    pub(super) fn names_ptr(&self) -> *const *const c_char {
        if self.name_ptrs.is_empty() {
            null()
        } else {
            self.name_ptrs.as_ptr()
        }
    }
}

flag_enum! {
    pub enum ProgramBuildStatus(cl_build_status) {
        None = CL_BUILD_NONE,
        InProgress = CL_BUILD_IN_PROGRESS,
        Success = CL_BUILD_SUCCESS,
        Error = CL_BUILD_ERROR,
    }
}

flag_enum! {
    pub enum ProgramBinaryType(cl_program_binary_type) {
        None = CL_PROGRAM_BINARY_TYPE_NONE,
        CompiledObject = CL_PROGRAM_BINARY_TYPE_COMPILED_OBJECT,
        Library = CL_PROGRAM_BINARY_TYPE_LIBRARY,
        Executable = CL_PROGRAM_BINARY_TYPE_EXECUTABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::convert::TryFrom;
    use std::ffi::CStr;
    use std::ptr::null_mut;

    #[test]
    fn test_push_opt_joins_with_spaces() {
        let mut opts = None;
        push_opt(&mut opts, "-cl-fast-relaxed-math".into());
        assert_eq!(opts.as_deref(), Some("-cl-fast-relaxed-math"));

        push_opt(&mut opts, String::from("-D N=4").into());
        assert_eq!(opts.as_deref(), Some("-cl-fast-relaxed-math -D N=4"));
    }

    #[test]
    fn test_options_cstring() {
        assert!(options_cstring("").unwrap().is_none());
        assert!(options_ptr(&None).is_null());

        let opts = options_cstring("-w").unwrap();
        assert_eq!(opts.as_deref().map(|c| c.to_bytes()), Some(&b"-w"[..]));
        assert!(!options_ptr(&opts).is_null());

        match options_cstring("-D X=\0") {
            Err(Error::InvalidString(_)) => {}
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_no_headers_passed_as_null() {
        let headers = Headers::new(vec![]).unwrap();
        assert_eq!(headers.len(), 0);
        assert!(headers.handles_ptr().is_null());
        assert!(headers.names_ptr().is_null());
    }

    #[test]
    fn test_headers_named_in_order() {
        let first = 0x10 as cl_program;
        let second = 0x20 as cl_program;
        let headers = Headers::new(vec![(first, "common.h"), (second, "util/math.h")]).unwrap();

        assert_eq!(headers.len(), 2);

        unsafe {
            let handles = std::slice::from_raw_parts(headers.handles_ptr(), 2);
            assert_eq!(handles, &[first, second]);

            let names = std::slice::from_raw_parts(headers.names_ptr(), 2);
            assert_eq!(CStr::from_ptr(names[0]).to_bytes(), b"common.h");
            assert_eq!(CStr::from_ptr(names[1]).to_bytes(), b"util/math.h");
        }
    }

    #[test]
    fn test_released_or_invalid_header_rejected() {
        match Headers::new(vec![(0x10 as cl_program, "a.h"), (null_mut(), "b.h")]) {
            Err(Error::Released("program")) => {}
            r => panic!("unexpected result {:?}", r.map(|h| h.len())),
        }

        match Headers::new(vec![(0x10 as cl_program, "a\0.h")]) {
            Err(Error::InvalidString(_)) => {}
            r => panic!("unexpected result {:?}", r.map(|h| h.len())),
        }
    }

    #[test]
    fn test_build_status_from_negative_codes() {
        assert_eq!(
            ProgramBuildStatus::try_from(CL_BUILD_ERROR).unwrap(),
            ProgramBuildStatus::Error
        );
        assert_eq!(ProgramBuildStatus::InProgress.raw(), -3);

        match ProgramBuildStatus::try_from(-9) {
            Err(Error::InvalidFlag { value: -9, .. }) => {}
            r => panic!("unexpected result {:?}", r),
        }
    }
}
