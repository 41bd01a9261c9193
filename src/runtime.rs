//! Loading the system OpenCL library
//!
//! All OpenCL entry points are resolved at runtime, so the crate can be built
//! and linked on systems without an OpenCL driver installed. Every wrapper
//! object keeps a clone of the `OpenCL` handle it was created from, which
//! keeps the library loaded for as long as any object is alive.

use crate::raw::{OpenCLVersion, RawOpenCL};
use dlopen::wrapper::Container;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Environment variable used to override the path of the OpenCL library
pub const LIBRARY_PATH_VAR: &str = "OPENCL_LIBRARY";

#[cfg(target_os = "windows")]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["OpenCL.dll"];

#[cfg(target_os = "macos")]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["/System/Library/Frameworks/OpenCL.framework/OpenCL"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

/// The library paths to try, in order. An override path replaces the
/// platform defaults entirely.
fn library_candidates(override_path: Option<OsString>) -> Vec<OsString> {
    match override_path {
        Some(path) => vec![path],
        None => DEFAULT_LIBRARY_NAMES.iter().map(OsString::from).collect(),
    }
}

lazy_static::lazy_static! {
    static ref SHARED: Result<OpenCL, dlopen::Error> = OpenCL::load();
}

/// A handle to a loaded OpenCL library
#[derive(Clone)]
pub struct OpenCL {
    lib: Arc<Container<RawOpenCL>>,
    version: OpenCLVersion,
}

impl Debug for OpenCL {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("OpenCL")
            .field("version", &self.version)
            .finish()
    }
}

impl OpenCL {
    /// Load the system OpenCL library.
    ///
    /// If the `OPENCL_LIBRARY` environment variable is set, only that path is
    /// tried. Otherwise the default library names for the current platform
    /// are tried in order, and the error from the last attempt is returned if
    /// none of them can be loaded.
    pub fn load() -> Result<Self, dlopen::Error> {
        let override_path = env::var_os(LIBRARY_PATH_VAR);

        if let Some(path) = &override_path {
            log::debug!("Loading OpenCL from {}={:?}", LIBRARY_PATH_VAR, path);
        }

        let mut last_err = None;

        for name in library_candidates(override_path) {
            match unsafe { Self::load_from(&name) } {
                Ok(ocl) => return Ok(ocl),
                Err(e) => {
                    log::debug!("Could not load OpenCL from {:?}: {}", name, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(dlopen::Error::NullSymbol))
    }

    /// Load an OpenCL library from the given path.
    ///
    /// # Safety
    ///
    /// The library must be an OpenCL implementation (or ICD loader) exporting
    /// functions with the signatures declared in `raw::functions`. Loading an
    /// arbitrary library may run its initialization code.
    pub unsafe fn load_from(path: impl AsRef<OsStr>) -> Result<Self, dlopen::Error> {
        let lib: Container<RawOpenCL> = Container::load(path.as_ref())?;
        let version = lib.version();

        log::debug!(
            "Loaded OpenCL library {:?} ({})",
            path.as_ref(),
            version
        );

        Ok(Self {
            lib: Arc::new(lib),
            version,
        })
    }

    /// Get the raw function table of this library.
    pub fn raw(&self) -> &RawOpenCL {
        &self.lib
    }

    /// Get the highest OpenCL API version this library provides.
    pub fn version(&self) -> OpenCLVersion {
        self.version
    }
}

/// Get the process-wide OpenCL library, loading it on first use.
pub fn load_opencl() -> Result<OpenCL, &'static dlopen::Error> {
    SHARED.as_ref().map(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_replaces_default_names() {
        let path = OsString::from("/opt/vendor/lib/libOpenCL.so");
        assert_eq!(library_candidates(Some(path.clone())), vec![path]);

        let defaults = library_candidates(None);
        assert_eq!(defaults.len(), DEFAULT_LIBRARY_NAMES.len());
        assert_eq!(defaults[0], DEFAULT_LIBRARY_NAMES[0]);
    }

    #[test]
    fn test_load_from_missing_library_fails() {
        let result = unsafe { OpenCL::load_from("/nonexistent/libOpenCL-missing.so") };
        assert!(result.is_err());
    }

    #[test]
    fn test_load_honours_override_variable() {
        let previous = env::var_os(LIBRARY_PATH_VAR);
        env::set_var(LIBRARY_PATH_VAR, "/nonexistent/libOpenCL-missing.so");

        let result = OpenCL::load();

        match previous {
            Some(value) => env::set_var(LIBRARY_PATH_VAR, value),
            None => env::remove_var(LIBRARY_PATH_VAR),
        }

        assert!(result.is_err());
    }
}
