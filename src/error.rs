use crate::kernel::ArgKind;
use crate::raw::{cl_int, cl_uint, error_name, OpenCLVersion};
use std::ffi::NulError;
use std::fmt::{self, Debug, Display, Formatter};

/// An error code returned by an OpenCL API call
#[derive(thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    code: cl_int,
    context: &'static str,
}

impl ApiError {
    /// Create a new `ApiError` with the given error code and context
    pub fn new(code: cl_int, context: &'static str) -> Self {
        Self { code, context }
    }

    /// Get the raw OpenCL error code
    pub fn code(&self) -> cl_int {
        self.code
    }

    /// Get the name of the API call that failed
    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}: OpenCL error {} ({})",
            self.context,
            self.code,
            error_name(self.code).unwrap_or("unknown error code")
        )
    }
}

/// An error related to OpenCL
#[derive(thiserror::Error)]
pub enum Error {
    /// Error that occurred within an OpenCL API call
    #[error("{0}")]
    ApiError(#[from] ApiError),

    /// Error converting a flag value to a Rust enum
    #[error("Invalid flag value {value} for type {context}")]
    InvalidFlag { value: i64, context: &'static str },

    /// Data length mismatch
    #[error("Expected data length of {expected}, got data length {actual}")]
    InvalidDataLength { expected: usize, actual: usize },

    /// Unsupported system OpenCL version
    #[error("{expected} required for {context}, but system only supports {actual}")]
    UnsupportedVersion {
        expected: OpenCLVersion,
        actual: OpenCLVersion,
        context: &'static str,
    },

    /// No OpenCL object of the requested kind exists
    #[error("No OpenCL {0} found")]
    NotFound(&'static str),

    /// The wrapped OpenCL object was already released with `close`
    #[error("OpenCL {0} was already released")]
    Released(&'static str),

    /// A kernel argument index outside of the declared argument list
    #[error("Argument index {index} is out of range for kernel with {num_args} declared arguments")]
    ArgIndexOutOfRange { index: cl_uint, num_args: usize },

    /// A kernel argument value that doesn't match its declared kind
    #[error("Kernel argument #{index} is declared as {expected:?}, but a value of type {actual} was given")]
    ArgMismatch {
        index: cl_uint,
        expected: ArgKind,
        actual: String,
    },

    /// A string passed to OpenCL contained an interior NUL byte
    #[error("{0}")]
    InvalidString(#[from] NulError),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

/// An OpenCL result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{CL_BUILD_PROGRAM_FAILURE, CL_INVALID_VALUE};

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(CL_BUILD_PROGRAM_FAILURE, "clBuildProgram");
        assert_eq!(
            err.to_string(),
            "clBuildProgram: OpenCL error -11 (CL_BUILD_PROGRAM_FAILURE)"
        );
        assert_eq!(
            ApiError::new(-4242, "clFinish").to_string(),
            "clFinish: OpenCL error -4242 (unknown error code)"
        );
    }

    #[test]
    fn test_error_wraps_api_error() {
        let err: Error = ApiError::new(CL_INVALID_VALUE, "clCreateBuffer").into();

        match &err {
            Error::ApiError(e) => assert_eq!(e.code(), CL_INVALID_VALUE),
            e => panic!("unexpected error {:?}", e),
        }

        assert!(format!("{:?}", err).contains("CL_INVALID_VALUE"));
    }

    #[test]
    fn test_unsupported_version_display() {
        let err = Error::UnsupportedVersion {
            expected: OpenCLVersion::CL12,
            actual: OpenCLVersion::CL11,
            context: "clCompileProgram",
        };

        assert_eq!(
            err.to_string(),
            "OpenCL 1.2 required for clCompileProgram, but system only supports OpenCL 1.1"
        );
    }
}
