use crate::raw::{cl_bool, cl_int, cl_uint, cl_ulong, CL_FALSE};
use crate::{Error, Result};
use generic_array::typenum::{U4, U8};
use generic_array::{ArrayLength, GenericArray};
use libc::size_t;
use sealed::OclInfoInternal;
use std::convert::TryInto;
use std::ffi::CString;
use std::mem::size_of;
use std::ptr::null_mut;

#[cfg(target_pointer_width = "64")]
type SizeTLen = U8;

#[cfg(target_pointer_width = "32")]
type SizeTLen = U4;

pub(crate) mod sealed {
    use crate::raw::cl_int;
    use libc::size_t;
    use std::ffi::c_void;

    pub trait OclInfoInternal {
        type Param: Copy;

        const DEBUG_CONTEXT: &'static str;

        /// Fail with `Error::Released` if the underlying handle was released
        fn check_live(&self) -> crate::Result<()> {
            Ok(())
        }

        unsafe fn raw_info_internal(
            &self,
            param_name: Self::Param,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int;
    }
}

/// A trait implemented by OpenCL wrapper types to provide access to OpenCL
/// information functions
pub trait OclInfo: sealed::OclInfoInternal {
    /// Get raw binary info from OpenCL about this object.
    ///
    /// This function performs two calls to the underlying `clGet___Info`
    /// function - one to determine the size of the information, and one to read
    /// the data once an appropriately-sized vector has been allocated to store
    /// it. If the reported size of the data changes between the two calls,
    /// `Error::InvalidDataLength` will be returned.
    fn get_info_raw(&self, param_name: Self::Param) -> Result<Vec<u8>> {
        self.check_live()?;

        unsafe {
            let mut size = 0;

            wrap_result!(Self::DEBUG_CONTEXT => self.raw_info_internal(
                param_name,
                0,
                null_mut(),
                &mut size as _
            ))?;

            let mut data = vec![0u8; size as usize];

            wrap_result!(Self::DEBUG_CONTEXT => self.raw_info_internal(
                param_name,
                size,
                data.as_mut_ptr() as *mut _,
                &mut size as _
            ))?;

            if data.len() != size {
                return Err(Error::InvalidDataLength {
                    expected: data.len(),
                    actual: size,
                });
            }

            Ok(data)
        }
    }

    /// Get raw binary info from OpenCL about this object, with a constant size.
    ///
    /// If the size of the data as reported by OpenCL doesn't match the expected
    /// size as specified by the generic parameter, `Error::InvalidDataLength`
    /// will be returned.
    fn get_info_raw_sized<L: ArrayLength<u8>>(
        &self,
        param_name: Self::Param,
    ) -> Result<GenericArray<u8, L>> {
        self.check_live()?;

        unsafe {
            let mut array = GenericArray::default();
            let mut size_ret = 0;

            wrap_result!(Self::DEBUG_CONTEXT => self.raw_info_internal(
                param_name,
                L::USIZE,
                array.as_mut_ptr() as _,
                &mut size_ret as _
            ))?;

            if L::USIZE != size_ret {
                return Err(Error::InvalidDataLength {
                    expected: L::USIZE,
                    actual: size_ret,
                });
            }

            Ok(array)
        }
    }

    /// Get information about this object from OpenCL.
    ///
    /// This function will automatically convert the data to the type specified
    /// by the type parameter, but it's up to the programmer to ensure that this
    /// is the appropriate type for the given parameter.
    fn get_info<T: FromOclInfo>(&self, param_name: Self::Param) -> Result<T>
    where
        Self: Sized,
    {
        T::read(self, param_name)
    }
}

impl<T: sealed::OclInfoInternal> OclInfo for T {}

/// A trait to get OpenCL information and automatically convert it to a more
/// useful type.
pub trait FromOclInfo: Sized {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self>;
}

impl FromOclInfo for Vec<u8> {
    fn read<T: OclInfo>(from: &T, param_name: <T as OclInfoInternal>::Param) -> Result<Self> {
        from.get_info_raw(param_name)
    }
}

impl FromOclInfo for CString {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
        let mut data = from.get_info_raw(param_name)?;

        if let Some(i) = data.iter().copied().position(|b| b == b'\0') {
            data.truncate(i);
        }

        Ok(CString::new(data)?)
    }
}

macro_rules! sized_info {
    ( $( $ty:ty => $len:ty ),* $(,)? ) => {
        $(
            impl FromOclInfo for $ty {
                fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
                    let data = from.get_info_raw_sized::<$len>(param_name)?;
                    let mut bytes = [0u8; size_of::<$ty>()];
                    bytes.copy_from_slice(data.as_slice());
                    Ok(<$ty>::from_ne_bytes(bytes))
                }
            }
        )*
    };
}

sized_info! {
    cl_int => U4,
    cl_uint => U4,
    cl_ulong => U8,
    size_t => SizeTLen,
}

impl FromOclInfo for bool {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
        cl_bool::read(from, param_name).map(|b| b != CL_FALSE)
    }
}

impl FromOclInfo for Vec<size_t> {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
        let raw = from.get_info_raw(param_name)?;
        raw.chunks(size_of::<size_t>())
            .map(|c| {
                c.try_into()
                    .map(size_t::from_ne_bytes)
                    .map_err(|_| Error::InvalidDataLength {
                        expected: size_of::<size_t>(),
                        actual: c.len(),
                    })
            })
            .collect()
    }
}

impl<P> FromOclInfo for *mut P {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
        size_t::read(from, param_name).map(|p| p as _)
    }
}

impl<P> FromOclInfo for Vec<*mut P> {
    fn read<T: OclInfo>(from: &T, param_name: T::Param) -> Result<Self> {
        Ok(Vec::<size_t>::read(from, param_name)?
            .into_iter()
            .map(|p| p as _)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{cl_uint, CL_INVALID_VALUE, CL_SUCCESS, CL_TRUE};
    use std::collections::HashMap;
    use std::ffi::c_void;
    use std::ptr::copy_nonoverlapping;

    /// Serves info queries from a map instead of an OpenCL driver
    struct FakeInfo(HashMap<cl_uint, Vec<u8>>);

    impl sealed::OclInfoInternal for FakeInfo {
        type Param = cl_uint;
        const DEBUG_CONTEXT: &'static str = "clGetFakeInfo";

        unsafe fn raw_info_internal(
            &self,
            param_name: cl_uint,
            param_value_size: size_t,
            param_value: *mut c_void,
            param_value_size_ret: *mut size_t,
        ) -> cl_int {
            let data = match self.0.get(&param_name) {
                Some(d) => d,
                None => return CL_INVALID_VALUE,
            };

            if !param_value.is_null() {
                if param_value_size < data.len() {
                    return CL_INVALID_VALUE;
                }
                copy_nonoverlapping(data.as_ptr(), param_value as *mut u8, data.len());
            }

            if !param_value_size_ret.is_null() {
                *param_value_size_ret = data.len();
            }

            CL_SUCCESS
        }
    }

    fn fake(entries: &[(cl_uint, Vec<u8>)]) -> FakeInfo {
        FakeInfo(entries.iter().cloned().collect())
    }

    #[test]
    fn test_read_string_truncates_at_nul() {
        let info = fake(&[(1, b"Portable Computing Language\0garbage".to_vec())]);
        let s: CString = info.get_info(1).unwrap();
        assert_eq!(s.to_str().unwrap(), "Portable Computing Language");
    }

    #[test]
    fn test_read_scalars() {
        let info = fake(&[
            (1, 42u32.to_ne_bytes().to_vec()),
            (2, 1u64.wrapping_shl(40).to_ne_bytes().to_vec()),
            (3, CL_TRUE.to_ne_bytes().to_vec()),
            (4, (-2i32).to_ne_bytes().to_vec()),
        ]);

        assert_eq!(info.get_info::<cl_uint>(1).unwrap(), 42);
        assert_eq!(info.get_info::<cl_ulong>(2).unwrap(), 1 << 40);
        assert!(info.get_info::<bool>(3).unwrap());
        assert_eq!(info.get_info::<cl_int>(4).unwrap(), -2);
    }

    #[test]
    fn test_read_size_list() {
        let bytes: Vec<u8> = [1024usize, 64, 1]
            .iter()
            .flat_map(|s| s.to_ne_bytes().to_vec())
            .collect();
        let info = fake(&[(1, bytes)]);

        assert_eq!(info.get_info::<Vec<size_t>>(1).unwrap(), vec![1024, 64, 1]);
    }

    #[test]
    fn test_sized_read_rejects_wrong_length() {
        let info = fake(&[(1, vec![0u8; 2])]);

        match info.get_info::<cl_uint>(1) {
            Err(Error::ApiError(e)) => assert_eq!(e.code(), CL_INVALID_VALUE),
            Err(Error::InvalidDataLength { .. }) => {}
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_missing_param_is_api_error() {
        let info = fake(&[]);

        match info.get_info::<CString>(7) {
            Err(Error::ApiError(e)) => {
                assert_eq!(e.code(), CL_INVALID_VALUE);
                assert_eq!(e.context(), "clGetFakeInfo");
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    struct ReleasedInfo;

    impl sealed::OclInfoInternal for ReleasedInfo {
        type Param = cl_uint;
        const DEBUG_CONTEXT: &'static str = "clGetFakeInfo";

        fn check_live(&self) -> Result<()> {
            Err(Error::Released("fake object"))
        }

        unsafe fn raw_info_internal(
            &self,
            _param_name: cl_uint,
            _param_value_size: size_t,
            _param_value: *mut c_void,
            _param_value_size_ret: *mut size_t,
        ) -> cl_int {
            panic!("info query reached the driver for a released object")
        }
    }

    #[test]
    fn test_released_object_never_queried() {
        match ReleasedInfo.get_info::<cl_uint>(1) {
            Err(Error::Released("fake object")) => {}
            r => panic!("unexpected result {:?}", r),
        }

        assert!(ReleasedInfo.get_info::<CString>(1).is_err());
    }
}
