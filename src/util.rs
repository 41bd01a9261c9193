mod info;

pub use info::*;
pub(crate) use info::sealed;

/// Fail with `Error::Released` if the given handle was already released.
pub(crate) fn live<T>(handle: *mut T, context: &'static str) -> crate::Result<*mut T> {
    if handle.is_null() {
        Err(crate::Error::Released(context))
    } else {
        Ok(handle)
    }
}

/// The size in bytes of `count` elements of `T`, failing with
/// `Error::InvalidDataLength` if it doesn't fit in a `usize`.
pub(crate) fn byte_len<T>(count: usize) -> crate::Result<usize> {
    let size = std::mem::size_of::<T>();

    size.checked_mul(count).ok_or(crate::Error::InvalidDataLength {
        expected: usize::MAX.checked_div(size).unwrap_or(usize::MAX),
        actual: count,
    })
}

#[cfg(test)]
mod tests {
    use super::{byte_len, live};
    use crate::Error;
    use std::ptr::null_mut;

    #[test]
    fn test_live_rejects_null() {
        let mut value = 0u8;
        assert!(live(&mut value as *mut u8, "buffer").is_ok());

        match live(null_mut::<u8>(), "buffer") {
            Err(Error::Released("buffer")) => {}
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_byte_len_overflow() {
        assert_eq!(byte_len::<u32>(16).unwrap(), 64);
        assert_eq!(byte_len::<u64>(0).unwrap(), 0);

        match byte_len::<u32>(usize::MAX / 2) {
            Err(Error::InvalidDataLength { expected, actual }) => {
                assert_eq!(expected, usize::MAX / 4);
                assert_eq!(actual, usize::MAX / 2);
            }
            r => panic!("unexpected result {:?}", r),
        }
    }
}
