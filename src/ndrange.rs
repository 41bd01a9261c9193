//! N-dimensional ranges for kernel launches

use crate::queue::Queue;
use crate::raw::cl_uint;
use libc::size_t;

/// An N-dimensional range of up to three dimensions. Unused dimensions have a
/// size of 1, except in the empty range where all sizes are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NDRange {
    pub dims: cl_uint,
    pub sizes: [size_t; 3],
}

impl NDRange {
    /// The empty range. When used as an offset or local size, OpenCL's
    /// default is used instead.
    pub const fn d0() -> Self {
        Self {
            dims: 0,
            sizes: [0, 0, 0],
        }
    }

    pub const fn d1(x: size_t) -> Self {
        Self {
            dims: 1,
            sizes: [x, 1, 1],
        }
    }

    pub const fn d2(x: size_t, y: size_t) -> Self {
        Self {
            dims: 2,
            sizes: [x, y, 1],
        }
    }

    pub const fn d3(x: size_t, y: size_t, z: size_t) -> Self {
        Self {
            dims: 3,
            sizes: [x, y, z],
        }
    }

    /// The total number of work items covered by this range
    pub fn len(&self) -> size_t {
        if self.dims == 0 {
            0
        } else {
            self.sizes[..self.dims as usize].iter().product()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NDRange {
    fn default() -> Self {
        Self::d0()
    }
}

impl From<size_t> for NDRange {
    fn from(x: size_t) -> Self {
        Self::d1(x)
    }
}

impl From<[size_t; 2]> for NDRange {
    fn from([x, y]: [size_t; 2]) -> Self {
        Self::d2(x, y)
    }
}

impl From<[size_t; 3]> for NDRange {
    fn from([x, y, z]: [size_t; 3]) -> Self {
        Self::d3(x, y, z)
    }
}

/// Everything needed to launch a kernel: the queue to submit it to, and the
/// offset, global and local ranges
#[derive(Debug, Clone, Copy)]
pub struct EnqueueArgs<'q> {
    pub queue: &'q Queue,
    pub offset: NDRange,
    pub global: NDRange,
    pub local: NDRange,
}

impl<'q> EnqueueArgs<'q> {
    /// Launch over `global` with no offset and an implementation-defined
    /// local size
    pub fn new(queue: &'q Queue, global: impl Into<NDRange>) -> Self {
        Self::with_offset(queue, NDRange::d0(), global, NDRange::d0())
    }

    /// Launch over `global` in work groups of size `local`, with no offset
    pub fn with_local(
        queue: &'q Queue,
        global: impl Into<NDRange>,
        local: impl Into<NDRange>,
    ) -> Self {
        Self::with_offset(queue, NDRange::d0(), global, local)
    }

    /// Launch over `global` starting at `offset`, in work groups of size
    /// `local`
    pub fn with_offset(
        queue: &'q Queue,
        offset: impl Into<NDRange>,
        global: impl Into<NDRange>,
        local: impl Into<NDRange>,
    ) -> Self {
        Self {
            queue,
            offset: offset.into(),
            global: global.into(),
            local: local.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_match_number_of_sizes() {
        assert_eq!(NDRange::d0().dims, 0);
        assert_eq!(NDRange::d1(16), NDRange { dims: 1, sizes: [16, 1, 1] });
        assert_eq!(NDRange::d2(16, 8), NDRange { dims: 2, sizes: [16, 8, 1] });
        assert_eq!(NDRange::d3(16, 8, 2), NDRange { dims: 3, sizes: [16, 8, 2] });
    }

    #[test]
    fn test_len() {
        assert_eq!(NDRange::d0().len(), 0);
        assert!(NDRange::default().is_empty());
        assert_eq!(NDRange::d1(7).len(), 7);
        assert_eq!(NDRange::d3(4, 3, 2).len(), 24);
        assert!(NDRange::d2(4, 0).is_empty());
    }

    #[test]
    fn test_from_sizes() {
        assert_eq!(NDRange::from(32), NDRange::d1(32));
        assert_eq!(NDRange::from([32, 2]), NDRange::d2(32, 2));
        assert_eq!(NDRange::from([32, 2, 3]), NDRange::d3(32, 2, 3));
    }
}
