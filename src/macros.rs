/// Create a new opaque type
macro_rules! opaque_type {
    ( $name:ident ) => {
        #[doc(hidden)]
        pub struct $name {
            _opaque: (),
        }
    };

    ( $( $name:ident),* $(,)? ) => {
        $( opaque_type!{$name} )*
    };
}

/// Define OpenCL error code constants and a function to get the name of an
/// error code
macro_rules! error_codes {
    ( $($name:ident = $value:expr),* $(,)? ) => {
        $( pub const $name: i32 = $value; )*

        /// Get the name of an OpenCL error code, returning `None` if the error
        /// code is unknown
        pub fn error_name(code: i32) -> Option<&'static str> {
            match code {
                $($name => Some(stringify!($name)),)*
                _ => None,
            }
        }
    };
}

/// Define raw OpenCL function bindings
macro_rules! raw_functions {
    (
        $(
             $apiname:ident : $apity:ty {
                $(
                    fn $fname:ident ( $( $pname:ident : $pty:ty ),* $(,)? ) $( -> $rty:ty )? ;
                )*
            }
        )*
    ) => {
        use dlopen_derive::{WrapperApi, WrapperMultiApi};
        use dlopen::wrapper::{WrapperApi, WrapperMultiApi};

        $(
            #[derive(WrapperApi)]
            pub struct $apiname {
                $(
                    $fname: unsafe extern "C" fn ( $( $pname : $pty ),* ) $( -> $rty )*
                ),*
            }

            impl std::fmt::Debug for $apiname {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.debug_struct(stringify!($apiname))
                        $( .field(stringify!($fname), &(self.$fname as *const ())) )*
                        .finish()
                }
            }
        )*

        #[derive(Debug, WrapperMultiApi)]
        pub struct RawOpenCL {
            $( pub $apiname: $apity, )*
        }
    }
}

/// Convert an OpenCL status code into a `Result`, recording the name of the
/// API call for context
macro_rules! wrap_result {
    ( $ctx:expr => $e:expr ) => {
        match $e {
            crate::raw::CL_SUCCESS => Ok(()),
            e => Err(crate::Error::from(crate::ApiError::new(e, $ctx))),
        }
    };
}

/// Get an optional group of OpenCL functions, or fail with
/// `Error::UnsupportedVersion` if the loaded runtime doesn't provide it
macro_rules! check_ocl_version {
    ( $ocl:expr, $ver:ident => $ctx:expr ) => {
        match $ocl.raw().$ver.as_ref() {
            Some(api) => Ok(api),
            None => Err(crate::Error::UnsupportedVersion {
                expected: crate::raw::OpenCLVersion::$ver,
                actual: $ocl.version(),
                context: $ctx,
            }),
        }
    };
}

/// Define typed info getters for an OpenCL object, along with an `info_fmt`
/// function listing all of them for `Debug` output
macro_rules! info_funcs {
    (
        $(
            $( #[ $outer:meta ] )*
            pub fn $name:ident(&self) -> $ret:ty = $param:ident;
        )*
    ) => {
        $(
            $( #[ $outer ] )*
            pub fn $name(&self) -> crate::Result<$ret> {
                crate::util::OclInfo::get_info::<$ret>(self, crate::raw::$param)
            }
        )*

        pub(crate) fn info_fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.debug_struct(&tynm::type_name::<Self>())
                $( .field(stringify!($name), &self.$name()) )*
                .finish()
        }
    };
}

/// Define a bitfield type wrapping an OpenCL flags value
macro_rules! bitfield {
    (
        $( #[ $outer:meta ] )*
        pub struct $name:ident($raw:ty) {
            $(
                $( #[ $inner:meta ] )*
                pub const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $( #[ $outer ] )*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($raw);

        impl $name {
            $(
                $( #[ $inner ] )*
                pub const $flag: $name = $name($value);
            )*

            /// Wrap a raw flags value
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Get the raw flags value
            pub const fn raw(self) -> $raw {
                self.0
            }

            /// Check whether all flags set in `other` are also set in `self`
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let mut first = true;
                write!(f, "{}(", stringify!($name))?;
                $(
                    if Self::$flag.0 != 0 && self.contains(Self::$flag) {
                        if !first {
                            f.write_str(" | ")?;
                        }
                        f.write_str(stringify!($flag))?;
                        first = false;
                    }
                )*
                if first {
                    write!(f, "{:#x}", self.0)?;
                }
                f.write_str(")")
            }
        }

        impl crate::util::FromOclInfo for $name {
            fn read<T: crate::util::OclInfo>(from: &T, param_name: T::Param) -> crate::Result<Self> {
                <$raw as crate::util::FromOclInfo>::read(from, param_name).map(Self)
            }
        }
    };
}

/// Define an enum with a one-to-one mapping onto OpenCL constant values
macro_rules! flag_enum {
    (
        $( #[ $outer:meta ] )*
        pub enum $name:ident($raw:ty) {
            $(
                $( #[ $inner:meta ] )*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $( #[ $outer ] )*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $( #[ $inner ] )*
                $variant
            ),*
        }

        impl $name {
            /// Get the raw OpenCL value of this variant
            pub fn raw(self) -> $raw {
                match self {
                    $( Self::$variant => $value ),*
                }
            }
        }

        impl std::convert::TryFrom<$raw> for $name {
            type Error = crate::Error;

            fn try_from(value: $raw) -> crate::Result<Self> {
                $(
                    if value == $value {
                        return Ok($name::$variant);
                    }
                )*

                Err(crate::Error::InvalidFlag {
                    value: value as i64,
                    context: stringify!($name),
                })
            }
        }

        impl crate::util::FromOclInfo for $name {
            fn read<T: crate::util::OclInfo>(from: &T, param_name: T::Param) -> crate::Result<Self> {
                let raw = <$raw as crate::util::FromOclInfo>::read(from, param_name)?;
                <Self as std::convert::TryFrom<$raw>>::try_from(raw)
            }
        }
    };
}
