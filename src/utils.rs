pub(crate) trait GribInt<I> {
    fn as_grib_int(&self) -> I;
}

macro_rules! add_impl_for_ints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl GribInt<$ty_dst> for $ty_src {
            fn as_grib_int(&self) -> $ty_dst {
                if self.leading_zeros() == 0 {
                    let abs = (self << 1 >> 1) as $ty_dst;
                    -abs
                } else {
                    *self as $ty_dst
                }
            }
        }
    )*);
}

// GRIB2 signed fields are sign bit + magnitude, not two's complement.
add_impl_for_ints! {
    (u8, i8),
    (u16, i16),
    (u32, i32),
    (u64, i64),
}

pub(crate) struct Buffer {
    pub(crate) bytes: Vec<u8>,
    pos: usize,
}

impl Buffer {
    pub(crate) fn new(buf: Vec<u8>) -> Self {
        Self { bytes: buf, pos: 0 }
    }

    pub(crate) fn read<T: EndianRead>(&mut self) -> crate::error::Result<T> {
        let end = self.pos + std::mem::size_of::<T>();
        if end > self.bytes.len() {
            return Err(crate::error::GribError::ParseError(format!(
                "template too short: need {} octets, have {}",
                end,
                self.bytes.len()
            )));
        }
        let val = T::from_be_bytes(&self.bytes[self.pos..end]);
        self.pos = end;

        Ok(val)
    }
}

pub(crate) trait EndianRead {
    fn from_be_bytes(bytes: &[u8]) -> Self;
}

macro_rules! uint_impl {
    ($ty:ty) => {
        impl EndianRead for $ty {
            fn from_be_bytes(bytes: &[u8]) -> Self {
                <$ty>::from_be_bytes(bytes.try_into().expect("sized read"))
            }
        }
    };
}

uint_impl! { u8 }
uint_impl! { u16 }
uint_impl! { u32 }

uint_impl! { f32 }
