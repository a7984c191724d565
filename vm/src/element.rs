use digit_layout::{DigitLayout, types};
use half::f16;

/// 可以存放在张量中的标量类型。
pub trait Element: Copy + Send + Sync + 'static {
    const DT: DigitLayout;

    /// 从 `bytes` 的开头读出一个值。
    fn read(bytes: &[u8]) -> Self;

    /// 把值写到 `bytes` 的开头。
    fn write(self, bytes: &mut [u8]);
}

macro_rules! impl_element {
    ($( $ty:ty => $dt:ident )+) => {
        $(
            impl Element for $ty {
                const DT: DigitLayout = types::$dt;

                fn read(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; size_of::<$ty>()];
                    buf.copy_from_slice(&bytes[..size_of::<$ty>()]);
                    Self::from_ne_bytes(buf)
                }

                fn write(self, bytes: &mut [u8]) {
                    bytes[..size_of::<$ty>()].copy_from_slice(&self.to_ne_bytes())
                }
            }
        )+
    };
}

impl_element! {
    i8  => I8
    i16 => I16
    i32 => I32
    i64 => I64
    u8  => U8
    u16 => U16
    u32 => U32
    u64 => U64
    f16 => F16
    f32 => F32
    f64 => F64
}
