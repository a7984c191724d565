use super::binary;
use crate::CpuVM;
use digit_layout::types;
use half::f16;
use log::trace;
use vm::{
    Element, Tensor, VirtualMachine, VmError, broadcast_shape,
    op::{Rem, RemMode},
};

impl Rem for CpuVM {
    fn rem(&self, a: &Tensor, b: &Tensor, mode: RemMode) -> Result<Tensor, VmError> {
        if a.dt() != b.dt() {
            return Err(VmError::DataTypeMismatch {
                a: a.dt(),
                b: b.dt(),
            });
        }
        let shape = broadcast_shape(a.shape(), b.shape())?;
        trace!(
            "[{}] rem({mode:?}) {:?} % {:?} -> {shape:?} {:?}",
            self.name(),
            a.shape(),
            b.shape(),
            a.dt(),
        );

        let a = a.broadcast_to(&shape)?;
        let b = b.broadcast_to(&shape)?;
        match a.dt() {
            types::I8 => binary::<i8>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::I16 => binary::<i16>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::I32 => binary::<i32>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::I64 => binary::<i64>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::U8 => binary::<u8>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::U16 => binary::<u16>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::U32 => binary::<u32>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::U64 => binary::<u64>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::F16 => binary::<f16>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::F32 => binary::<f32>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            types::F64 => binary::<f64>(&shape, &a, &b, |x, y| x.remainder(y, mode)),
            dt => Err(VmError::DataType(dt)),
        }
    }
}

trait Remainder: Element {
    fn remainder(self, rhs: Self, mode: RemMode) -> Result<Self, VmError>;
}

macro_rules! impl_signed {
    ($( $ty:ty )+) => {
        $(
            impl Remainder for $ty {
                fn remainder(self, rhs: Self, mode: RemMode) -> Result<Self, VmError> {
                    if rhs == 0 {
                        return Err(VmError::DivideByZero);
                    }
                    // MIN % -1 溢出，结果应为 0
                    let r = self.wrapping_rem(rhs);
                    Ok(match mode {
                        RemMode::Floor if r != 0 && (r < 0) != (rhs < 0) => r + rhs,
                        _ => r,
                    })
                }
            }
        )+
    };
}

macro_rules! impl_unsigned {
    ($( $ty:ty )+) => {
        $(
            impl Remainder for $ty {
                fn remainder(self, rhs: Self, _mode: RemMode) -> Result<Self, VmError> {
                    self.checked_rem(rhs).ok_or(VmError::DivideByZero)
                }
            }
        )+
    };
}

macro_rules! impl_float {
    ($( $ty:ty )+) => {
        $(
            impl Remainder for $ty {
                fn remainder(self, rhs: Self, mode: RemMode) -> Result<Self, VmError> {
                    // Rust 的 `%` 与 C 的 fmod 一致
                    let r = self % rhs;
                    Ok(match mode {
                        RemMode::Trunc => r,
                        RemMode::Floor if r == 0. => (0. as $ty).copysign(rhs),
                        RemMode::Floor if (r < 0.) != (rhs < 0.) => r + rhs,
                        RemMode::Floor => r,
                    })
                }
            }
        )+
    };
}

impl_signed!(i8 i16 i32 i64);
impl_unsigned!(u8 u16 u32 u64);
impl_float!(f32 f64);

impl Remainder for f16 {
    fn remainder(self, rhs: Self, mode: RemMode) -> Result<Self, VmError> {
        self.to_f32()
            .remainder(rhs.to_f32(), mode)
            .map(f16::from_f32)
    }
}
