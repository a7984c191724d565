use crate::{Tensor, VirtualMachine, VmError};

/// 余数的符号约定。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RemMode {
    /// `a - b * floor(a / b)`，符号跟随除数。
    Floor,
    /// `a - b * trunc(a / b)`，符号跟随被除数。
    Trunc,
}

pub trait Rem: VirtualMachine {
    /// 逐元素求余，`a` 和 `b` 按 numpy 规则广播。
    fn rem(&self, a: &Tensor, b: &Tensor, mode: RemMode) -> Result<Tensor, VmError>;
}
