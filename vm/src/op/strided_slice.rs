use crate::{SliceArg, Tensor, VirtualMachine, VmError};

pub trait StridedSlice: VirtualMachine {
    /// `args` 为每个维度给出一个已经规范化的切片参数。
    fn strided_slice(&self, x: &Tensor, args: &[SliceArg]) -> Result<Tensor, VmError>;
}
