mod element;
mod error;
mod tensor;

pub mod op;

pub use element::Element;
pub use error::VmError;
pub use tensor::{Offsets, SliceArg, Tensor, broadcast_shape};

/// 张量原语的执行者。
///
/// 每种原语都是一个以 `VirtualMachine` 为父 trait 的独立 trait，见 [`op`]。
pub trait VirtualMachine {
    /// 虚拟机的名字，用于日志。
    fn name(&self) -> &str;
}
