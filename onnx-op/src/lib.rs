//! ONNX 算子到张量原语的翻译。
//!
//! 每个算子是一个 [`Handler`]，按 opset 版本选择准备函数；准备函数把节点属性
//! 和常量输入解析成静态参数写入 [`Node::attrs_dict`]，并返回只依赖这些参数的
//! [`Kernel`]。

mod arg;
mod attribute;
mod error;
mod handler;
mod node;
mod registry;

pub mod op;

pub use arg::Arg;
pub use attribute::Attribute;
pub use error::OpError;
pub use handler::{Handler, Kernel, Prepare};
pub use node::Node;
pub use registry::Registry;

use vm::op::{Rem, StridedSlice};

/// 本库的算子需要的全部原语。
pub trait Ops: Rem + StridedSlice + 'static {}
impl<VM> Ops for VM where VM: Rem + StridedSlice + ?Sized + 'static {}
