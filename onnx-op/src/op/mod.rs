//! 每个子模块实现一个 ONNX 算子，提供 `handler()` 构造其版本表。

pub mod modulo;
pub mod slice;
