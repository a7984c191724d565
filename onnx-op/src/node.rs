use crate::{Arg, Attribute, OpError};
use std::collections::HashMap;

/// 计算图中的一个 ONNX 节点。
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub op_type: String,
    pub opset: usize,
    /// 模型中声明的原始属性。
    pub attrs: HashMap<String, Attribute>,
    /// 准备阶段解析出的静态参数，准备之后只读。
    pub attrs_dict: HashMap<String, Arg>,
    version: Option<usize>,
}

impl Node {
    pub fn new(name: impl Into<String>, op_type: impl Into<String>, opset: usize) -> Self {
        Self {
            name: name.into(),
            op_type: op_type.into(),
            opset,
            attrs: HashMap::new(),
            attrs_dict: HashMap::new(),
            version: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn is_prepared(&self) -> bool {
        self.version.is_some()
    }

    /// 准备节点时选中的算子版本。
    pub fn version(&self) -> Option<usize> {
        self.version
    }

    pub(crate) fn reset(&mut self) {
        self.attrs_dict.clear();
        self.version = None
    }

    pub(crate) fn prepared(&mut self, version: usize) {
        self.version = Some(version)
    }

    pub(crate) fn int_attr(&self, name: &str, default: i64) -> Result<i64, OpError> {
        match self.attrs.get(name) {
            None => Ok(default),
            Some(attr) => attr
                .as_int()
                .ok_or_else(|| self.malformed(format!("attribute `{name}` is not an int"))),
        }
    }

    pub(crate) fn ints_attr(&self, name: &str) -> Result<Option<Vec<i64>>, OpError> {
        self.attrs
            .get(name)
            .map(|attr| {
                attr.as_ints()
                    .map(<[_]>::to_vec)
                    .ok_or_else(|| self.malformed(format!("attribute `{name}` is not ints")))
            })
            .transpose()
    }

    pub(crate) fn missing_attr(&self, name: &str) -> OpError {
        OpError::MissingAttribute {
            op: self.op_type.clone(),
            name: name.into(),
        }
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> OpError {
        OpError::MalformedAttributes {
            op: self.op_type.clone(),
            reason: reason.into(),
        }
    }
}
