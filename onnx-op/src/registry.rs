use crate::{Handler, Kernel, Node, OpError, Ops, op};
use log::debug;
use patricia_tree::PatriciaMap;
use vm::Tensor;

/// 算子名到 [`Handler`] 的映射，启动时构造，之后只读。
pub struct Registry<VM: ?Sized> {
    handlers: PatriciaMap<Handler<VM>>,
}

impl<VM: ?Sized> Default for Registry<VM> {
    fn default() -> Self {
        Self::new()
    }
}

impl<VM: ?Sized> Registry<VM> {
    pub fn new() -> Self {
        Self {
            handlers: PatriciaMap::new(),
        }
    }

    pub fn register(&mut self, handler: Handler<VM>) -> Result<&mut Self, OpError> {
        let name = handler.name();
        if self.handlers.contains_key(name) {
            return Err(OpError::DuplicateOperator(name.into()));
        }
        debug!(
            "register {name} since {:?}",
            handler.since().collect::<Vec<_>>()
        );
        self.handlers.insert(name, handler);
        Ok(self)
    }

    pub fn get(&self, op_type: &str) -> Result<&Handler<VM>, OpError> {
        self.handlers
            .get(op_type)
            .ok_or_else(|| OpError::UnsupportedOperator(op_type.into()))
    }

    /// 已注册的算子名，按字典序。
    pub fn operators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.iter().map(|(_, handler)| handler.name())
    }

    /// 按节点的算子名和 opset 准备翻译函数。
    pub fn prepare(&self, node: &mut Node, inputs: &[Tensor]) -> Result<Kernel<VM>, OpError> {
        self.get(&node.op_type)?.prepare(node, inputs)
    }
}

impl<VM: Ops + ?Sized> Registry<VM> {
    /// 包含本库全部算子的注册表。
    pub fn with_default_ops() -> Result<Self, OpError> {
        let mut ans = Self::new();
        for handler in [op::modulo::handler(), op::slice::handler()] {
            ans.register(handler)?;
        }
        Ok(ans)
    }
}
