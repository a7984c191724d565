use crate::{Node, OpError};
use log::debug;
use std::{collections::BTreeMap, sync::Arc};
use vm::Tensor;

/// 准备好的翻译函数，只捕获准备阶段确定的静态参数。
pub type Kernel<VM> = Arc<dyn Fn(&VM, &[Tensor]) -> Result<Vec<Tensor>, OpError> + Send + Sync>;

/// 一个算子版本的准备函数：解析节点参数，写入 `attrs_dict`，返回翻译函数。
pub type Prepare<VM> = fn(&mut Node, &[Tensor]) -> Result<Kernel<VM>, OpError>;

/// 一个 ONNX 算子的全部版本。
///
/// 版本表以引入该版本的 opset 为键，节点使用不大于其 opset 的最大版本。
pub struct Handler<VM: ?Sized> {
    name: &'static str,
    versions: BTreeMap<usize, Prepare<VM>>,
}

impl<VM: ?Sized> Handler<VM> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            versions: BTreeMap::new(),
        }
    }

    /// 登记自 opset `since` 起生效的版本。
    pub fn version(mut self, since: usize, prepare: Prepare<VM>) -> Self {
        assert!(
            self.versions.insert(since, prepare).is_none(),
            "{} version {since} registered twice",
            self.name
        );
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn since(&self) -> impl Iterator<Item = usize> + '_ {
        self.versions.keys().copied()
    }

    /// 找到 `opset` 下生效的版本。
    pub fn resolve(&self, opset: usize) -> Result<usize, OpError> {
        self.versions
            .range(..=opset)
            .next_back()
            .map(|(&since, _)| since)
            .ok_or_else(|| OpError::UnsupportedVersion {
                op: self.name.into(),
                opset,
                since: self.since().next().unwrap_or(0),
            })
    }

    pub fn prepare(&self, node: &mut Node, inputs: &[Tensor]) -> Result<Kernel<VM>, OpError> {
        if node.op_type != self.name {
            return Err(OpError::OperatorMismatch {
                expected: self.name.into(),
                found: node.op_type.clone(),
            });
        }

        let since = self.resolve(node.opset)?;
        debug!(
            "prepare {} `{}` (opset {}) with version {since}",
            self.name, node.name, node.opset
        );

        node.reset();
        let kernel = self.versions[&since](node, inputs)?;
        node.prepared(since);
        Ok(kernel)
    }
}

#[cfg(test)]
mod test {
    use super::{Handler, Kernel};
    use crate::{Arg, Node, OpError};
    use cpu::CpuVM;
    use std::sync::Arc;
    use vm::Tensor;

    fn tag<const V: i64>(node: &mut Node, _inputs: &[Tensor]) -> Result<Kernel<CpuVM>, OpError> {
        node.attrs_dict.insert("tag".into(), Arg::int(V));
        Ok(Arc::new(
            |_: &CpuVM, inputs: &[Tensor]| -> Result<Vec<Tensor>, OpError> { Ok(inputs.to_vec()) },
        ))
    }

    fn handler() -> Handler<CpuVM> {
        Handler::new("Tag")
            .version(6, tag::<6>)
            .version(11, tag::<11>)
            .version(13, tag::<13>)
    }

    #[test]
    fn test_resolve() {
        let handler = handler();
        assert_eq!(handler.since().collect::<Vec<_>>(), [6, 11, 13]);
        assert_eq!(handler.resolve(6).unwrap(), 6);
        assert_eq!(handler.resolve(10).unwrap(), 6);
        assert_eq!(handler.resolve(12).unwrap(), 11);
        assert_eq!(handler.resolve(21).unwrap(), 13);
        assert!(matches!(
            handler.resolve(5),
            Err(OpError::UnsupportedVersion {
                opset: 5,
                since: 6,
                ..
            })
        ))
    }

    #[test]
    fn test_prepare() {
        let handler = handler();

        let mut node = Node::new("t", "Tag", 12);
        let kernel = handler.prepare(&mut node, &[]).unwrap();
        assert_eq!(node.version(), Some(11));
        assert_eq!(node.attrs_dict["tag"], Arg::int(11));

        let x = Tensor::scalar(1u8);
        let y = kernel(&CpuVM, &[x]).unwrap();
        assert_eq!(y[0].to_vec::<u8>().unwrap(), [1]);

        let mut node = Node::new("t", "Tag", 3);
        assert!(handler.prepare(&mut node, &[]).is_err());
        assert!(!node.is_prepared());

        let mut node = Node::new("t", "Other", 13);
        assert!(matches!(
            handler.prepare(&mut node, &[]),
            Err(OpError::OperatorMismatch { .. })
        ))
    }
}
