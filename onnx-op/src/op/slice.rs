//! ONNX `Slice`，见 <https://onnx.ai/onnx/operators/onnx__Slice.html>。
//!
//! - opset 1：`starts`、`ends`、`axes` 是属性，步长固定为 1；
//! - opset 10 起：`starts`、`ends` 和可选的 `axes`、`steps` 是第 1 到 4 个输入；
//! - opset 11、13 只扩展了类型和负数下标的约定，计算方式不变。

use crate::{Arg, Handler, Kernel, Node, OpError, Ops};
use itertools::{Itertools, izip};
use std::sync::Arc;
use vm::{SliceArg, Tensor};

pub const NAME: &str = "Slice";

/// opset 1 只有数据输入，opset 10 起最多有数据、starts、ends、axes、steps 五个输入。
const MAX_INPUTS_V1: usize = 1;
const MAX_INPUTS: usize = 5;

/// 规范化之后的切片参数，与调用约定无关。
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SliceAttrs {
    pub starts: Vec<i64>,
    pub ends: Vec<i64>,
    /// 缺省时依次作用于 `0..rank`。
    pub axes: Option<Vec<i64>>,
    /// 缺省时全部为 1。
    pub steps: Option<Vec<i64>>,
}

pub fn handler<VM: Ops + ?Sized>() -> Handler<VM> {
    Handler::new(NAME)
        .version(1, prepare_v1::<VM>)
        .version(10, prepare::<VM>)
        .version(11, prepare::<VM>)
        .version(13, prepare::<VM>)
}

fn prepare_v1<VM: Ops + ?Sized>(
    node: &mut Node,
    inputs: &[Tensor],
) -> Result<Kernel<VM>, OpError> {
    check_arity(inputs.len(), MAX_INPUTS_V1)?;
    let attrs = SliceAttrs {
        starts: node
            .ints_attr("starts")?
            .ok_or_else(|| node.missing_attr("starts"))?,
        ends: node
            .ints_attr("ends")?
            .ok_or_else(|| node.missing_attr("ends"))?,
        axes: node.ints_attr("axes")?,
        steps: None,
    };
    finish(node, inputs, attrs, MAX_INPUTS_V1)
}

fn prepare<VM: Ops + ?Sized>(node: &mut Node, inputs: &[Tensor]) -> Result<Kernel<VM>, OpError> {
    check_arity(inputs.len(), MAX_INPUTS)?;
    let input = |index: usize| -> Result<Option<Vec<i64>>, OpError> {
        Ok(inputs.get(index).map(Tensor::to_i64_vec).transpose()?)
    };
    let required = |index: usize| -> Result<Vec<i64>, OpError> {
        input(index)?.ok_or_else(|| OpError::MissingInput {
            op: NAME.into(),
            index,
        })
    };

    let attrs = SliceAttrs {
        starts: required(1)?,
        ends: required(2)?,
        axes: input(3)?,
        steps: input(4)?,
    };
    finish(node, inputs, attrs, MAX_INPUTS)
}

fn check_arity(found: usize, max: usize) -> Result<(), OpError> {
    if found > max {
        return Err(OpError::InputArity {
            op: NAME.into(),
            expected: max,
            found,
        });
    }
    Ok(())
}

fn finish<VM: Ops + ?Sized>(
    node: &mut Node,
    inputs: &[Tensor],
    attrs: SliceAttrs,
    max_inputs: usize,
) -> Result<Kernel<VM>, OpError> {
    let SliceAttrs {
        starts,
        ends,
        axes,
        steps,
    } = &attrs;

    let n = starts.len();
    if ends.len() != n {
        return Err(node.malformed(format!("{n} starts but {} ends", ends.len())));
    }
    if let Some(axes) = axes {
        if axes.len() != n {
            return Err(node.malformed(format!("{n} starts but {} axes", axes.len())));
        }
        if !axes.iter().all_unique() {
            return Err(node.malformed(format!("repeated axes {axes:?}")));
        }
    }
    if let Some(steps) = steps {
        if steps.len() != n {
            return Err(node.malformed(format!("{n} starts but {} steps", steps.len())));
        }
        if steps.contains(&0) {
            return Err(node.malformed("step cannot be 0"));
        }
    }
    // 准备时已知数据输入的秩，尽早报告与秩相关的错误
    if let Some(x) = inputs.first() {
        resolve_axes(&attrs, x.ndim())?;
    }

    let dict = &mut node.attrs_dict;
    dict.insert("starts".into(), Arg::ints(starts));
    dict.insert("ends".into(), Arg::ints(ends));
    if let Some(axes) = axes {
        dict.insert("axes".into(), Arg::ints(axes));
    }
    if let Some(steps) = steps {
        dict.insert("steps".into(), Arg::ints(steps));
    }

    // 翻译函数只读第 0 个输入，其余输入在准备时已固定，运行时传入的值被忽略
    Ok(Arc::new(move |vm: &VM, inputs: &[Tensor]| {
        check_arity(inputs.len(), max_inputs)?;
        translate(vm, inputs, &attrs)
    }))
}

/// 只使用第一个输入，其余输入的值已在准备时固定。
///
/// 参数本身与秩无关（负数轴、缺省轴都在这里按输入的秩解析），
/// 所以同一个翻译函数可以用于不同秩的输入。
pub fn translate<VM: Ops + ?Sized>(
    vm: &VM,
    inputs: &[Tensor],
    attrs: &SliceAttrs,
) -> Result<Vec<Tensor>, OpError> {
    let Some(x) = inputs.first() else {
        return Err(OpError::MissingInput {
            op: NAME.into(),
            index: 0,
        });
    };
    let shape = x.shape();
    let axes = resolve_axes(attrs, shape.len())?;
    let steps = match &attrs.steps {
        Some(steps) => steps.clone(),
        None => vec![1; axes.len()],
    };

    // 未被 axes 提到的维度保持完整
    let mut args = shape.iter().map(|&d| SliceArg::full(d)).collect::<Vec<_>>();
    for (&axis, &start, &end, &step) in izip!(&axes, &attrs.starts, &attrs.ends, &steps) {
        args[axis] = clamp(shape[axis], start, end, step)
    }
    Ok(vec![vm.strided_slice(x, &args)?])
}

/// 按输入的秩把 `axes` 规范化为非负下标，缺省时为 `0..rank`。
fn resolve_axes(attrs: &SliceAttrs, rank: usize) -> Result<Vec<usize>, OpError> {
    let malformed = |reason: String| OpError::MalformedAttributes {
        op: NAME.into(),
        reason,
    };

    let axes = match &attrs.axes {
        Some(axes) => axes
            .iter()
            .map(|&axis| {
                let r = rank as i64;
                let i = if axis < 0 { axis + r } else { axis };
                if (0..r).contains(&i) {
                    Ok(i as usize)
                } else {
                    Err(malformed(format!("axis {axis} out of range for rank {rank}")))
                }
            })
            .collect::<Result<Vec<_>, _>>()?,
        None if attrs.starts.len() == rank => (0..rank).collect(),
        None => {
            return Err(malformed(format!(
                "{} starts for a rank {rank} input without axes",
                attrs.starts.len()
            )));
        }
    };
    if !axes.iter().all_unique() {
        return Err(malformed(format!("axes {axes:?} repeat after normalization")));
    }
    Ok(axes)
}

/// 按 ONNX 的规则把一个维度上的 start/end/step 截断到合法范围。
fn clamp(dim: usize, start: i64, end: i64, step: i64) -> SliceArg {
    let d = dim as i64;
    let wrap = |i: i64| if i < 0 { i + d } else { i };
    let (start, end) = (wrap(start), wrap(end));

    let (start, n) = if step > 0 {
        let start = start.clamp(0, d);
        (start, end.clamp(0, d) - start)
    } else if dim == 0 {
        (0, 0)
    } else {
        let start = start.clamp(0, d - 1);
        (start, start - end.clamp(-1, d - 1))
    };
    let len = (n.max(0) as u64).div_ceil(step.unsigned_abs()) as usize;

    SliceArg {
        start: start as usize,
        len,
        // 只取一个元素时步长没有意义，避免步长乘法溢出
        step: if len > 1 { step as isize } else { 1 },
    }
}
