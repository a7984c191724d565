//! ONNX `Mod`，见 <https://onnx.ai/onnx/operators/onnx__Mod.html>。

use crate::{Arg, Handler, Kernel, Node, OpError, Ops};
use std::sync::Arc;
use vm::{Tensor, op::RemMode};

pub const NAME: &str = "Mod";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModAttrs {
    /// 为真时符号跟随被除数（C 的 fmod），否则跟随除数（numpy 的 `mod`）。
    pub fmod: bool,
}

pub fn handler<VM: Ops + ?Sized>() -> Handler<VM> {
    Handler::new(NAME)
        .version(10, prepare::<VM>)
        .version(13, prepare::<VM>)
}

fn prepare<VM: Ops + ?Sized>(node: &mut Node, _inputs: &[Tensor]) -> Result<Kernel<VM>, OpError> {
    let attrs = ModAttrs {
        fmod: node.int_attr("fmod", 0)? != 0,
    };
    node.attrs_dict.insert("fmod".into(), Arg::bool(attrs.fmod));

    Ok(Arc::new(move |vm: &VM, inputs: &[Tensor]| translate(vm, inputs, attrs)))
}

pub fn translate<VM: Ops + ?Sized>(
    vm: &VM,
    inputs: &[Tensor],
    attrs: ModAttrs,
) -> Result<Vec<Tensor>, OpError> {
    let [a, b] = inputs else {
        return Err(OpError::InputArity {
            op: NAME.into(),
            expected: 2,
            found: inputs.len(),
        });
    };

    let mode = if attrs.fmod {
        RemMode::Trunc
    } else {
        RemMode::Floor
    };
    Ok(vec![vm.rem(a, b, mode)?])
}

#[cfg(test)]
mod test {
    use super::handler;
    use crate::{Arg, Node, OpError};
    use cpu::CpuVM;
    use vm::{Tensor, VmError};

    fn run(node: &mut Node, a: Tensor, b: Tensor) -> Result<Tensor, OpError> {
        let kernel = handler::<CpuVM>().prepare(node, &[a.clone(), b.clone()])?;
        let mut outputs = kernel(&CpuVM, &[a, b])?;
        assert_eq!(outputs.len(), 1);
        Ok(outputs.remove(0))
    }

    fn pair() -> (Tensor, Tensor) {
        (
            Tensor::from_vec(&[2], vec![5i64, -5]).unwrap(),
            Tensor::from_vec(&[2], vec![3i64, 3]).unwrap(),
        )
    }

    #[test]
    fn test_mod() {
        let (a, b) = pair();
        let mut node = Node::new("mod", "Mod", 13);
        let y = run(&mut node, a, b).unwrap();
        assert_eq!(y.to_vec::<i64>().unwrap(), [2, 1]);
        assert_eq!(node.attrs_dict["fmod"], Arg::bool(false));
        assert_eq!(node.version(), Some(13))
    }

    #[test]
    fn test_fmod() {
        let (a, b) = pair();
        let mut node = Node::new("mod", "Mod", 10).with_attr("fmod", 1i64);
        let y = run(&mut node, a, b).unwrap();
        assert_eq!(y.to_vec::<i64>().unwrap(), [2, -2]);
        assert_eq!(node.attrs_dict["fmod"], Arg::bool(true));
        assert_eq!(node.version(), Some(10))
    }

    #[test]
    fn test_float_identity() {
        let a = [7.5f32, -7.5, 7.5, -7.5, 0.25, -3.0];
        let b = [2.0f32, 2.0, -2.0, -2.0, 0.5, 1.25];
        let ta = Tensor::from_vec(&[6], a.to_vec()).unwrap();
        let tb = Tensor::from_vec(&[6], b.to_vec()).unwrap();

        let mut node = Node::new("mod", "Mod", 13);
        let floor = run(&mut node, ta.clone(), tb.clone()).unwrap();
        let mut node = Node::new("fmod", "Mod", 13).with_attr("fmod", 1i64);
        let trunc = run(&mut node, ta, tb).unwrap();

        let floor = floor.to_vec::<f32>().unwrap();
        let trunc = trunc.to_vec::<f32>().unwrap();
        for i in 0..a.len() {
            let (a, b) = (a[i], b[i]);
            assert!((floor[i] - (a - b * (a / b).floor())).abs() < 1e-6);
            assert!((trunc[i] - (a - b * (a / b).trunc())).abs() < 1e-6)
        }
    }

    #[test]
    fn test_broadcast_shape() {
        let a = Tensor::from_vec(&[2, 1, 3], vec![1i32, 2, 3, 4, 5, 6]).unwrap();
        let b = Tensor::from_vec(&[4, 1], vec![2i32, 3, 4, 5]).unwrap();
        let mut node = Node::new("mod", "Mod", 13);
        let y = run(&mut node, a, b).unwrap();
        assert_eq!(y.shape(), [2, 4, 3]);

        let a = Tensor::from_vec(&[2, 3], vec![1i32; 6]).unwrap();
        let b = Tensor::from_vec(&[2], vec![1i32; 2]).unwrap();
        let mut node = Node::new("mod", "Mod", 13);
        assert!(matches!(
            run(&mut node, a, b),
            Err(OpError::Vm(VmError::ShapeMismatch { .. }))
        ))
    }

    #[test]
    fn test_prepare_idempotent() {
        let (a, b) = pair();
        let mut node = Node::new("mod", "Mod", 13).with_attr("fmod", 1i64);
        let h = handler::<CpuVM>();
        h.prepare(&mut node, &[a.clone(), b.clone()]).unwrap();
        let first = node.attrs_dict.clone();
        h.prepare(&mut node, &[a, b]).unwrap();
        assert_eq!(node.attrs_dict, first)
    }

    #[test]
    fn test_arity() {
        let (a, _) = pair();
        let mut node = Node::new("mod", "Mod", 13);
        let kernel = handler::<CpuVM>().prepare(&mut node, &[]).unwrap();
        assert!(matches!(
            kernel(&CpuVM, &[a]),
            Err(OpError::InputArity {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let mut node = Node::new("mod", "Mod", 13).with_attr("fmod", "yes");
        assert!(matches!(
            handler::<CpuVM>().prepare(&mut node, &[]),
            Err(OpError::MalformedAttributes { .. })
        ))
    }
}
