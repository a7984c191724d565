mod rem;
mod strided_slice;

use vm::{Element, Tensor, VmError};

/// 逐元素二元运算，`a` 和 `b` 已经广播到 `shape`。
fn binary<T: Element>(
    shape: &[usize],
    a: &Tensor,
    b: &Tensor,
    f: impl Fn(T, T) -> Result<T, VmError>,
) -> Result<Tensor, VmError> {
    assert_eq!(a.shape(), shape);
    assert_eq!(b.shape(), shape);

    let (a_, b_) = (a.blob(), b.blob());
    let data = a
        .offsets()
        .zip(b.offsets())
        .map(|(i, j)| f(T::read(&a_[i..]), T::read(&b_[j..])))
        .collect::<Result<Vec<_>, _>>()?;
    Tensor::from_vec(shape, data)
}
