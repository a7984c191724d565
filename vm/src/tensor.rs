use crate::{Element, VmError};
use digit_layout::{DigitLayout, types};
use ndarray_layout::{ArrayLayout, Endian::BigEndian};
use std::{fmt, sync::Arc};

/// 主机上的不可变张量。
///
/// 布局的步长和偏移以字节为单位，所有变换都返回共享同一块存储的新张量。
#[derive(Clone)]
pub struct Tensor {
    dt: DigitLayout,
    layout: ArrayLayout<4>,
    blob: Arc<[u8]>,
}

/// 单个维度上的切片参数，`start` 和 `len` 必须已经落在维度范围内。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SliceArg {
    pub start: usize,
    pub len: usize,
    pub step: isize,
}

impl SliceArg {
    /// 不做任何切片的参数。
    pub const fn full(dim: usize) -> Self {
        Self {
            start: 0,
            len: dim,
            step: 1,
        }
    }
}

impl Tensor {
    pub fn new(dt: DigitLayout, shape: &[usize], blob: Arc<[u8]>) -> Result<Self, VmError> {
        let layout = ArrayLayout::new_contiguous(shape, BigEndian, dt.nbytes());
        let expected = layout.num_elements() * dt.nbytes();
        if expected != blob.len() {
            return Err(VmError::SizeMismatch {
                expected,
                found: blob.len(),
            });
        }
        Ok(Self { dt, layout, blob })
    }

    pub fn from_vec<T: Element>(shape: &[usize], data: Vec<T>) -> Result<Self, VmError> {
        let mut blob = vec![0u8; data.len() * size_of::<T>()];
        for (x, bytes) in data.into_iter().zip(blob.chunks_exact_mut(size_of::<T>())) {
            x.write(bytes)
        }
        Self::new(T::DT, shape, blob.into())
    }

    pub fn scalar<T: Element>(value: T) -> Self {
        let mut blob = vec![0u8; size_of::<T>()];
        value.write(&mut blob);
        Self {
            dt: T::DT,
            layout: ArrayLayout::new_contiguous(&[], BigEndian, size_of::<T>()),
            blob: blob.into(),
        }
    }
}

impl Tensor {
    pub const fn dt(&self) -> DigitLayout {
        self.dt
    }

    pub fn layout(&self) -> &ArrayLayout<4> {
        &self.layout
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    pub fn offset(&self) -> isize {
        self.layout.offset()
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// 按逻辑行主序给出每个元素在存储中的字节偏移。
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets {
            shape: self.shape(),
            strides: self.strides(),
            idx: vec![0; self.ndim()],
            offset: self.offset(),
            remaining: self.num_elements(),
        }
    }

    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, VmError> {
        if T::DT != self.dt {
            return Err(VmError::DataTypeMismatch {
                a: self.dt,
                b: T::DT,
            });
        }
        Ok(self.offsets().map(|o| T::read(&self.blob[o..])).collect())
    }

    /// 把任意整数张量读成 `i64`，用于 ONNX 的索引类输入。
    pub fn to_i64_vec(&self) -> Result<Vec<i64>, VmError> {
        macro_rules! read {
            ($ty:ty) => {
                self.offsets()
                    .map(|o| <$ty>::read(&self.blob[o..]) as i64)
                    .collect()
            };
        }

        Ok(match self.dt {
            types::I8 => read!(i8),
            types::I16 => read!(i16),
            types::I32 => read!(i32),
            types::I64 => read!(i64),
            types::U8 => read!(u8),
            types::U16 => read!(u16),
            types::U32 => read!(u32),
            types::U64 => read!(u64),
            dt => return Err(VmError::DataType(dt)),
        })
    }
}

impl Tensor {
    /// 按 numpy 规则把张量广播到 `shape`，被广播的维度步长为 0。
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self, VmError> {
        let mismatch = || VmError::ShapeMismatch {
            a: self.shape().to_vec(),
            b: shape.to_vec(),
        };

        let Some(pad) = shape.len().checked_sub(self.ndim()) else {
            return Err(mismatch());
        };
        let mut strides = vec![0isize; shape.len()];
        for (i, (&d, &s)) in self.shape().iter().zip(self.strides()).enumerate() {
            strides[pad + i] = match shape[pad + i] {
                target if target == d => s,
                _ if d == 1 => 0,
                _ => return Err(mismatch()),
            }
        }

        let layout = ArrayLayout::new(shape, &strides, self.offset());
        Ok(self.map_layout(|_| layout))
    }

    /// 每个维度按 `args` 中对应的参数切片，支持负步长。
    pub fn slice_many(&self, args: &[SliceArg]) -> Result<Self, VmError> {
        if args.len() != self.ndim() {
            return Err(VmError::RankMismatch {
                expected: self.ndim(),
                found: args.len(),
            });
        }

        let mut offset = self.offset();
        let mut shape = Vec::with_capacity(args.len());
        let mut strides = Vec::with_capacity(args.len());
        for (axis, (arg, (&dim, &stride))) in args
            .iter()
            .zip(self.shape().iter().zip(self.strides()))
            .enumerate()
        {
            let &SliceArg { start, len, step } = arg;
            if len > 0 {
                let last = start as isize + (len as isize - 1) * step;
                if start >= dim || step == 0 || last < 0 || last >= dim as isize {
                    return Err(VmError::OutOfRange {
                        axis,
                        start,
                        len,
                        step,
                        dim,
                    });
                }
                offset += start as isize * stride
            }
            shape.push(len);
            strides.push(stride * step)
        }

        let layout = ArrayLayout::new(&shape, &strides, offset);
        Ok(self.map_layout(|_| layout))
    }

    fn map_layout(&self, f: impl FnOnce(&ArrayLayout<4>) -> ArrayLayout<4>) -> Self {
        Self {
            dt: self.dt,
            layout: f(&self.layout),
            blob: self.blob.clone(),
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("dt", &self.dt)
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("offset", &self.offset())
            .finish()
    }
}

/// numpy 广播规则下两个形状的结果形状。
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>, VmError> {
    let ndim = a.len().max(b.len());
    let dim = |shape: &[usize], i: usize| match i.checked_sub(ndim - shape.len()) {
        Some(i) => shape[i],
        None => 1,
    };
    (0..ndim)
        .map(|i| match (dim(a, i), dim(b, i)) {
            (x, y) if x == y => Ok(x),
            (1, y) => Ok(y),
            (x, 1) => Ok(x),
            _ => Err(VmError::ShapeMismatch {
                a: a.to_vec(),
                b: b.to_vec(),
            }),
        })
        .collect()
}

/// [`Tensor::offsets`] 的迭代器，像里程表一样逐维进位，只在末维之外的维度回绕时修正偏移。
pub struct Offsets<'a> {
    shape: &'a [usize],
    strides: &'a [isize],
    idx: Vec<usize>,
    offset: isize,
    remaining: usize,
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let ans = self.offset as usize;

        for ((i, &d), &s) in self.idx.iter_mut().zip(self.shape).zip(self.strides).rev() {
            *i += 1;
            self.offset += s;
            if *i < d {
                break;
            }
            self.offset -= s * d as isize;
            *i = 0
        }
        Some(ans)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}
