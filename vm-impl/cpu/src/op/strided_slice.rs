use crate::CpuVM;
use log::trace;
use vm::{SliceArg, Tensor, VirtualMachine, VmError, op::StridedSlice};

impl StridedSlice for CpuVM {
    fn strided_slice(&self, x: &Tensor, args: &[SliceArg]) -> Result<Tensor, VmError> {
        trace!("[{}] strided-slice {:?} {args:?}", self.name(), x.shape());
        // 只改变布局，不拷贝数据
        x.slice_many(args)
    }
}

#[cfg(test)]
mod test {
    use crate::CpuVM;
    use vm::{SliceArg, Tensor, op::StridedSlice};

    #[test]
    fn test() {
        let x = Tensor::from_vec(&[2, 3, 4], (0..24i64).collect::<Vec<_>>()).unwrap();
        let y = CpuVM
            .strided_slice(
                &x,
                &[
                    SliceArg::full(2),
                    SliceArg {
                        start: 2,
                        len: 3,
                        step: -1,
                    },
                    SliceArg {
                        start: 0,
                        len: 2,
                        step: 3,
                    },
                ],
            )
            .unwrap();
        assert_eq!(y.shape(), [2, 3, 2]);
        assert_eq!(
            y.to_vec::<i64>().unwrap(),
            [8, 11, 4, 7, 0, 3, 20, 23, 16, 19, 12, 15]
        );

        // 切片的切片
        let z = CpuVM
            .strided_slice(
                &y,
                &[
                    SliceArg {
                        start: 1,
                        len: 1,
                        step: 1,
                    },
                    SliceArg::full(3),
                    SliceArg {
                        start: 1,
                        len: 1,
                        step: 1,
                    },
                ],
            )
            .unwrap();
        assert_eq!(z.to_vec::<i64>().unwrap(), [23, 19, 15])
    }

    #[test]
    fn test_rank_mismatch() {
        let x = Tensor::from_vec(&[2, 2], vec![0u8; 4]).unwrap();
        assert!(CpuVM.strided_slice(&x, &[SliceArg::full(2)]).is_err())
    }
}
