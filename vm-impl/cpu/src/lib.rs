mod op;

use vm::VirtualMachine;

/// 在主机内存上直接计算的虚拟机。
#[derive(Clone, Copy, Default, Debug)]
pub struct CpuVM;

impl VirtualMachine for CpuVM {
    fn name(&self) -> &str {
        "cpu"
    }
}
