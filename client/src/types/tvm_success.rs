use crate::types::TvmStackEntry;

/// Outcome of a get-method execution as reported by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TvmSuccess {
    pub vm_exit_code: i32,
    pub stack: Vec<TvmStackEntry>,
    pub gas_used: i64,
}

impl TvmSuccess {
    pub fn new(stack: Vec<TvmStackEntry>) -> Self {
        TvmSuccess {
            vm_exit_code: 0,
            stack,
            gas_used: 0,
        }
    }

    /// TVM treats exit codes 0 and 1 as successful termination.
    pub fn is_success(&self) -> bool {
        self.vm_exit_code == 0 || self.vm_exit_code == 1
    }
}
