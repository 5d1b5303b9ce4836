//! FFI binding for the C reference reduction.

#[cfg(c_implementation_active)]
use crate::error::Result;
#[cfg(c_implementation_active)]
use crate::registry::Reducer;

#[cfg(c_implementation_active)]
mod ffi {
    use libc::size_t;
    use std::os::raw::c_double;

    extern "C" {
        pub fn dot_reduce_c_sequential(a: *const c_double, b: *const c_double, len: size_t) -> c_double;
    }
}

/// Check if the C implementation was compiled in
#[cfg(c_implementation_active)]
pub const C_IMPL_AVAILABLE: bool = true;

#[cfg(not(c_implementation_active))]
pub const C_IMPL_AVAILABLE: bool = false;

/// C compiler detected at build time, if any
pub const C_COMPILER_NAME: Option<&str> = option_env!("C_COMPILER_NAME");

/// Sequential reduction of `a[..n] · b[..n]` in C.
#[cfg(c_implementation_active)]
pub fn reduce_c_sequential(a: &[f64], b: &[f64], n: usize) -> Result<f64> {
    crate::error::check_inputs(a, b, n)?;
    // SAFETY: both pointers are valid for `n` reads, checked above.
    Ok(unsafe { ffi::dot_reduce_c_sequential(a.as_ptr(), b.as_ptr(), n) })
}

/// The C baseline as a registry strategy; only registered when compiled in.
#[cfg(c_implementation_active)]
#[derive(Clone, Copy, Debug, Default)]
pub struct CSequentialReducer;

#[cfg(c_implementation_active)]
impl Reducer for CSequentialReducer {
    fn name(&self) -> &'static str {
        "c-sequential"
    }

    fn description(&self) -> &'static str {
        "C reference reduction (index order)"
    }

    fn reduce(&self, a: &[f64], b: &[f64], n: usize) -> Result<f64> {
        reduce_c_sequential(a, b, n)
    }
}

/// Register the C strategy when it is available.
#[cfg_attr(not(c_implementation_active), allow(unused_variables))]
pub fn register_c_reducers(registry: &mut crate::registry::ReducerRegistry) {
    #[cfg(c_implementation_active)]
    registry.register(CSequentialReducer);
}
