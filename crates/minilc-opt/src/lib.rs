//! Basic-block construction and a fixed-point, block-local optimizer over
//! the quadruple IR.

pub mod cfg;
pub mod optimize;
pub mod passes;

pub use cfg::{build_cfg, render_cfg, BasicBlock};
pub use optimize::{optimize, OptimizeResult};
