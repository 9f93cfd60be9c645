//! サーバーAPI連携

pub mod receipt;
