#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod core;
pub mod materials;
