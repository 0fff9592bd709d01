mod exports;
mod system;

pub use crate::exports::ExportNames;
pub use crate::system::{GbhwModule, GbhwOptions, build_gbhw};
