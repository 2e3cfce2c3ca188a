//! The per-method analysis core: control-flow graph construction, the
//! abstract stack simulator, and the definite-assignment analyzer that
//! decides whether a method's `.locals init` flag can be stripped.
//!
//! This crate also carries the ambient plumbing needed to exercise that
//! core end-to-end without a real ECMA-335 metadata reader: a simplified
//! assembly container (see [`container`]) and the driver that walks it
//! applying the analyzer to every method (see [`driver`]).

pub mod analyzer;
pub mod cfg;
pub mod container;
pub mod driver;
mod error;
pub mod stack;

pub use analyzer::{analyze, Mode, Verdict};
pub use cfg::Cfg;
pub use container::{Assembly, Event, Method, Module, Property, TypeDef};
pub use driver::{optimize_assembly, optimize_assembly_filtered, OptimizationReport};
pub use error::{Error, ErrorKind};
