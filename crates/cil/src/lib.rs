//! A concrete, owned data model for CIL (ECMA-335) method bodies.
//!
//! This crate does not read or write any on-disk assembly format; it only
//! defines the shapes that the optimization core in `ilopt` operates over,
//! together with the opcode classifier (family lookup) and operand
//! decoders that the core's control-flow and stack analyses depend on.

mod error;
mod family;
mod method;
mod opcode;
mod operand;
mod refs;
mod ty;

pub use error::{Error, ErrorKind};
pub use family::{family, flow_control, FlowControl, InstructionFamily};
pub use method::{Instruction, Local, MethodBody, Parameter};
pub use opcode::Opcode;
pub use operand::Operand;
pub use refs::{FieldRef, MemberRef, MethodRef, TypeRef};
pub use ty::CilType;
