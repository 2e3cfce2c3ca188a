//! A deliberately simplified, self-contained assembly container (component J).
//!
//! This is not a reimplementation of ECMA-335 PE/metadata parsing: it exists
//! so the driver and the CLI have a concrete, round-trippable artifact to
//! load, mutate, and save end-to-end without a production-grade metadata
//! reader dependency. The encoding is a plain length-prefixed, little-endian
//! binary format, versioned so a future incompatible change can be detected
//! rather than silently misread.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use ilopt_cil::{
    CilType, FieldRef, Instruction, Local, MemberRef, MethodBody, MethodRef, Opcode, Operand,
    Parameter, TypeRef,
};

use crate::error::{Error, ErrorKind};

const MAGIC: &[u8; 4] = b"ILOT";
const VERSION: u32 = 1;

/// The root of one loaded container.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub types: Vec<TypeDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub nested_types: Vec<TypeDef>,
    pub methods: Vec<Method>,
    pub events: Vec<Event>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    /// `None` models an abstract or extern method: no IL body to analyze.
    pub body: Option<MethodBody>,
}

/// Carries no executable body of its own; counted for the driver's
/// processed-counts line only.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
}

/// Carries no executable body of its own; counted for the driver's
/// processed-counts line only.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
}

/// Reads an [`Assembly`] from `path`.
pub fn read_assembly(path: &Path) -> Result<Assembly, Error> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ErrorKind::Container("not an ilopt assembly container".into()).into());
    }
    let version = read_u32(&mut file)?;
    if version != VERSION {
        return Err(ErrorKind::Container(format!(
            "unsupported container version {version} (expected {VERSION})"
        ))
        .into());
    }
    decode_assembly(&mut file)
}

/// Writes `assembly` to `path`.
///
/// The write is staged to a temporary file beside `path` and renamed into
/// place only once every byte has been flushed, so a failed write never
/// leaves a half-written assembly behind. If anything fails after the
/// temporary file is created, it is removed.
pub fn write_assembly(path: &Path, assembly: &Assembly) -> Result<(), Error> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }
    let tmp_path = temp_path_for(path);
    let result = (|| -> Result<(), Error> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(MAGIC)?;
        write_u32(&mut file, VERSION)?;
        encode_assembly(&mut file, assembly)?;
        file.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp_path, path)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

fn temp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| std::ffi::OsString::from("assembly"));
    name.push(".tmp");
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => std::path::PathBuf::from(name),
    }
}

// --- Primitive encoding -----------------------------------------------

fn write_u8(w: &mut impl Write, v: u8) -> io::Result<()> {
    w.write_all(&[v])
}

fn write_u16(w: &mut impl Write, v: u16) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_u32(w: &mut impl Write, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_i32(w: &mut impl Write, v: i32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_i64(w: &mut impl Write, v: i64) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_f32(w: &mut impl Write, v: f32) -> io::Result<()> {
    w.write_all(&v.to_bits().to_le_bytes())
}

fn write_f64(w: &mut impl Write, v: f64) -> io::Result<()> {
    w.write_all(&v.to_bits().to_le_bytes())
}

fn write_bool(w: &mut impl Write, v: bool) -> io::Result<()> {
    write_u8(w, u8::from(v))
}

fn write_string(w: &mut impl Write, s: &str) -> io::Result<()> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())
}

fn read_u8(r: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16(r: &mut impl Read) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(r: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32(r: &mut impl Read) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_i64(r: &mut impl Read) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

fn read_f32(r: &mut impl Read) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_bits(u32::from_le_bytes(buf)))
}

fn read_f64(r: &mut impl Read) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_bits(u64::from_le_bytes(buf)))
}

fn read_bool(r: &mut impl Read) -> Result<bool, Error> {
    Ok(read_u8(r)? != 0)
}

fn read_string(r: &mut impl Read) -> Result<String, Error> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| ErrorKind::Container("method or type name was not valid UTF-8".into()).into())
}

// --- Assembly/Module/TypeDef/Method -------------------------------------

fn encode_assembly(w: &mut impl Write, assembly: &Assembly) -> Result<(), Error> {
    write_u32(w, assembly.modules.len() as u32)?;
    for module in &assembly.modules {
        encode_module(w, module)?;
    }
    Ok(())
}

fn decode_assembly(r: &mut impl Read) -> Result<Assembly, Error> {
    let count = read_u32(r)?;
    let mut modules = Vec::with_capacity(count as usize);
    for _ in 0..count {
        modules.push(decode_module(r)?);
    }
    Ok(Assembly { modules })
}

fn encode_module(w: &mut impl Write, module: &Module) -> Result<(), Error> {
    write_string(w, &module.name)?;
    write_u32(w, module.types.len() as u32)?;
    for ty in &module.types {
        encode_type(w, ty)?;
    }
    Ok(())
}

fn decode_module(r: &mut impl Read) -> Result<Module, Error> {
    let name = read_string(r)?;
    let count = read_u32(r)?;
    let mut types = Vec::with_capacity(count as usize);
    for _ in 0..count {
        types.push(decode_type(r)?);
    }
    Ok(Module { name, types })
}

fn encode_type(w: &mut impl Write, ty: &TypeDef) -> Result<(), Error> {
    write_string(w, &ty.name)?;
    write_u32(w, ty.nested_types.len() as u32)?;
    for nested in &ty.nested_types {
        encode_type(w, nested)?;
    }
    write_u32(w, ty.methods.len() as u32)?;
    for method in &ty.methods {
        encode_method(w, method)?;
    }
    write_u32(w, ty.events.len() as u32)?;
    for event in &ty.events {
        write_string(w, &event.name)?;
    }
    write_u32(w, ty.properties.len() as u32)?;
    for property in &ty.properties {
        write_string(w, &property.name)?;
    }
    Ok(())
}

fn decode_type(r: &mut impl Read) -> Result<TypeDef, Error> {
    let name = read_string(r)?;
    let nested_count = read_u32(r)?;
    let mut nested_types = Vec::with_capacity(nested_count as usize);
    for _ in 0..nested_count {
        nested_types.push(decode_type(r)?);
    }
    let method_count = read_u32(r)?;
    let mut methods = Vec::with_capacity(method_count as usize);
    for _ in 0..method_count {
        methods.push(decode_method(r)?);
    }
    let event_count = read_u32(r)?;
    let mut events = Vec::with_capacity(event_count as usize);
    for _ in 0..event_count {
        events.push(Event {
            name: read_string(r)?,
        });
    }
    let property_count = read_u32(r)?;
    let mut properties = Vec::with_capacity(property_count as usize);
    for _ in 0..property_count {
        properties.push(Property {
            name: read_string(r)?,
        });
    }
    Ok(TypeDef {
        name,
        nested_types,
        methods,
        events,
        properties,
    })
}

fn encode_method(w: &mut impl Write, method: &Method) -> Result<(), Error> {
    write_string(w, &method.name)?;
    match &method.body {
        None => write_bool(w, false)?,
        Some(body) => {
            write_bool(w, true)?;
            encode_method_body(w, body)?;
        }
    }
    Ok(())
}

fn decode_method(r: &mut impl Read) -> Result<Method, Error> {
    let name = read_string(r)?;
    let body = if read_bool(r)? {
        Some(decode_method_body(r)?)
    } else {
        None
    };
    Ok(Method { name, body })
}

// --- MethodBody ----------------------------------------------------------

fn encode_method_body(w: &mut impl Write, body: &MethodBody) -> Result<(), Error> {
    write_u32(w, body.instructions.len() as u32)?;
    for instr in &body.instructions {
        encode_instruction(w, instr)?;
    }
    write_u32(w, body.locals.len() as u32)?;
    for local in &body.locals {
        encode_type_ref(w, &local.ty)?;
    }
    match &body.this_parameter {
        None => write_bool(w, false)?,
        Some(param) => {
            write_bool(w, true)?;
            encode_type_ref(w, &param.ty)?;
        }
    }
    write_u32(w, body.parameters.len() as u32)?;
    for param in &body.parameters {
        encode_type_ref(w, &param.ty)?;
    }
    write_bool(w, body.init_locals)?;
    write_u16(w, body.max_stack)?;
    Ok(())
}

fn decode_method_body(r: &mut impl Read) -> Result<MethodBody, Error> {
    let instr_count = read_u32(r)?;
    let mut instructions = Vec::with_capacity(instr_count as usize);
    for _ in 0..instr_count {
        instructions.push(decode_instruction(r)?);
    }
    let local_count = read_u32(r)?;
    let mut locals = Vec::with_capacity(local_count as usize);
    for _ in 0..local_count {
        locals.push(Local {
            ty: decode_type_ref(r)?,
        });
    }
    let this_parameter = if read_bool(r)? {
        Some(Parameter {
            ty: decode_type_ref(r)?,
        })
    } else {
        None
    };
    let param_count = read_u32(r)?;
    let mut parameters = Vec::with_capacity(param_count as usize);
    for _ in 0..param_count {
        parameters.push(Parameter {
            ty: decode_type_ref(r)?,
        });
    }
    let init_locals = read_bool(r)?;
    let max_stack = read_u16(r)?;
    Ok(MethodBody {
        instructions,
        locals,
        this_parameter,
        parameters,
        init_locals,
        max_stack,
    })
}

fn encode_instruction(w: &mut impl Write, instr: &Instruction) -> Result<(), Error> {
    write_u32(w, instr.offset)?;
    write_u16(w, instr.opcode.numeric_code())?;
    encode_operand(w, &instr.operand)?;
    Ok(())
}

fn decode_instruction(r: &mut impl Read) -> Result<Instruction, Error> {
    let offset = read_u32(r)?;
    let opcode = Opcode::from_numeric_code(read_u16(r)?)?;
    let operand = decode_operand(r)?;
    Ok(Instruction::new(offset, opcode, operand))
}

fn encode_operand(w: &mut impl Write, operand: &Operand) -> Result<(), Error> {
    match operand {
        Operand::None => write_u8(w, 0)?,
        Operand::BranchTarget(offset) => {
            write_u8(w, 1)?;
            write_i32(w, *offset)?;
        }
        Operand::ConstI4(v) => {
            write_u8(w, 2)?;
            write_i32(w, *v)?;
        }
        Operand::ConstI8(v) => {
            write_u8(w, 3)?;
            write_i64(w, *v)?;
        }
        Operand::ConstR4(v) => {
            write_u8(w, 4)?;
            write_f32(w, *v)?;
        }
        Operand::ConstR8(v) => {
            write_u8(w, 5)?;
            write_f64(w, *v)?;
        }
        Operand::LocalIndex(v) => {
            write_u8(w, 6)?;
            write_u16(w, *v)?;
        }
        Operand::ArgIndex(v) => {
            write_u8(w, 7)?;
            write_u16(w, *v)?;
        }
        Operand::Member(member) => {
            write_u8(w, 8)?;
            encode_member(w, member)?;
        }
        Operand::ElementType(ty) => {
            write_u8(w, 9)?;
            encode_type_ref(w, ty)?;
        }
        Operand::SwitchTargets(targets) => {
            write_u8(w, 10)?;
            write_u32(w, targets.len() as u32)?;
            for target in targets {
                write_i32(w, *target)?;
            }
        }
        Operand::String(s) => {
            write_u8(w, 11)?;
            write_string(w, s)?;
        }
    }
    Ok(())
}

fn decode_operand(r: &mut impl Read) -> Result<Operand, Error> {
    Ok(match read_u8(r)? {
        0 => Operand::None,
        1 => Operand::BranchTarget(read_i32(r)?),
        2 => Operand::ConstI4(read_i32(r)?),
        3 => Operand::ConstI8(read_i64(r)?),
        4 => Operand::ConstR4(read_f32(r)?),
        5 => Operand::ConstR8(read_f64(r)?),
        6 => Operand::LocalIndex(read_u16(r)?),
        7 => Operand::ArgIndex(read_u16(r)?),
        8 => Operand::Member(decode_member(r)?),
        9 => Operand::ElementType(decode_type_ref(r)?),
        10 => {
            let count = read_u32(r)?;
            let mut targets = Vec::with_capacity(count as usize);
            for _ in 0..count {
                targets.push(read_i32(r)?);
            }
            Operand::SwitchTargets(targets)
        }
        11 => Operand::String(read_string(r)?),
        tag => return Err(ErrorKind::Container(format!("unknown operand tag {tag}")).into()),
    })
}

fn encode_member(w: &mut impl Write, member: &MemberRef) -> Result<(), Error> {
    match member {
        MemberRef::Method(method_ref) => {
            write_u8(w, 0)?;
            encode_method_ref(w, method_ref)?;
        }
        MemberRef::Field(field_ref) => {
            write_u8(w, 1)?;
            encode_field_ref(w, field_ref)?;
        }
        MemberRef::Type(type_ref) => {
            write_u8(w, 2)?;
            write_u32(w, type_ref.0)?;
        }
    }
    Ok(())
}

fn decode_member(r: &mut impl Read) -> Result<MemberRef, Error> {
    Ok(match read_u8(r)? {
        0 => MemberRef::Method(decode_method_ref(r)?),
        1 => MemberRef::Field(decode_field_ref(r)?),
        2 => MemberRef::Type(TypeRef(read_u32(r)?)),
        tag => return Err(ErrorKind::Container(format!("unknown member tag {tag}")).into()),
    })
}

fn encode_method_ref(w: &mut impl Write, method_ref: &MethodRef) -> Result<(), Error> {
    write_u32(w, method_ref.declaring_type.0)?;
    write_bool(w, method_ref.is_constructor)?;
    write_bool(w, method_ref.has_this)?;
    write_bool(w, method_ref.explicit_this)?;
    write_u32(w, method_ref.parameters.len() as u32)?;
    for param in &method_ref.parameters {
        encode_type_ref(w, param)?;
    }
    write_u32(w, method_ref.out_parameters.len() as u32)?;
    for out in &method_ref.out_parameters {
        write_bool(w, *out)?;
    }
    match &method_ref.return_type {
        None => write_bool(w, false)?,
        Some(ty) => {
            write_bool(w, true)?;
            encode_type_ref(w, ty)?;
        }
    }
    Ok(())
}

fn decode_method_ref(r: &mut impl Read) -> Result<MethodRef, Error> {
    let declaring_type = TypeRef(read_u32(r)?);
    let is_constructor = read_bool(r)?;
    let has_this = read_bool(r)?;
    let explicit_this = read_bool(r)?;
    let param_count = read_u32(r)?;
    let mut parameters = Vec::with_capacity(param_count as usize);
    for _ in 0..param_count {
        parameters.push(decode_type_ref(r)?);
    }
    let out_count = read_u32(r)?;
    let mut out_parameters = Vec::with_capacity(out_count as usize);
    for _ in 0..out_count {
        out_parameters.push(read_bool(r)?);
    }
    let return_type = if read_bool(r)? {
        Some(decode_type_ref(r)?)
    } else {
        None
    };
    Ok(MethodRef {
        declaring_type,
        is_constructor,
        has_this,
        explicit_this,
        parameters,
        out_parameters,
        return_type,
    })
}

fn encode_field_ref(w: &mut impl Write, field_ref: &FieldRef) -> Result<(), Error> {
    write_u32(w, field_ref.declaring_type.0)?;
    encode_type_ref(w, &field_ref.field_type)?;
    Ok(())
}

fn decode_field_ref(r: &mut impl Read) -> Result<FieldRef, Error> {
    let declaring_type = TypeRef(read_u32(r)?);
    let field_type = decode_type_ref(r)?;
    Ok(FieldRef {
        declaring_type,
        field_type,
    })
}

fn encode_type_ref(w: &mut impl Write, ty: &CilType) -> Result<(), Error> {
    match ty {
        CilType::Void => write_u8(w, 0)?,
        CilType::Bool => write_u8(w, 1)?,
        CilType::Char => write_u8(w, 2)?,
        CilType::I1 => write_u8(w, 3)?,
        CilType::U1 => write_u8(w, 4)?,
        CilType::I2 => write_u8(w, 5)?,
        CilType::U2 => write_u8(w, 6)?,
        CilType::I4 => write_u8(w, 7)?,
        CilType::U4 => write_u8(w, 8)?,
        CilType::I8 => write_u8(w, 9)?,
        CilType::U8 => write_u8(w, 10)?,
        CilType::R4 => write_u8(w, 11)?,
        CilType::R8 => write_u8(w, 12)?,
        CilType::IntPtr => write_u8(w, 13)?,
        CilType::UIntPtr => write_u8(w, 14)?,
        CilType::String => write_u8(w, 15)?,
        CilType::Object => write_u8(w, 16)?,
        CilType::TypedByReference => write_u8(w, 17)?,
        CilType::Sentinel => write_u8(w, 18)?,
        CilType::Pointer(inner) => {
            write_u8(w, 19)?;
            encode_type_ref(w, inner)?;
        }
        CilType::ByReference(inner) => {
            write_u8(w, 20)?;
            encode_type_ref(w, inner)?;
        }
        CilType::FunctionPointer => write_u8(w, 21)?,
        CilType::Array(inner) => {
            write_u8(w, 22)?;
            encode_type_ref(w, inner)?;
        }
        CilType::Class(type_ref) => {
            write_u8(w, 23)?;
            write_u32(w, type_ref.0)?;
        }
        CilType::ValueType { ty, underlying } => {
            write_u8(w, 24)?;
            write_u32(w, ty.0)?;
            match underlying {
                None => write_bool(w, false)?,
                Some(inner) => {
                    write_bool(w, true)?;
                    encode_type_ref(w, inner)?;
                }
            }
        }
        CilType::GenericVar(index) => {
            write_u8(w, 25)?;
            write_u32(w, *index)?;
        }
        CilType::GenericMVar(index) => {
            write_u8(w, 26)?;
            write_u32(w, *index)?;
        }
        CilType::Pinned(inner) => {
            write_u8(w, 27)?;
            encode_type_ref(w, inner)?;
        }
        CilType::RequiredModifier(inner) => {
            write_u8(w, 28)?;
            encode_type_ref(w, inner)?;
        }
        CilType::OptionalModifier(inner) => {
            write_u8(w, 29)?;
            encode_type_ref(w, inner)?;
        }
    }
    Ok(())
}

fn decode_type_ref(r: &mut impl Read) -> Result<CilType, Error> {
    Ok(match read_u8(r)? {
        0 => CilType::Void,
        1 => CilType::Bool,
        2 => CilType::Char,
        3 => CilType::I1,
        4 => CilType::U1,
        5 => CilType::I2,
        6 => CilType::U2,
        7 => CilType::I4,
        8 => CilType::U4,
        9 => CilType::I8,
        10 => CilType::U8,
        11 => CilType::R4,
        12 => CilType::R8,
        13 => CilType::IntPtr,
        14 => CilType::UIntPtr,
        15 => CilType::String,
        16 => CilType::Object,
        17 => CilType::TypedByReference,
        18 => CilType::Sentinel,
        19 => CilType::Pointer(Box::new(decode_type_ref(r)?)),
        20 => CilType::ByReference(Box::new(decode_type_ref(r)?)),
        21 => CilType::FunctionPointer,
        22 => CilType::Array(Box::new(decode_type_ref(r)?)),
        23 => CilType::Class(TypeRef(read_u32(r)?)),
        24 => {
            let ty = TypeRef(read_u32(r)?);
            let underlying = if read_bool(r)? {
                Some(Box::new(decode_type_ref(r)?))
            } else {
                None
            };
            CilType::ValueType { ty, underlying }
        }
        25 => CilType::GenericVar(read_u32(r)?),
        26 => CilType::GenericMVar(read_u32(r)?),
        27 => CilType::Pinned(Box::new(decode_type_ref(r)?)),
        28 => CilType::RequiredModifier(Box::new(decode_type_ref(r)?)),
        29 => CilType::OptionalModifier(Box::new(decode_type_ref(r)?)),
        tag => return Err(ErrorKind::Container(format!("unknown type tag {tag}")).into()),
    })
}

#[cfg(test)]
mod tests;
