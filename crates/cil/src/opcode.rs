/// A single CIL opcode.
///
/// Single-byte opcodes keep their ECMA-335 numeric value as the
/// discriminant (`0x00..=0xE0`, plus the `0xFE` two-byte instruction
/// prefix). The two-byte ("long form") opcodes that follow a `0xFE` prefix
/// byte are numbered `0x100 + second_byte` here so that every [`Opcode`]
/// still has a single dense `u16` code suitable for a lookup-table index,
/// without pretending `0xFE` itself is a meaningful opcode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Opcode {
    Nop = 0x00,
    Break = 0x01,
    Ldarg0 = 0x02,
    Ldarg1 = 0x03,
    Ldarg2 = 0x04,
    Ldarg3 = 0x05,
    Ldloc0 = 0x06,
    Ldloc1 = 0x07,
    Ldloc2 = 0x08,
    Ldloc3 = 0x09,
    Stloc0 = 0x0A,
    Stloc1 = 0x0B,
    Stloc2 = 0x0C,
    Stloc3 = 0x0D,
    LdargS = 0x0E,
    LdargaS = 0x0F,
    StargS = 0x10,
    LdlocS = 0x11,
    LdlocaS = 0x12,
    StlocS = 0x13,
    Ldnull = 0x14,
    LdcI4M1 = 0x15,
    LdcI40 = 0x16,
    LdcI41 = 0x17,
    LdcI42 = 0x18,
    LdcI43 = 0x19,
    LdcI44 = 0x1A,
    LdcI45 = 0x1B,
    LdcI46 = 0x1C,
    LdcI47 = 0x1D,
    LdcI48 = 0x1E,
    LdcI4S = 0x1F,
    LdcI4 = 0x20,
    LdcI8 = 0x21,
    LdcR4 = 0x22,
    LdcR8 = 0x23,
    Dup = 0x25,
    Pop = 0x26,
    Jmp = 0x27,
    Call = 0x28,
    Calli = 0x29,
    Ret = 0x2A,
    BrS = 0x2B,
    BrfalseS = 0x2C,
    BrtrueS = 0x2D,
    BeqS = 0x2E,
    BgeS = 0x2F,
    BgtS = 0x30,
    BleS = 0x31,
    BltS = 0x32,
    BneUnS = 0x33,
    BgeUnS = 0x34,
    BgtUnS = 0x35,
    BleUnS = 0x36,
    BltUnS = 0x37,
    Br = 0x38,
    Brfalse = 0x39,
    Brtrue = 0x3A,
    Beq = 0x3B,
    Bge = 0x3C,
    Bgt = 0x3D,
    Ble = 0x3E,
    Blt = 0x3F,
    BneUn = 0x40,
    BgeUn = 0x41,
    BgtUn = 0x42,
    BleUn = 0x43,
    BltUn = 0x44,
    Switch = 0x45,
    LdindI1 = 0x46,
    LdindU1 = 0x47,
    LdindI2 = 0x48,
    LdindU2 = 0x49,
    LdindI4 = 0x4A,
    LdindU4 = 0x4B,
    LdindI8 = 0x4C,
    LdindI = 0x4D,
    LdindR4 = 0x4E,
    LdindR8 = 0x4F,
    LdindRef = 0x50,
    StindRef = 0x51,
    StindI1 = 0x52,
    StindI2 = 0x53,
    StindI4 = 0x54,
    StindI8 = 0x55,
    StindR4 = 0x56,
    StindR8 = 0x57,
    Add = 0x58,
    Sub = 0x59,
    Mul = 0x5A,
    Div = 0x5B,
    DivUn = 0x5C,
    Rem = 0x5D,
    RemUn = 0x5E,
    And = 0x5F,
    Or = 0x60,
    Xor = 0x61,
    Shl = 0x62,
    Shr = 0x63,
    ShrUn = 0x64,
    Neg = 0x65,
    Not = 0x66,
    ConvI1 = 0x67,
    ConvI2 = 0x68,
    ConvI4 = 0x69,
    ConvI8 = 0x6A,
    ConvR4 = 0x6B,
    ConvR8 = 0x6C,
    ConvU4 = 0x6D,
    ConvU8 = 0x6E,
    Callvirt = 0x6F,
    Cpobj = 0x70,
    Ldobj = 0x71,
    Ldstr = 0x72,
    Newobj = 0x73,
    Castclass = 0x74,
    Isinst = 0x75,
    ConvRUn = 0x76,
    Unbox = 0x79,
    Throw = 0x7A,
    Ldfld = 0x7B,
    Ldflda = 0x7C,
    Stfld = 0x7D,
    Ldsfld = 0x7E,
    Ldsflda = 0x7F,
    Stsfld = 0x80,
    Stobj = 0x81,
    ConvOvfI1Un = 0x82,
    ConvOvfI2Un = 0x83,
    ConvOvfI4Un = 0x84,
    ConvOvfI8Un = 0x85,
    ConvOvfU1Un = 0x86,
    ConvOvfU2Un = 0x87,
    ConvOvfU4Un = 0x88,
    ConvOvfU8Un = 0x89,
    ConvOvfIUn = 0x8A,
    ConvOvfUUn = 0x8B,
    Box = 0x8C,
    Newarr = 0x8D,
    Ldlen = 0x8E,
    Ldelema = 0x8F,
    LdelemI1 = 0x90,
    LdelemU1 = 0x91,
    LdelemI2 = 0x92,
    LdelemU2 = 0x93,
    LdelemI4 = 0x94,
    LdelemU4 = 0x95,
    LdelemI8 = 0x96,
    LdelemI = 0x97,
    LdelemR4 = 0x98,
    LdelemR8 = 0x99,
    LdelemRef = 0x9A,
    StelemI = 0x9B,
    StelemI1 = 0x9C,
    StelemI2 = 0x9D,
    StelemI4 = 0x9E,
    StelemI8 = 0x9F,
    StelemR4 = 0xA0,
    StelemR8 = 0xA1,
    StelemRef = 0xA2,
    Ldelem = 0xA3,
    Stelem = 0xA4,
    UnboxAny = 0xA5,
    ConvOvfI1 = 0xB3,
    ConvOvfU1 = 0xB4,
    ConvOvfI2 = 0xB5,
    ConvOvfU2 = 0xB6,
    ConvOvfI4 = 0xB7,
    ConvOvfU4 = 0xB8,
    ConvOvfI8 = 0xB9,
    ConvOvfU8 = 0xBA,
    Refanyval = 0xC2,
    Ckfinite = 0xC3,
    Mkrefany = 0xC6,
    Ldtoken = 0xD0,
    ConvU2 = 0xD1,
    ConvU1 = 0xD2,
    ConvI = 0xD3,
    ConvOvfI = 0xD4,
    ConvOvfU = 0xD5,
    AddOvf = 0xD6,
    AddOvfUn = 0xD7,
    MulOvf = 0xD8,
    MulOvfUn = 0xD9,
    SubOvf = 0xDA,
    SubOvfUn = 0xDB,
    Endfinally = 0xDC,
    Leave = 0xDD,
    LeaveS = 0xDE,
    StindI = 0xDF,
    ConvU = 0xE0,

    // Two-byte (`0xFE`-prefixed) opcodes, numbered `0x100 + second_byte`.
    Arglist = 0x100,
    Ceq = 0x101,
    Cgt = 0x102,
    CgtUn = 0x103,
    Clt = 0x104,
    CltUn = 0x105,
    Ldftn = 0x106,
    Ldvirtftn = 0x107,
    Ldarg = 0x109,
    Ldarga = 0x10A,
    Starg = 0x10B,
    Ldloc = 0x10C,
    Ldloca = 0x10D,
    Stloc = 0x10E,
    Localloc = 0x10F,
    Endfilter = 0x111,
    Unaligned = 0x112,
    Volatile = 0x113,
    Tail = 0x114,
    Initobj = 0x115,
    Constrained = 0x116,
    Cpblk = 0x117,
    Initblk = 0x118,
    NoCheck = 0x119,
    Rethrow = 0x11A,
    Sizeof = 0x11C,
    Refanytype = 0x11D,
    Readonly = 0x11E,
}

impl Opcode {
    /// Returns the dense numeric code used to index the family lookup table.
    pub fn numeric_code(self) -> u16 {
        self as u16
    }

    /// Resolves the [`Opcode`] with the given [`Opcode::numeric_code`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnknownOpcode`] if `code` names no opcode in
    /// this table (true both of genuinely invalid ECMA-335 codes and of
    /// the handful of reserved single-byte gaps this enum does not model).
    pub fn from_numeric_code(code: u16) -> Result<Self, crate::error::Error> {
        use Opcode::*;
        Ok(match code {
            0x00 => Nop,
            0x01 => Break,
            0x02 => Ldarg0,
            0x03 => Ldarg1,
            0x04 => Ldarg2,
            0x05 => Ldarg3,
            0x06 => Ldloc0,
            0x07 => Ldloc1,
            0x08 => Ldloc2,
            0x09 => Ldloc3,
            0x0A => Stloc0,
            0x0B => Stloc1,
            0x0C => Stloc2,
            0x0D => Stloc3,
            0x0E => LdargS,
            0x0F => LdargaS,
            0x10 => StargS,
            0x11 => LdlocS,
            0x12 => LdlocaS,
            0x13 => StlocS,
            0x14 => Ldnull,
            0x15 => LdcI4M1,
            0x16 => LdcI40,
            0x17 => LdcI41,
            0x18 => LdcI42,
            0x19 => LdcI43,
            0x1A => LdcI44,
            0x1B => LdcI45,
            0x1C => LdcI46,
            0x1D => LdcI47,
            0x1E => LdcI48,
            0x1F => LdcI4S,
            0x20 => LdcI4,
            0x21 => LdcI8,
            0x22 => LdcR4,
            0x23 => LdcR8,
            0x25 => Dup,
            0x26 => Pop,
            0x27 => Jmp,
            0x28 => Call,
            0x29 => Calli,
            0x2A => Ret,
            0x2B => BrS,
            0x2C => BrfalseS,
            0x2D => BrtrueS,
            0x2E => BeqS,
            0x2F => BgeS,
            0x30 => BgtS,
            0x31 => BleS,
            0x32 => BltS,
            0x33 => BneUnS,
            0x34 => BgeUnS,
            0x35 => BgtUnS,
            0x36 => BleUnS,
            0x37 => BltUnS,
            0x38 => Br,
            0x39 => Brfalse,
            0x3A => Brtrue,
            0x3B => Beq,
            0x3C => Bge,
            0x3D => Bgt,
            0x3E => Ble,
            0x3F => Blt,
            0x40 => BneUn,
            0x41 => BgeUn,
            0x42 => BgtUn,
            0x43 => BleUn,
            0x44 => BltUn,
            0x45 => Switch,
            0x46 => LdindI1,
            0x47 => LdindU1,
            0x48 => LdindI2,
            0x49 => LdindU2,
            0x4A => LdindI4,
            0x4B => LdindU4,
            0x4C => LdindI8,
            0x4D => LdindI,
            0x4E => LdindR4,
            0x4F => LdindR8,
            0x50 => LdindRef,
            0x51 => StindRef,
            0x52 => StindI1,
            0x53 => StindI2,
            0x54 => StindI4,
            0x55 => StindI8,
            0x56 => StindR4,
            0x57 => StindR8,
            0x58 => Add,
            0x59 => Sub,
            0x5A => Mul,
            0x5B => Div,
            0x5C => DivUn,
            0x5D => Rem,
            0x5E => RemUn,
            0x5F => And,
            0x60 => Or,
            0x61 => Xor,
            0x62 => Shl,
            0x63 => Shr,
            0x64 => ShrUn,
            0x65 => Neg,
            0x66 => Not,
            0x67 => ConvI1,
            0x68 => ConvI2,
            0x69 => ConvI4,
            0x6A => ConvI8,
            0x6B => ConvR4,
            0x6C => ConvR8,
            0x6D => ConvU4,
            0x6E => ConvU8,
            0x6F => Callvirt,
            0x70 => Cpobj,
            0x71 => Ldobj,
            0x72 => Ldstr,
            0x73 => Newobj,
            0x74 => Castclass,
            0x75 => Isinst,
            0x76 => ConvRUn,
            0x79 => Unbox,
            0x7A => Throw,
            0x7B => Ldfld,
            0x7C => Ldflda,
            0x7D => Stfld,
            0x7E => Ldsfld,
            0x7F => Ldsflda,
            0x80 => Stsfld,
            0x81 => Stobj,
            0x82 => ConvOvfI1Un,
            0x83 => ConvOvfI2Un,
            0x84 => ConvOvfI4Un,
            0x85 => ConvOvfI8Un,
            0x86 => ConvOvfU1Un,
            0x87 => ConvOvfU2Un,
            0x88 => ConvOvfU4Un,
            0x89 => ConvOvfU8Un,
            0x8A => ConvOvfIUn,
            0x8B => ConvOvfUUn,
            0x8C => Box,
            0x8D => Newarr,
            0x8E => Ldlen,
            0x8F => Ldelema,
            0x90 => LdelemI1,
            0x91 => LdelemU1,
            0x92 => LdelemI2,
            0x93 => LdelemU2,
            0x94 => LdelemI4,
            0x95 => LdelemU4,
            0x96 => LdelemI8,
            0x97 => LdelemI,
            0x98 => LdelemR4,
            0x99 => LdelemR8,
            0x9A => LdelemRef,
            0x9B => StelemI,
            0x9C => StelemI1,
            0x9D => StelemI2,
            0x9E => StelemI4,
            0x9F => StelemI8,
            0xA0 => StelemR4,
            0xA1 => StelemR8,
            0xA2 => StelemRef,
            0xA3 => Ldelem,
            0xA4 => Stelem,
            0xA5 => UnboxAny,
            0xB3 => ConvOvfI1,
            0xB4 => ConvOvfU1,
            0xB5 => ConvOvfI2,
            0xB6 => ConvOvfU2,
            0xB7 => ConvOvfI4,
            0xB8 => ConvOvfU4,
            0xB9 => ConvOvfI8,
            0xBA => ConvOvfU8,
            0xC2 => Refanyval,
            0xC3 => Ckfinite,
            0xC6 => Mkrefany,
            0xD0 => Ldtoken,
            0xD1 => ConvU2,
            0xD2 => ConvU1,
            0xD3 => ConvI,
            0xD4 => ConvOvfI,
            0xD5 => ConvOvfU,
            0xD6 => AddOvf,
            0xD7 => AddOvfUn,
            0xD8 => MulOvf,
            0xD9 => MulOvfUn,
            0xDA => SubOvf,
            0xDB => SubOvfUn,
            0xDC => Endfinally,
            0xDD => Leave,
            0xDE => LeaveS,
            0xDF => StindI,
            0xE0 => ConvU,
            0x100 => Arglist,
            0x101 => Ceq,
            0x102 => Cgt,
            0x103 => CgtUn,
            0x104 => Clt,
            0x105 => CltUn,
            0x106 => Ldftn,
            0x107 => Ldvirtftn,
            0x109 => Ldarg,
            0x10A => Ldarga,
            0x10B => Starg,
            0x10C => Ldloc,
            0x10D => Ldloca,
            0x10E => Stloc,
            0x10F => Localloc,
            0x111 => Endfilter,
            0x112 => Unaligned,
            0x113 => Volatile,
            0x114 => Tail,
            0x115 => Initobj,
            0x116 => Constrained,
            0x117 => Cpblk,
            0x118 => Initblk,
            0x119 => NoCheck,
            0x11A => Rethrow,
            0x11C => Sizeof,
            0x11D => Refanytype,
            0x11E => Readonly,
            _ => return Err(crate::error::ErrorKind::UnknownOpcode { code }.into()),
        })
    }

    /// Returns the canonical CIL mnemonic for this opcode.
    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            Nop => "nop",
            Break => "break",
            Ldarg0 => "ldarg.0",
            Ldarg1 => "ldarg.1",
            Ldarg2 => "ldarg.2",
            Ldarg3 => "ldarg.3",
            Ldloc0 => "ldloc.0",
            Ldloc1 => "ldloc.1",
            Ldloc2 => "ldloc.2",
            Ldloc3 => "ldloc.3",
            Stloc0 => "stloc.0",
            Stloc1 => "stloc.1",
            Stloc2 => "stloc.2",
            Stloc3 => "stloc.3",
            LdargS => "ldarg.s",
            LdargaS => "ldarga.s",
            StargS => "starg.s",
            LdlocS => "ldloc.s",
            LdlocaS => "ldloca.s",
            StlocS => "stloc.s",
            Ldnull => "ldnull",
            LdcI4M1 => "ldc.i4.m1",
            LdcI40 => "ldc.i4.0",
            LdcI41 => "ldc.i4.1",
            LdcI42 => "ldc.i4.2",
            LdcI43 => "ldc.i4.3",
            LdcI44 => "ldc.i4.4",
            LdcI45 => "ldc.i4.5",
            LdcI46 => "ldc.i4.6",
            LdcI47 => "ldc.i4.7",
            LdcI48 => "ldc.i4.8",
            LdcI4S => "ldc.i4.s",
            LdcI4 => "ldc.i4",
            LdcI8 => "ldc.i8",
            LdcR4 => "ldc.r4",
            LdcR8 => "ldc.r8",
            Dup => "dup",
            Pop => "pop",
            Jmp => "jmp",
            Call => "call",
            Calli => "calli",
            Ret => "ret",
            BrS => "br.s",
            BrfalseS => "brfalse.s",
            BrtrueS => "brtrue.s",
            BeqS => "beq.s",
            BgeS => "bge.s",
            BgtS => "bgt.s",
            BleS => "ble.s",
            BltS => "blt.s",
            BneUnS => "bne.un.s",
            BgeUnS => "bge.un.s",
            BgtUnS => "bgt.un.s",
            BleUnS => "ble.un.s",
            BltUnS => "blt.un.s",
            Br => "br",
            Brfalse => "brfalse",
            Brtrue => "brtrue",
            Beq => "beq",
            Bge => "bge",
            Bgt => "bgt",
            Ble => "ble",
            Blt => "blt",
            BneUn => "bne.un",
            BgeUn => "bge.un",
            BgtUn => "bgt.un",
            BleUn => "ble.un",
            BltUn => "blt.un",
            Switch => "switch",
            LdindI1 => "ldind.i1",
            LdindU1 => "ldind.u1",
            LdindI2 => "ldind.i2",
            LdindU2 => "ldind.u2",
            LdindI4 => "ldind.i4",
            LdindU4 => "ldind.u4",
            LdindI8 => "ldind.i8",
            LdindI => "ldind.i",
            LdindR4 => "ldind.r4",
            LdindR8 => "ldind.r8",
            LdindRef => "ldind.ref",
            StindRef => "stind.ref",
            StindI1 => "stind.i1",
            StindI2 => "stind.i2",
            StindI4 => "stind.i4",
            StindI8 => "stind.i8",
            StindR4 => "stind.r4",
            StindR8 => "stind.r8",
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            DivUn => "div.un",
            Rem => "rem",
            RemUn => "rem.un",
            And => "and",
            Or => "or",
            Xor => "xor",
            Shl => "shl",
            Shr => "shr",
            ShrUn => "shr.un",
            Neg => "neg",
            Not => "not",
            ConvI1 => "conv.i1",
            ConvI2 => "conv.i2",
            ConvI4 => "conv.i4",
            ConvI8 => "conv.i8",
            ConvR4 => "conv.r4",
            ConvR8 => "conv.r8",
            ConvU4 => "conv.u4",
            ConvU8 => "conv.u8",
            Callvirt => "callvirt",
            Cpobj => "cpobj",
            Ldobj => "ldobj",
            Ldstr => "ldstr",
            Newobj => "newobj",
            Castclass => "castclass",
            Isinst => "isinst",
            ConvRUn => "conv.r.un",
            Unbox => "unbox",
            Throw => "throw",
            Ldfld => "ldfld",
            Ldflda => "ldflda",
            Stfld => "stfld",
            Ldsfld => "ldsfld",
            Ldsflda => "ldsflda",
            Stsfld => "stsfld",
            Stobj => "stobj",
            ConvOvfI1Un => "conv.ovf.i1.un",
            ConvOvfI2Un => "conv.ovf.i2.un",
            ConvOvfI4Un => "conv.ovf.i4.un",
            ConvOvfI8Un => "conv.ovf.i8.un",
            ConvOvfU1Un => "conv.ovf.u1.un",
            ConvOvfU2Un => "conv.ovf.u2.un",
            ConvOvfU4Un => "conv.ovf.u4.un",
            ConvOvfU8Un => "conv.ovf.u8.un",
            ConvOvfIUn => "conv.ovf.i.un",
            ConvOvfUUn => "conv.ovf.u.un",
            Box => "box",
            Newarr => "newarr",
            Ldlen => "ldlen",
            Ldelema => "ldelema",
            LdelemI1 => "ldelem.i1",
            LdelemU1 => "ldelem.u1",
            LdelemI2 => "ldelem.i2",
            LdelemU2 => "ldelem.u2",
            LdelemI4 => "ldelem.i4",
            LdelemU4 => "ldelem.u4",
            LdelemI8 => "ldelem.i8",
            LdelemI => "ldelem.i",
            LdelemR4 => "ldelem.r4",
            LdelemR8 => "ldelem.r8",
            LdelemRef => "ldelem.ref",
            StelemI => "stelem.i",
            StelemI1 => "stelem.i1",
            StelemI2 => "stelem.i2",
            StelemI4 => "stelem.i4",
            StelemI8 => "stelem.i8",
            StelemR4 => "stelem.r4",
            StelemR8 => "stelem.r8",
            StelemRef => "stelem.ref",
            Ldelem => "ldelem",
            Stelem => "stelem",
            UnboxAny => "unbox.any",
            ConvOvfI1 => "conv.ovf.i1",
            ConvOvfU1 => "conv.ovf.u1",
            ConvOvfI2 => "conv.ovf.i2",
            ConvOvfU2 => "conv.ovf.u2",
            ConvOvfI4 => "conv.ovf.i4",
            ConvOvfU4 => "conv.ovf.u4",
            ConvOvfI8 => "conv.ovf.i8",
            ConvOvfU8 => "conv.ovf.u8",
            Refanyval => "refanyval",
            Ckfinite => "ckfinite",
            Mkrefany => "mkrefany",
            Ldtoken => "ldtoken",
            ConvU2 => "conv.u2",
            ConvU1 => "conv.u1",
            ConvI => "conv.i",
            ConvOvfI => "conv.ovf.i",
            ConvOvfU => "conv.ovf.u",
            AddOvf => "add.ovf",
            AddOvfUn => "add.ovf.un",
            MulOvf => "mul.ovf",
            MulOvfUn => "mul.ovf.un",
            SubOvf => "sub.ovf",
            SubOvfUn => "sub.ovf.un",
            Endfinally => "endfinally",
            Leave => "leave",
            LeaveS => "leave.s",
            StindI => "stind.i",
            ConvU => "conv.u",
            Arglist => "arglist",
            Ceq => "ceq",
            Cgt => "cgt",
            CgtUn => "cgt.un",
            Clt => "clt",
            CltUn => "clt.un",
            Ldftn => "ldftn",
            Ldvirtftn => "ldvirtftn",
            Ldarg => "ldarg",
            Ldarga => "ldarga",
            Starg => "starg",
            Ldloc => "ldloc",
            Ldloca => "ldloca",
            Stloc => "stloc",
            Localloc => "localloc",
            Endfilter => "endfilter",
            Unaligned => "unaligned.",
            Volatile => "volatile.",
            Tail => "tail.",
            Initobj => "initobj",
            Constrained => "constrained.",
            Cpblk => "cpblk",
            Initblk => "initblk",
            NoCheck => "no.",
            Rethrow => "rethrow",
            Sizeof => "sizeof",
            Refanytype => "refanytype",
            Readonly => "readonly.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code_matches_ecma_335_for_single_byte_opcodes() {
        assert_eq!(Opcode::Nop.numeric_code(), 0x00);
        assert_eq!(Opcode::Ret.numeric_code(), 0x2A);
        assert_eq!(Opcode::ConvU.numeric_code(), 0xE0);
    }

    #[test]
    fn two_byte_opcodes_are_offset_by_0x100() {
        assert_eq!(Opcode::Ldloca.numeric_code(), 0x10D);
        assert_eq!(Opcode::Initobj.numeric_code(), 0x115);
        assert_eq!(Opcode::Readonly.numeric_code(), 0x11E);
    }

    #[test]
    fn mnemonics_are_lower_dotted() {
        assert_eq!(Opcode::LdlocaS.mnemonic(), "ldloca.s");
        assert_eq!(Opcode::Callvirt.mnemonic(), "callvirt");
    }

    #[test]
    fn from_numeric_code_round_trips_single_and_two_byte_opcodes() {
        for opcode in [
            Opcode::Nop,
            Opcode::Ret,
            Opcode::ConvU,
            Opcode::Ldloca,
            Opcode::LdlocaS,
            Opcode::Initobj,
            Opcode::Callvirt,
            Opcode::Readonly,
        ] {
            let code = opcode.numeric_code();
            assert_eq!(Opcode::from_numeric_code(code).unwrap(), opcode);
        }
    }

    #[test]
    fn from_numeric_code_rejects_unknown_codes() {
        assert!(Opcode::from_numeric_code(0xFFFF).is_err());
    }
}
