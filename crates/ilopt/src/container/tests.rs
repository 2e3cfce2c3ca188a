use super::*;
use ilopt_cil::{CilType, Instruction, Local, MethodRef, Opcode, Parameter};
use std::io::Cursor;

fn instr(offset: u32, opcode: Opcode, operand: Operand) -> Instruction {
    Instruction::new(offset, opcode, operand)
}

fn sample_assembly() -> Assembly {
    Assembly {
        modules: vec![Module {
            name: "Sample".into(),
            types: vec![TypeDef {
                name: "Program".into(),
                nested_types: vec![TypeDef {
                    name: "Nested".into(),
                    nested_types: vec![],
                    methods: vec![],
                    events: vec![],
                    properties: vec![],
                }],
                methods: vec![
                    Method {
                        name: "Main".into(),
                        body: Some(MethodBody {
                            instructions: vec![
                                instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
                                instr(
                                    1,
                                    Opcode::Call,
                                    Operand::Member(MemberRef::Method(MethodRef {
                                        declaring_type: TypeRef(7),
                                        is_constructor: true,
                                        has_this: true,
                                        explicit_this: false,
                                        parameters: vec![CilType::I4, CilType::String],
                                        out_parameters: vec![false, true],
                                        return_type: Some(CilType::Pointer(Box::new(
                                            CilType::ValueType {
                                                ty: TypeRef(3),
                                                underlying: Some(Box::new(CilType::I4)),
                                            },
                                        ))),
                                    })),
                                ),
                                instr(
                                    2,
                                    Opcode::Switch,
                                    Operand::SwitchTargets(vec![1, -1, 4]),
                                ),
                                instr(3, Opcode::Ldstr, Operand::String("hi".into())),
                                instr(4, Opcode::LdcR8, Operand::ConstR8(2.5)),
                                instr(5, Opcode::Ret, Operand::None),
                            ],
                            locals: vec![
                                Local { ty: CilType::I4 },
                                Local {
                                    ty: CilType::Array(Box::new(CilType::Object)),
                                },
                            ],
                            this_parameter: Some(Parameter {
                                ty: CilType::Class(TypeRef(1)),
                            }),
                            parameters: vec![Parameter { ty: CilType::I4 }],
                            init_locals: true,
                            max_stack: 8,
                        }),
                    },
                    Method {
                        name: "Abstract".into(),
                        body: None,
                    },
                ],
                events: vec![Event {
                    name: "Changed".into(),
                }],
                properties: vec![Property {
                    name: "Count".into(),
                }],
            }],
        }],
    }
}

#[test]
fn assembly_round_trips_through_encode_and_decode() {
    let assembly = sample_assembly();
    let mut buf = Vec::new();
    encode_assembly(&mut buf, &assembly).unwrap();
    let mut cursor = Cursor::new(buf);
    let decoded = decode_assembly(&mut cursor).unwrap();
    assert_eq!(decoded, assembly);
}

#[test]
fn write_then_read_round_trips_through_a_real_file() {
    let dir = std::env::temp_dir().join(format!(
        "ilopt-container-test-{:?}",
        std::thread::current().id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sample.ilasm");
    let assembly = sample_assembly();

    write_assembly(&path, &assembly).unwrap();
    let decoded = read_assembly(&path).unwrap();
    assert_eq!(decoded, assembly);

    std::fs::remove_file(&path).unwrap();
    let tmp = temp_path_for(&path);
    assert!(!tmp.exists());
}

#[test]
fn read_assembly_rejects_bad_magic() {
    let dir = std::env::temp_dir().join(format!(
        "ilopt-container-test-badmagic-{:?}",
        std::thread::current().id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.ilasm");
    std::fs::write(&path, b"NOPE").unwrap();

    let result = read_assembly(&path);
    assert!(result.is_err());
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn read_assembly_rejects_future_version() {
    let dir = std::env::temp_dir().join(format!(
        "ilopt-container-test-version-{:?}",
        std::thread::current().id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("future.ilasm");
    let mut bytes = MAGIC.to_vec();
    bytes.extend_from_slice(&(VERSION + 1).to_le_bytes());
    std::fs::write(&path, bytes).unwrap();

    let result = read_assembly(&path);
    assert!(result.is_err());
    std::fs::remove_file(&path).unwrap();
}
