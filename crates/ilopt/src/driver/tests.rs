use super::*;
use crate::container::{Event, Method, Module, Property};
use ilopt_cil::{CilType, Instruction, Local, MethodBody, Opcode, Operand};

fn instr(offset: u32, opcode: Opcode, operand: Operand) -> Instruction {
    Instruction::new(offset, opcode, operand)
}

/// `ldc.i4.0; stloc.0; ldloc.0; ret` — trivially provable under `none`.
fn assignable_method(name: &str) -> Method {
    Method {
        name: name.to_string(),
        body: Some(MethodBody {
            instructions: vec![
                instr(0, Opcode::LdcI40, Operand::None),
                instr(1, Opcode::Stloc0, Operand::None),
                instr(2, Opcode::Ldloc0, Operand::None),
                instr(3, Opcode::Ret, Operand::None),
            ],
            locals: vec![Local { ty: CilType::I4 }],
            this_parameter: None,
            parameters: vec![],
            init_locals: true,
            max_stack: 4,
        }),
    }
}

/// `ldloc.0; ret` — can never be proven assigned.
fn unassignable_method(name: &str) -> Method {
    Method {
        name: name.to_string(),
        body: Some(MethodBody {
            instructions: vec![
                instr(0, Opcode::Ldloc0, Operand::None),
                instr(1, Opcode::Ret, Operand::None),
            ],
            locals: vec![Local { ty: CilType::I4 }],
            this_parameter: None,
            parameters: vec![],
            init_locals: true,
            max_stack: 4,
        }),
    }
}

fn abstract_method(name: &str) -> Method {
    Method {
        name: name.to_string(),
        body: None,
    }
}

#[test]
fn counts_updated_skipped_and_failed_across_the_whole_tree() {
    let mut assembly = Assembly {
        modules: vec![Module {
            name: "Main".into(),
            types: vec![TypeDef {
                name: "Program".into(),
                nested_types: vec![TypeDef {
                    name: "Inner".into(),
                    nested_types: vec![],
                    methods: vec![assignable_method("Inner::Go")],
                    events: vec![],
                    properties: vec![],
                }],
                methods: vec![
                    assignable_method("Program::Main"),
                    unassignable_method("Program::Broken"),
                    abstract_method("Program::Abstract"),
                ],
                events: vec![Event {
                    name: "Changed".into(),
                }],
                properties: vec![Property {
                    name: "Count".into(),
                }],
            }],
        }],
    };

    let report = optimize_assembly(&mut assembly, Mode::None);

    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.processed.modules, 1);
    assert_eq!(report.processed.types, 2);
    assert_eq!(report.processed.methods, 4);
    assert_eq!(report.processed.events, 1);
    assert_eq!(report.processed.properties, 1);

    let program = &assembly.modules[0].types[0];
    assert!(!program.methods[0].body.as_ref().unwrap().init_locals);
    assert!(program.methods[1].body.as_ref().unwrap().init_locals);
    assert!(!program.nested_types[0].methods[0]
        .body
        .as_ref()
        .unwrap()
        .init_locals);
}

#[test]
fn methods_without_a_body_are_counted_but_never_touch_a_verdict() {
    let mut assembly = Assembly {
        modules: vec![Module {
            name: "Main".into(),
            types: vec![TypeDef {
                name: "IThing".into(),
                nested_types: vec![],
                methods: vec![abstract_method("IThing::Do")],
                events: vec![],
                properties: vec![],
            }],
        }],
    };

    let report = optimize_assembly(&mut assembly, Mode::All);
    assert_eq!(report.processed.methods, 1);
    assert_eq!(report.updated + report.skipped + report.failed, 0);
}

#[test]
fn all_mode_updates_every_eligible_method_regardless_of_provability() {
    let mut assembly = Assembly {
        modules: vec![Module {
            name: "Main".into(),
            types: vec![TypeDef {
                name: "Program".into(),
                nested_types: vec![],
                methods: vec![unassignable_method("Program::Broken")],
                events: vec![],
                properties: vec![],
            }],
        }],
    };

    let report = optimize_assembly(&mut assembly, Mode::All);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn filter_excludes_non_matching_types_entirely() {
    let mut assembly = Assembly {
        modules: vec![Module {
            name: "Main".into(),
            types: vec![
                TypeDef {
                    name: "Program".into(),
                    nested_types: vec![],
                    methods: vec![unassignable_method("Program::Broken")],
                    events: vec![],
                    properties: vec![],
                },
                TypeDef {
                    name: "Generated".into(),
                    nested_types: vec![],
                    methods: vec![unassignable_method("Generated::Broken")],
                    events: vec![],
                    properties: vec![],
                },
            ],
        }],
    };

    let keep_program = |name: &str| name == "Program";
    let report =
        optimize_assembly_filtered(&mut assembly, Mode::All, Some(&keep_program));

    assert_eq!(report.processed.types, 1);
    assert_eq!(report.processed.methods, 1);
    assert_eq!(report.updated, 1);
    assert!(!assembly.modules[0].types[0].methods[0]
        .body
        .as_ref()
        .unwrap()
        .init_locals);
    assert!(assembly.modules[0].types[1].methods[0]
        .body
        .as_ref()
        .unwrap()
        .init_locals);
}
