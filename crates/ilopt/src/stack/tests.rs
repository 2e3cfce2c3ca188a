use super::*;
use ilopt_cil::{CilType, FieldRef, Instruction, Local, MemberRef, MethodRef, Operand, TypeRef};

fn body(locals: Vec<Local>, instructions: Vec<Instruction>) -> MethodBody {
    MethodBody {
        instructions,
        locals,
        this_parameter: None,
        parameters: vec![],
        init_locals: true,
        max_stack: 4,
    }
}

fn instr(offset: u32, opcode: Opcode, operand: Operand) -> Instruction {
    Instruction::new(offset, opcode, operand)
}

/// `ldloca.0; stloc.0` — scenario 3 in the worked examples: the address
/// is consumed at depth 0 by an ordinary `stloc`, a store through the
/// address rather than a read from it.
#[test]
fn stloc_consumes_the_address_at_depth_zero() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::Stloc0, Operand::None),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Stloc0);
    assert_eq!(consumer.stack_index, 0);
}

/// `ldloca.0; initobj <T>` — the address is consumed by `initobj` acting
/// as a write, also at depth 0.
#[test]
fn initobj_consumes_the_address_it_was_pushed_for() {
    let method = body(
        vec![Local {
            ty: CilType::ValueType {
                ty: TypeRef(1),
                underlying: None,
            },
        }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(
                1,
                Opcode::Initobj,
                Operand::Member(MemberRef::Type(TypeRef(1))),
            ),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Initobj);
    assert_eq!(consumer.stack_index, 0);
}

/// `ldloca.0; call instance void MyStruct::.ctor()` — a value-type
/// constructor invoked on the local's own address (the idiom a compiler
/// uses to construct a struct in place, as opposed to `newobj` which
/// allocates a fresh instance): the address is the implicit `this` the
/// call pops, recognized as the consumer at position 0.
#[test]
fn zero_argument_constructor_consumes_the_address() {
    let method = body(
        vec![Local {
            ty: CilType::ValueType {
                ty: TypeRef(1),
                underlying: None,
            },
        }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(
                1,
                Opcode::Call,
                Operand::Member(MemberRef::Method(MethodRef {
                    declaring_type: TypeRef(1),
                    is_constructor: true,
                    has_this: true,
                    explicit_this: false,
                    parameters: vec![],
                    out_parameters: vec![],
                    return_type: None,
                })),
            ),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Call);
    assert_eq!(consumer.stack_index, 0);
}

/// `ldloca.0; ldc.i4.0; call Try(int, out int)` — the local's address is
/// pushed *before* the other argument, so it is the earliest-pushed (and
/// here, only tracked-and-untracked) slot in the call's pop range:
/// `stack_index` is 0, the position of the call's first parameter.
#[test]
fn address_pushed_first_is_the_bottom_of_the_call_args() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::LdcI40, Operand::None),
            instr(
                2,
                Opcode::Call,
                Operand::Member(MemberRef::Method(MethodRef {
                    declaring_type: TypeRef(2),
                    is_constructor: false,
                    has_this: false,
                    explicit_this: false,
                    parameters: vec![CilType::I4, CilType::I4],
                    out_parameters: vec![true, false],
                    return_type: Some(CilType::Bool),
                })),
            ),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Call);
    assert_eq!(consumer.stack_index, 0);
}

/// `ldc.i4.0; ldloca.0; call Try(int, out int)` — here the ordinary
/// argument is pushed *before* the address is even tracked, so it never
/// appears in the simulator's view: the call's required pops (2) exceed
/// the tracked depth (1), and the excess (1) is exactly the address's
/// position among the call's arguments — its real position as the second
/// (`out`) parameter.
#[test]
fn untracked_earlier_argument_shifts_the_address_deeper() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdcI40, Operand::None),
            instr(1, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(
                2,
                Opcode::Call,
                Operand::Member(MemberRef::Method(MethodRef {
                    declaring_type: TypeRef(2),
                    is_constructor: false,
                    has_this: false,
                    explicit_this: false,
                    parameters: vec![CilType::I4, CilType::I4],
                    out_parameters: vec![false, true],
                    return_type: Some(CilType::Bool),
                })),
            ),
        ],
    );
    let consumer = find_consumer(&method, 2).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Call);
    assert_eq!(consumer.stack_index, 1);
}

/// `ldloca.0; ldloc.0; stfld` reads through the address (via an
/// intervening `ldloc` that never touches it) before an unrelated `stfld`
/// at the same depth — covers ordinary traffic shallower than the tracked
/// entry being popped and pushed without ending the walk.
#[test]
fn shallower_traffic_is_popped_without_ending_the_walk() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::Ldnull, Operand::None),
            instr(2, Opcode::Pop, Operand::None),
            instr(
                3,
                Opcode::Stfld,
                Operand::Member(MemberRef::Field(FieldRef {
                    declaring_type: TypeRef(1),
                    field_type: CilType::I4,
                })),
            ),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Stfld);
    assert_eq!(consumer.stack_index, 1);
}

/// `ldloca.0; br.s L; L: ret` — the walk ends at an unconditional branch
/// (a control transfer) with no consumer found on this path.
#[test]
fn control_transfer_ends_the_walk_without_a_consumer() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::BrS, Operand::BranchTarget(0)),
            instr(2, Opcode::Ret, Operand::None),
        ],
    );
    assert!(find_consumer(&method, 1).unwrap().is_none());
}

/// An instruction family the simulator does not model (`localloc`) is
/// reported as an error rather than silently ignored.
#[test]
fn unmodeled_family_is_an_error() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::Localloc, Operand::None),
        ],
    );
    assert!(find_consumer(&method, 1).is_err());
}

/// `ldloca.0; dup; pop; stloc.0` — `dup` duplicates the tracked address
/// itself; the first `pop` discards the duplicate (shallower traffic),
/// and `stloc.0` then consumes the original at depth 0.
#[test]
fn dup_of_the_tracked_address_is_ordinary_traffic_until_consumed() {
    let method = body(
        vec![Local { ty: CilType::I4 }],
        vec![
            instr(0, Opcode::LdlocaS, Operand::LocalIndex(0)),
            instr(1, Opcode::Dup, Operand::None),
            instr(2, Opcode::Pop, Operand::None),
            instr(3, Opcode::Stloc0, Operand::None),
        ],
    );
    let consumer = find_consumer(&method, 1).unwrap().unwrap();
    assert_eq!(consumer.instruction.opcode, Opcode::Stloc0);
    assert_eq!(consumer.stack_index, 0);
}
