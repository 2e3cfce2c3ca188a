//! Control-flow graph construction over a [`MethodBody`] (component C).

use std::collections::HashMap;

use ilopt_arena::{Arena, ArenaIndex};
use ilopt_cil::{FlowControl, InstructionFamily, MethodBody, Operand};

use crate::error::{Error, ErrorKind};

/// An index into a [`Cfg`]'s arena of [`BasicBlock`]s.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockIdx(u32);

impl ArenaIndex for BlockIdx {
    fn into_usize(self) -> usize {
        self.0 as usize
    }
    fn from_usize(value: usize) -> Self {
        Self(value as u32)
    }
}

/// A maximal straight-line run of instructions with a single entry.
///
/// Instructions are represented as a contiguous `[start, end)` range of
/// positions into the owning [`MethodBody::instructions`] rather than an
/// owned copy, since the data-model invariant guarantees a block's
/// instructions remain contiguous and in original order for as long as the
/// CFG lives.
#[derive(Debug, Clone, Default)]
pub struct BasicBlock {
    pub start: usize,
    pub end: usize,
    pub children: Vec<BlockIdx>,
    pub parents: Vec<BlockIdx>,
}

impl BasicBlock {
    /// Returns the instruction-index range this block owns.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Returns the index of this block's last (tail) instruction.
    pub fn tail_index(&self) -> usize {
        self.end - 1
    }
}

/// A rooted, possibly cyclic graph of [`BasicBlock`]s built from one
/// [`MethodBody`].
#[derive(Debug)]
pub struct Cfg {
    pub blocks: Arena<BlockIdx, BasicBlock>,
    pub root: BlockIdx,
}

impl Cfg {
    /// Returns the number of blocks in this graph.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Visits every block reachable from the root in breadth-first order.
    ///
    /// Implemented as an explicit worklist with a visited set; recursion
    /// over method-scale graphs is forbidden (see the workspace design
    /// notes on cyclic block graphs).
    pub fn breadth_first(&self) -> Vec<BlockIdx> {
        let mut visited = vec![false; self.blocks.len()];
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(self.root);
        visited[self.root.into_usize()] = true;
        while let Some(block) = queue.pop_front() {
            order.push(block);
            for &child in &self.blocks[block].children {
                let idx = child.into_usize();
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back(child);
                }
            }
        }
        order
    }

    /// Visits every block reachable from the root in depth-first order.
    pub fn depth_first(&self) -> Vec<BlockIdx> {
        let mut visited = vec![false; self.blocks.len()];
        let mut order = Vec::with_capacity(self.blocks.len());
        let mut stack = vec![self.root];
        visited[self.root.into_usize()] = true;
        while let Some(block) = stack.pop() {
            order.push(block);
            for &child in self.blocks[block].children.iter().rev() {
                let idx = child.into_usize();
                if !visited[idx] {
                    visited[idx] = true;
                    stack.push(child);
                }
            }
        }
        order
    }
}

/// Builds a [`Cfg`] for `method`.
///
/// # Errors
///
/// Returns [`ErrorKind::UnsupportedFlow`] if the method contains a `Phi`
/// instruction, or any `Meta` (instruction-prefix) opcode other than
/// `volatile.` — preserved exactly as the analyzer historically shipped it,
/// even though every prefix opcode is metadata-only.
pub fn build(method: &MethodBody) -> Result<Cfg, Error> {
    let mut blocks: Arena<BlockIdx, BasicBlock> = Arena::new();
    let mut owner: HashMap<usize, BlockIdx> = HashMap::new();
    let mut pending: Vec<BlockIdx> = Vec::new();

    let root = blocks.alloc(BasicBlock {
        start: 0,
        end: 1,
        children: Vec::new(),
        parents: Vec::new(),
    });
    owner.insert(0, root);
    pending.push(root);

    while let Some(block_idx) = pending.pop() {
        loop {
            let tail_index = blocks[block_idx].tail_index();
            let instr = &method.instructions[tail_index];
            let fam = instr.family();

            match FlowControl::of(fam) {
                Linear::Grow => match method.next_index(tail_index) {
                    None => break,
                    Some(next_idx) => {
                        if let Some(&existing) = owner.get(&next_idx) {
                            attach_successor(&mut blocks, block_idx, existing);
                            break;
                        }
                        blocks[block_idx].end = next_idx + 1;
                        owner.insert(next_idx, block_idx);
                    }
                },
                Linear::Branch => {
                    let target = branch_target(method, tail_index)?;
                    resolve_and_attach(&mut blocks, &mut owner, &mut pending, block_idx, target);
                    break;
                }
                Linear::CondBranch => {
                    let mut current = block_idx;
                    for target in cond_branch_targets(method, tail_index)? {
                        current = resolve_and_attach(
                            &mut blocks, &mut owner, &mut pending, current, target,
                        );
                    }
                    if let Some(next_idx) = method.next_index(tail_index) {
                        resolve_and_attach(
                            &mut blocks, &mut owner, &mut pending, current, next_idx,
                        );
                    }
                    break;
                }
                Linear::Terminal => break,
                Linear::Unsupported => {
                    return Err(ErrorKind::UnsupportedFlow {
                        offset: instr.offset,
                    }
                    .into())
                }
            }
        }
    }

    Ok(Cfg { blocks, root })
}

/// The CFG builder's own reduction of [`FlowControl`] down to the four
/// cases its block-growing loop distinguishes (component C, step 3).
enum Linear {
    Grow,
    Branch,
    CondBranch,
    Terminal,
    Unsupported,
}

trait FlowControlExt {
    fn of(family: InstructionFamily) -> Linear;
}

impl FlowControlExt for FlowControl {
    fn of(fam: InstructionFamily) -> Linear {
        match ilopt_cil::flow_control(fam) {
            FlowControl::Next | FlowControl::Break | FlowControl::Call => Linear::Grow,
            FlowControl::Meta => {
                if fam == InstructionFamily::Volatile {
                    Linear::Grow
                } else {
                    Linear::Unsupported
                }
            }
            FlowControl::Branch => Linear::Branch,
            FlowControl::CondBranch => Linear::CondBranch,
            FlowControl::Return | FlowControl::Throw => Linear::Terminal,
            FlowControl::Phi => Linear::Unsupported,
        }
    }
}

fn branch_target(method: &MethodBody, index: usize) -> Result<usize, Error> {
    let instr = &method.instructions[index];
    match instr.operand {
        Operand::BranchTarget(offset) => resolve_offset(method, index, offset, instr.offset),
        _ => Err(ErrorKind::UnsupportedFlow {
            offset: instr.offset,
        }
        .into()),
    }
}

fn cond_branch_targets(method: &MethodBody, index: usize) -> Result<Vec<usize>, Error> {
    let instr = &method.instructions[index];
    match &instr.operand {
        Operand::BranchTarget(offset) => {
            Ok(vec![resolve_offset(method, index, *offset, instr.offset)?])
        }
        Operand::SwitchTargets(offsets) => offsets
            .iter()
            .map(|&offset| resolve_offset(method, index, offset, instr.offset))
            .collect(),
        _ => Err(ErrorKind::UnsupportedFlow {
            offset: instr.offset,
        }
        .into()),
    }
}

/// Resolves a branch operand's relative offset (counted in instructions,
/// from the branch's successor) to an absolute instruction index.
fn resolve_offset(
    method: &MethodBody,
    index: usize,
    offset: i32,
    instr_offset: u32,
) -> Result<usize, Error> {
    let base = index as i64 + 1;
    let target = base + i64::from(offset);
    if target < 0 || target as usize >= method.instructions.len() {
        return Err(ErrorKind::UnsupportedFlow {
            offset: instr_offset,
        }
        .into());
    }
    Ok(target as usize)
}

/// Resolves `target` to the block that should become a successor, creating
/// or splitting blocks as needed (component C, step 4 — "ProcessBranchTarget").
fn process_branch_target(
    blocks: &mut Arena<BlockIdx, BasicBlock>,
    owner: &mut HashMap<usize, BlockIdx>,
    pending: &mut Vec<BlockIdx>,
    target: usize,
) -> BlockIdx {
    if let Some(&existing) = owner.get(&target) {
        if blocks[existing].start == target {
            return existing;
        }
        return split_block(blocks, owner, existing, target);
    }

    let fresh = blocks.alloc(BasicBlock {
        start: target,
        end: target + 1,
        children: Vec::new(),
        parents: Vec::new(),
    });
    owner.insert(target, fresh);
    pending.push(fresh);
    fresh
}

/// Splits block `m` at instruction `target`, moving `target` and every
/// later instruction of `m` into a freshly allocated block `n`.
fn split_block(
    blocks: &mut Arena<BlockIdx, BasicBlock>,
    owner: &mut HashMap<usize, BlockIdx>,
    m: BlockIdx,
    target: usize,
) -> BlockIdx {
    let old_end = blocks[m].end;
    let old_children = std::mem::take(&mut blocks[m].children);

    let n = blocks.alloc(BasicBlock {
        start: target,
        end: old_end,
        children: old_children.clone(),
        parents: vec![m],
    });

    blocks[m].end = target;
    blocks[m].children = vec![n];

    for idx in target..old_end {
        owner.insert(idx, n);
    }

    for child in old_children {
        let parents = &mut blocks[child].parents;
        for parent in parents.iter_mut() {
            if *parent == m {
                *parent = n;
            }
        }
    }

    n
}

/// Resolves `target` against the block currently understood to hold the
/// branching instruction (`current`), attaches the resulting edge, and
/// returns the block that should be treated as holding the branching
/// instruction for any *further* targets processed in the same step (a
/// `switch`'s later cases, or a conditional branch's fall-through).
///
/// `current` changes from its input value only when `target` lands in the
/// middle of `current` itself: splitting `current` at `target` moves its own
/// tail — including the branch instruction being resolved right now — into
/// the newly split-off block, which must then also gain the self-loop edge
/// the original branch instruction implied.
fn resolve_and_attach(
    blocks: &mut Arena<BlockIdx, BasicBlock>,
    owner: &mut HashMap<usize, BlockIdx>,
    pending: &mut Vec<BlockIdx>,
    current: BlockIdx,
    target: usize,
) -> BlockIdx {
    let splits_current = matches!(
        owner.get(&target),
        Some(&existing) if existing == current && blocks[current].start != target
    );
    let succ = process_branch_target(blocks, owner, pending, target);
    attach_successor(blocks, current, succ);
    if splits_current {
        attach_successor(blocks, succ, succ);
        succ
    } else {
        current
    }
}

fn attach_successor(blocks: &mut Arena<BlockIdx, BasicBlock>, from: BlockIdx, to: BlockIdx) {
    if !blocks[from].children.contains(&to) {
        blocks[from].children.push(to);
    }
    if !blocks[to].parents.contains(&from) {
        blocks[to].parents.push(from);
    }
}
