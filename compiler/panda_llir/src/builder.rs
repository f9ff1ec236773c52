//! Instruction builder for one function body.

use panda_types::{Type, I1, I32};
use smallvec::SmallVec;

use crate::{
    BinOp, Block, BlockId, CastOp, Constant, FPred, IPred, Instr, LocalId, Terminator, Value,
};

/// Builds the blocks of one function.
///
/// Follows the "position at a block, emit instructions, terminate" pattern.
/// Once a block has a terminator, further terminators for it are ignored;
/// callers check [`is_terminated`](Self::is_terminated) to skip dead code.
pub struct FunctionBuilder {
    blocks: Vec<Block>,
    current: BlockId,
    local_count: usize,
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionBuilder {
    /// Create a builder with the entry block allocated and selected.
    pub fn new() -> Self {
        FunctionBuilder {
            blocks: vec![Block::new(BlockId::new(0))],
            current: BlockId::new(0),
            local_count: 0,
        }
    }

    // ── Blocks ──────────────────────────────────────────────────────

    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId::from_len(self.blocks.len());
        self.blocks.push(Block::new(id));
        id
    }

    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "BlockId {} out of bounds (have {} blocks)",
            block.raw(),
            self.blocks.len(),
        );
        self.current = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current
    }

    #[inline]
    pub fn entry_block(&self) -> BlockId {
        BlockId::new(0)
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current.index()].terminator.is_some()
    }

    // ── Instructions ────────────────────────────────────────────────

    fn fresh(&mut self) -> LocalId {
        let id = LocalId::from_len(self.local_count);
        self.local_count += 1;
        id
    }

    fn push(&mut self, instr: Instr) {
        self.blocks[self.current.index()].instrs.push(instr);
    }

    /// Stack slot for a `ty`; the result has type `ty*`.
    pub fn alloca(&mut self, ty: Type) -> Value {
        let dst = self.fresh();
        let result = Type::pointer_to(ty.clone());
        self.push(Instr::Alloca { dst, ty });
        Value::Local { id: dst, ty: result }
    }

    /// Load through `ptr`; the result has `ptr`'s element type.
    pub fn load(&mut self, ptr: Value) -> Value {
        let dst = self.fresh();
        let ty = ptr.ty().pointee().cloned().unwrap_or(Type::Void);
        self.push(Instr::Load {
            dst,
            ty: ty.clone(),
            ptr,
        });
        Value::Local { id: dst, ty }
    }

    pub fn store(&mut self, value: Value, ptr: Value) {
        self.push(Instr::Store { value, ptr });
    }

    /// `getelementptr` yielding a pointer to `result_elem`.
    pub fn gep(&mut self, ptr: Value, indices: &[Value], result_elem: Type) -> Value {
        let dst = self.fresh();
        self.push(Instr::GetElementPtr {
            dst,
            ptr,
            indices: indices.iter().cloned().collect(),
        });
        Value::Local {
            id: dst,
            ty: Type::pointer_to(result_elem),
        }
    }

    /// Address of field `index` of the struct `ptr` points to.
    pub fn struct_gep(&mut self, ptr: Value, index: u32, field_ty: Type) -> Value {
        let indices = [
            Value::from(Constant::int(I32, 0)),
            Value::from(Constant::int(I32, i64::from(index))),
        ];
        self.gep(ptr, &indices, field_ty)
    }

    pub fn cast(&mut self, op: CastOp, value: Value, to: Type) -> Value {
        let dst = self.fresh();
        self.push(Instr::Cast {
            dst,
            op,
            value,
            to: to.clone(),
        });
        Value::Local { id: dst, ty: to }
    }

    /// `bitcast`, or `value` itself when it already has type `to`.
    pub fn bitcast(&mut self, value: Value, to: Type) -> Value {
        if value.ty() == to {
            return value;
        }
        self.cast(CastOp::Bitcast, value, to)
    }

    /// Call `callee` (a function or pointer to function). Returns `None` for
    /// a `void` callee.
    pub fn call(&mut self, callee: Value, args: impl IntoIterator<Item = Value>) -> Option<Value> {
        let ret = callee
            .ty()
            .as_func()
            .map_or(Type::Void, |sig| (*sig.ret).clone());
        let args: SmallVec<[Value; 4]> = args.into_iter().collect();
        if ret.is_void() {
            self.push(Instr::Call {
                dst: None,
                callee,
                args,
            });
            return None;
        }
        let dst = self.fresh();
        self.push(Instr::Call {
            dst: Some(dst),
            callee,
            args,
        });
        Some(Value::Local { id: dst, ty: ret })
    }

    pub fn icmp(&mut self, pred: IPred, lhs: Value, rhs: Value) -> Value {
        let dst = self.fresh();
        self.push(Instr::ICmp {
            dst,
            pred,
            lhs,
            rhs,
        });
        Value::Local { id: dst, ty: I1 }
    }

    pub fn fcmp(&mut self, pred: FPred, lhs: Value, rhs: Value) -> Value {
        let dst = self.fresh();
        self.push(Instr::FCmp {
            dst,
            pred,
            lhs,
            rhs,
        });
        Value::Local { id: dst, ty: I1 }
    }

    /// Binary operation; the result has `lhs`'s type.
    pub fn binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let dst = self.fresh();
        let ty = lhs.ty();
        self.push(Instr::Binary { dst, op, lhs, rhs });
        Value::Local { id: dst, ty }
    }

    pub fn fneg(&mut self, value: Value) -> Value {
        let dst = self.fresh();
        let ty = value.ty();
        self.push(Instr::FNeg { dst, value });
        Value::Local { id: dst, ty }
    }

    pub fn phi(&mut self, ty: Type, incoming: Vec<(Value, BlockId)>) -> Value {
        let dst = self.fresh();
        self.push(Instr::Phi {
            dst,
            ty: ty.clone(),
            incoming,
        });
        Value::Local { id: dst, ty }
    }

    /// Pick between two values of one type without branching. Both are
    /// already evaluated.
    pub fn select(&mut self, cond: Value, then_value: Value, else_value: Value) -> Value {
        let dst = self.fresh();
        let ty = then_value.ty();
        self.push(Instr::Select {
            dst,
            cond,
            then_value,
            else_value,
        });
        Value::Local { id: dst, ty }
    }

    // ── Terminators ─────────────────────────────────────────────────

    fn terminate(&mut self, term: Terminator) {
        let block = &mut self.blocks[self.current.index()];
        if block.terminator.is_none() {
            block.terminator = Some(term);
        }
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.terminate(Terminator::Ret(value));
    }

    pub fn br(&mut self, target: BlockId) {
        self.terminate(Terminator::Br(target));
    }

    pub fn cond_br(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn switch(&mut self, value: Value, default: BlockId, cases: Vec<(Constant, BlockId)>) {
        self.terminate(Terminator::Switch {
            value,
            default,
            cases,
        });
    }

    pub fn unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    /// Finish the body. Blocks left without a terminator get `unreachable`.
    pub fn finish(mut self) -> Vec<Block> {
        for block in &mut self.blocks {
            if block.terminator.is_none() {
                block.terminator = Some(Terminator::Unreachable);
            }
        }
        self.blocks
    }
}

#[cfg(test)]
mod tests;
