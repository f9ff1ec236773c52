//! Instructions and terminators.

use std::fmt;

use panda_types::Type;
use smallvec::SmallVec;

use crate::{BlockId, Constant, LocalId, Value};

/// Integer and float arithmetic / bitwise operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    And,
    Or,
    Xor,
    Shl,
    AShr,
    LShr,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::UDiv => "udiv",
            BinOp::SRem => "srem",
            BinOp::URem => "urem",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::AShr => "ashr",
            BinOp::LShr => "lshr",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
            BinOp::FRem => "frem",
        }
    }
}

/// Integer comparison predicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IPred {
    Eq,
    Ne,
    Sgt,
    Sge,
    Slt,
    Sle,
    Ugt,
    Uge,
    Ult,
    Ule,
}

impl IPred {
    pub fn as_str(self) -> &'static str {
        match self {
            IPred::Eq => "eq",
            IPred::Ne => "ne",
            IPred::Sgt => "sgt",
            IPred::Sge => "sge",
            IPred::Slt => "slt",
            IPred::Sle => "sle",
            IPred::Ugt => "ugt",
            IPred::Uge => "uge",
            IPred::Ult => "ult",
            IPred::Ule => "ule",
        }
    }
}

/// Ordered float comparison predicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FPred {
    Oeq,
    One,
    Ogt,
    Oge,
    Olt,
    Ole,
}

impl FPred {
    pub fn as_str(self) -> &'static str {
        match self {
            FPred::Oeq => "oeq",
            FPred::One => "one",
            FPred::Ogt => "ogt",
            FPred::Oge => "oge",
            FPred::Olt => "olt",
            FPred::Ole => "ole",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CastOp {
    Bitcast,
    PtrToInt,
    IntToPtr,
    Trunc,
    ZExt,
    SExt,
    FPTrunc,
    FPExt,
    SIToFP,
    UIToFP,
    FPToSI,
    FPToUI,
}

impl CastOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CastOp::Bitcast => "bitcast",
            CastOp::PtrToInt => "ptrtoint",
            CastOp::IntToPtr => "inttoptr",
            CastOp::Trunc => "trunc",
            CastOp::ZExt => "zext",
            CastOp::SExt => "sext",
            CastOp::FPTrunc => "fptrunc",
            CastOp::FPExt => "fpext",
            CastOp::SIToFP => "sitofp",
            CastOp::UIToFP => "uitofp",
            CastOp::FPToSI => "fptosi",
            CastOp::FPToUI => "fptoui",
        }
    }
}

// ── Instructions ────────────────────────────────────────────────────

/// A non-terminating instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// `%dst = alloca ty`
    Alloca { dst: LocalId, ty: Type },
    /// `%dst = load ty, ty* ptr`
    Load { dst: LocalId, ty: Type, ptr: Value },
    /// `store value, ptr`
    Store { value: Value, ptr: Value },
    /// `%dst = getelementptr inbounds T, T* ptr, indices...`
    GetElementPtr {
        dst: LocalId,
        ptr: Value,
        indices: SmallVec<[Value; 2]>,
    },
    /// `%dst = <op> from value to ty`
    Cast {
        dst: LocalId,
        op: CastOp,
        value: Value,
        to: Type,
    },
    /// `[%dst =] call ret callee(args...)`; `dst` is `None` for `void` calls.
    Call {
        dst: Option<LocalId>,
        callee: Value,
        args: SmallVec<[Value; 4]>,
    },
    ICmp {
        dst: LocalId,
        pred: IPred,
        lhs: Value,
        rhs: Value,
    },
    FCmp {
        dst: LocalId,
        pred: FPred,
        lhs: Value,
        rhs: Value,
    },
    Binary {
        dst: LocalId,
        op: BinOp,
        lhs: Value,
        rhs: Value,
    },
    FNeg { dst: LocalId, value: Value },
    /// `%dst = phi ty [ value, %block ], ...`
    Phi {
        dst: LocalId,
        ty: Type,
        incoming: Vec<(Value, BlockId)>,
    },
    /// `%dst = select i1 cond, ty a, ty b`
    Select {
        dst: LocalId,
        cond: Value,
        then_value: Value,
        else_value: Value,
    },
}

fn write_dst(f: &mut fmt::Formatter<'_>, dst: LocalId) -> fmt::Result {
    write!(f, "%v.{} = ", dst.raw())
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Alloca { dst, ty } => {
                write_dst(f, *dst)?;
                write!(f, "alloca {ty}")
            }
            Instr::Load { dst, ty, ptr } => {
                write_dst(f, *dst)?;
                write!(f, "load {ty}, {}", ptr.typed())
            }
            Instr::Store { value, ptr } => write!(f, "store {}, {}", value.typed(), ptr.typed()),
            Instr::GetElementPtr { dst, ptr, indices } => {
                write_dst(f, *dst)?;
                let ptr_ty = ptr.ty();
                let elem = ptr_ty.pointee().cloned().unwrap_or(Type::Void);
                write!(f, "getelementptr inbounds {elem}, {}", ptr.typed())?;
                for index in indices {
                    write!(f, ", {}", index.typed())?;
                }
                Ok(())
            }
            Instr::Cast { dst, op, value, to } => {
                write_dst(f, *dst)?;
                write!(f, "{} {} to {to}", op.as_str(), value.typed())
            }
            Instr::Call { dst, callee, args } => {
                if let Some(dst) = dst {
                    write_dst(f, *dst)?;
                }
                let callee_ty = callee.ty();
                let ret = match callee_ty.as_func() {
                    // Variadic callees are called through their full signature.
                    Some(sig) if sig.variadic => Type::Function(sig.clone()).to_string(),
                    Some(sig) => sig.ret.to_string(),
                    None => "void".to_owned(),
                };
                write!(f, "call {ret} {callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&arg.typed())?;
                }
                f.write_str(")")
            }
            Instr::ICmp {
                dst,
                pred,
                lhs,
                rhs,
            } => {
                write_dst(f, *dst)?;
                write!(f, "icmp {} {}, {rhs}", pred.as_str(), lhs.typed())
            }
            Instr::FCmp {
                dst,
                pred,
                lhs,
                rhs,
            } => {
                write_dst(f, *dst)?;
                write!(f, "fcmp {} {}, {rhs}", pred.as_str(), lhs.typed())
            }
            Instr::Binary { dst, op, lhs, rhs } => {
                write_dst(f, *dst)?;
                write!(f, "{} {}, {rhs}", op.as_str(), lhs.typed())
            }
            Instr::FNeg { dst, value } => {
                write_dst(f, *dst)?;
                write!(f, "fneg {}", value.typed())
            }
            Instr::Phi { dst, ty, incoming } => {
                write_dst(f, *dst)?;
                write!(f, "phi {ty} ")?;
                for (i, (value, block)) in incoming.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "[ {value}, %bb.{} ]", block.raw())?;
                }
                Ok(())
            }
            Instr::Select {
                dst,
                cond,
                then_value,
                else_value,
            } => {
                write_dst(f, *dst)?;
                write!(
                    f,
                    "select {}, {}, {}",
                    cond.typed(),
                    then_value.typed(),
                    else_value.typed()
                )
            }
        }
    }
}

// ── Terminators ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Terminator {
    /// `ret void` when `None`.
    Ret(Option<Value>),
    Br(BlockId),
    CondBr {
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    },
    /// `switch` on an integer; case values are integer constants.
    Switch {
        value: Value,
        default: BlockId,
        cases: Vec<(Constant, BlockId)>,
    },
    Unreachable,
}

impl Terminator {
    /// Blocks this terminator may transfer control to.
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Ret(_) | Terminator::Unreachable => Vec::new(),
            Terminator::Br(target) => vec![*target],
            Terminator::CondBr {
                then_block,
                else_block,
                ..
            } => vec![*then_block, *else_block],
            Terminator::Switch { default, cases, .. } => std::iter::once(*default)
                .chain(cases.iter().map(|(_, b)| *b))
                .collect(),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Ret(None) => f.write_str("ret void"),
            Terminator::Ret(Some(value)) => write!(f, "ret {}", value.typed()),
            Terminator::Br(target) => write!(f, "br label %bb.{}", target.raw()),
            Terminator::CondBr {
                cond,
                then_block,
                else_block,
            } => write!(
                f,
                "br {}, label %bb.{}, label %bb.{}",
                cond.typed(),
                then_block.raw(),
                else_block.raw()
            ),
            Terminator::Switch {
                value,
                default,
                cases,
            } => {
                write!(f, "switch {}, label %bb.{} [", value.typed(), default.raw())?;
                for (case, target) in cases {
                    write!(f, "\n    {} {case}, label %bb.{}", case.ty(), target.raw())?;
                }
                f.write_str("\n  ]")
            }
            Terminator::Unreachable => f.write_str("unreachable"),
        }
    }
}
