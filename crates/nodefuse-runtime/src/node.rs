//! Polymorphic evaluable nodes (baseline-generic inventory)
//!
//! Every operation is its own node type behind the `Node` trait; all
//! dispatch in this inventory goes through the trait object. Composite
//! nodes exclusively own their children (`Box<dyn Node>`), so dropping a
//! node drops its subtree. The one non-owning edge in the graph is the
//! `CallNode` → `Function` back-reference (`Weak`), which is what makes
//! self-recursive bodies expressible without an ownership cycle.

use std::rc::{Rc, Weak};

use crate::context::ExecutionContext;

/// An evaluable unit of the program graph.
///
/// Evaluation is total over well-formed graphs: it never fails, and its side
/// effects are confined to the context (stack frames, control register) and
/// to recursively evaluating owned children.
pub trait Node {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32;
}

/// Fixed literal value.
#[derive(Debug, Clone, Copy)]
pub struct ConstNode {
    value: u32,
}

impl ConstNode {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Non-virtual read, used directly by fused parents.
    #[inline(always)]
    pub fn get(&self) -> u32 {
        self.value
    }
}

impl Node for ConstNode {
    fn eval(&self, _ctx: &mut ExecutionContext) -> u32 {
        self.get()
    }
}

/// The current call's argument (top of the context stack).
#[derive(Debug, Clone, Copy)]
pub struct ArgNode;

impl ArgNode {
    /// Non-virtual read, used directly by fused parents.
    #[inline(always)]
    pub fn get(&self, ctx: &ExecutionContext) -> u32 {
        ctx.argument()
    }
}

impl Node for ArgNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        self.get(ctx)
    }
}

/// Wrapping addition of two subtrees.
pub struct AddNode {
    lhs: Box<dyn Node>,
    rhs: Box<dyn Node>,
}

impl AddNode {
    pub fn new(lhs: Box<dyn Node>, rhs: Box<dyn Node>) -> Self {
        Self { lhs, rhs }
    }
}

impl Node for AddNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        // Left operand completes (including any nested calls) before the
        // right one starts; both may mutate the stack.
        let left = self.lhs.eval(ctx);
        let right = self.rhs.eval(ctx);
        left.wrapping_add(right)
    }
}

/// Wrapping subtraction of two subtrees. Underflow wraps; this is the
/// defined numeric semantic, not an error.
pub struct SubNode {
    lhs: Box<dyn Node>,
    rhs: Box<dyn Node>,
}

impl SubNode {
    pub fn new(lhs: Box<dyn Node>, rhs: Box<dyn Node>) -> Self {
        Self { lhs, rhs }
    }
}

impl Node for SubNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        let left = self.lhs.eval(ctx);
        let right = self.rhs.eval(ctx);
        left.wrapping_sub(right)
    }
}

/// Unsigned comparison: 1 if `lhs < rhs`, else 0.
pub struct LessNode {
    lhs: Box<dyn Node>,
    rhs: Box<dyn Node>,
}

impl LessNode {
    pub fn new(lhs: Box<dyn Node>, rhs: Box<dyn Node>) -> Self {
        Self { lhs, rhs }
    }
}

impl Node for LessNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        let left = self.lhs.eval(ctx);
        let right = self.rhs.eval(ctx);
        (left < right) as u32
    }
}

/// Conditional statement: evaluates the body only when the condition is
/// non-zero. Always yields 0, whichever branch is taken.
pub struct IfNode {
    condition: Box<dyn Node>,
    body: Box<dyn Node>,
}

impl IfNode {
    pub fn new(condition: Box<dyn Node>, body: Box<dyn Node>) -> Self {
        Self { condition, body }
    }
}

impl Node for IfNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        if self.condition.eval(ctx) != 0 {
            self.body.eval(ctx);
        }
        0
    }
}

/// Return statement: records the value in the control register and signals
/// the enclosing statement loop to stop. Yields 0 itself; the value travels
/// through the context.
pub struct ReturnNode {
    value: Box<dyn Node>,
}

impl ReturnNode {
    pub fn new(value: Box<dyn Node>) -> Self {
        Self { value }
    }
}

impl Node for ReturnNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        let value = self.value.eval(ctx);
        ctx.set_return(value);
        0
    }
}

/// A callable body: an owned, ordered sequence of statement nodes executed
/// top-to-bottom.
///
/// Functions are shared non-owningly — a `Function` may be referenced by any
/// number of `CallNode`s, including recursively from its own body — so they
/// are allocated as `Rc<Function>` (see `Rc::new_cyclic` in the program
/// builders) while call sites hold `Weak` references.
pub struct Function {
    body: Vec<Box<dyn Node>>,
}

impl Function {
    pub fn new(body: Vec<Box<dyn Node>>) -> Self {
        Self { body }
    }

    /// Run the statement sequence, stopping at the first statement that
    /// leaves a return pending. The pending return stays in the context for
    /// the calling `CallNode` to consume.
    pub fn run(&self, ctx: &mut ExecutionContext) {
        for statement in &self.body {
            statement.eval(ctx);
            if ctx.is_returning() {
                break;
            }
        }
    }
}

/// Function call: owns its argument expression, references (but does not
/// own) its target function.
pub struct CallNode {
    function: Weak<Function>,
    arg: Box<dyn Node>,
}

impl CallNode {
    pub fn new(function: &Rc<Function>, arg: Box<dyn Node>) -> Self {
        Self {
            function: Rc::downgrade(function),
            arg,
        }
    }

    /// Call site inside a function body under construction, where only the
    /// `Weak` self-reference exists yet.
    pub fn from_weak(function: Weak<Function>, arg: Box<dyn Node>) -> Self {
        Self { function, arg }
    }
}

impl Node for CallNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        // Evaluate-then-push: the argument expression may itself contain
        // calls that use the stack, so it must finish before the new frame
        // slot is written.
        let argument = self.arg.eval(ctx);
        ctx.push(argument);

        let function = self
            .function
            .upgrade()
            .expect("call target dropped before evaluation");
        function.run(ctx);

        ctx.pop();
        // Precondition: every reachable path through a function body ends in
        // a Return. A body that falls off the end yields 0.
        ctx.take_return().unwrap_or(0)
    }
}
