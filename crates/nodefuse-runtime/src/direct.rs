//! Call simplification
//!
//! The final fusion tier removes the separate `Function`/statement-list
//! abstraction: a call target is any evaluable node, and the target's own
//! `eval` result is the call result. An `IfElseNode` — an expression that
//! evaluates exactly one branch and yields its value — can then serve as an
//! entire function body, with no `ReturnNode` and no statement loop.

use std::rc::{Rc, Weak};

use crate::context::ExecutionContext;
use crate::node::Node;

/// Call with a generalized target: owns its argument expression, references
/// (but does not own) any evaluable node as the callee.
pub struct CallAnyNode {
    target: Weak<dyn Node>,
    arg: Box<dyn Node>,
}

impl CallAnyNode {
    pub fn new(target: &Rc<dyn Node>, arg: Box<dyn Node>) -> Self {
        Self {
            target: Rc::downgrade(target),
            arg,
        }
    }

    /// Call site inside a body under construction, where only the `Weak`
    /// self-reference exists yet.
    pub fn from_weak(target: Weak<dyn Node>, arg: Box<dyn Node>) -> Self {
        Self { target, arg }
    }
}

impl Node for CallAnyNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        // Evaluate-then-push, same as the statement-list call protocol.
        let argument = self.arg.eval(ctx);
        ctx.push(argument);

        let target = self
            .target
            .upgrade()
            .expect("call target dropped before evaluation");
        let result = target.eval(ctx);

        // An expression body never sets the control register, but a
        // statement-style target may; consume it so the caller's enclosing
        // body is unaffected.
        let _ = ctx.take_return();
        ctx.pop();
        result
    }
}

/// Two-armed conditional expression: evaluates exactly one branch and yields
/// its result.
pub struct IfElseNode {
    condition: Box<dyn Node>,
    if_body: Box<dyn Node>,
    else_body: Box<dyn Node>,
}

impl IfElseNode {
    pub fn new(
        condition: Box<dyn Node>,
        if_body: Box<dyn Node>,
        else_body: Box<dyn Node>,
    ) -> Self {
        Self {
            condition,
            if_body,
            else_body,
        }
    }
}

impl Node for IfElseNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        if self.condition.eval(ctx) != 0 {
            self.if_body.eval(ctx)
        } else {
            self.else_body.eval(ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ConstNode;

    fn leaf(value: u32) -> Box<dyn Node> {
        Box::new(ConstNode::new(value))
    }

    #[test]
    fn if_else_yields_the_taken_branch() {
        let mut ctx = ExecutionContext::new();
        assert_eq!(IfElseNode::new(leaf(1), leaf(10), leaf(20)).eval(&mut ctx), 10);
        assert_eq!(IfElseNode::new(leaf(0), leaf(10), leaf(20)).eval(&mut ctx), 20);
    }

    #[test]
    fn call_any_returns_the_target_result_and_restores_the_stack() {
        let mut ctx = ExecutionContext::new();
        let target: Rc<dyn Node> = Rc::new(ConstNode::new(7));
        let call = CallAnyNode::new(&target, leaf(99));
        assert_eq!(call.eval(&mut ctx), 7);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn call_any_does_not_own_its_target() {
        let target: Rc<dyn Node> = Rc::new(ConstNode::new(7));
        let call = CallAnyNode::new(&target, leaf(0));
        assert_eq!(Rc::strong_count(&target), 1);
        drop(call);
        let mut ctx = ExecutionContext::new();
        assert_eq!(target.eval(&mut ctx), 7);
    }

    #[test]
    fn call_any_consumes_a_pending_return_from_statement_style_targets() {
        use crate::node::ReturnNode;

        // A ReturnNode target leaves the control register set; the call must
        // consume it so the caller's enclosing body is unaffected.
        let mut ctx = ExecutionContext::new();
        let target: Rc<dyn Node> = Rc::new(ReturnNode::new(leaf(11)));
        let call = CallAnyNode::new(&target, leaf(0));
        call.eval(&mut ctx);
        assert!(!ctx.is_returning());
        assert_eq!(ctx.depth(), 0);
    }
}
