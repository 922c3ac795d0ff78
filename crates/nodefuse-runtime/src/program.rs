//! Program construction and the evaluation entry point
//!
//! The fixed program is the recursive Fibonacci function
//!
//! ```text
//! fib(n):
//!     if n < 2: return n
//!     return fib(n - 1) + fib(n - 2)
//! ```
//!
//! built directly as a node graph, once per strategy. The builders differ
//! only in which node inventory they assemble the same logical program from.
//! Self-recursive call sites are wired with `Rc::new_cyclic`: the body's
//! calls hold non-owning `Weak` references to the function under
//! construction, while the returned `Rc` is the single owning handle.

use std::rc::{Rc, Weak};

use crate::context::ExecutionContext;
use crate::direct::{CallAnyNode, IfElseNode};
use crate::fused::{LessArgConstNode, LessConstNode, SubArgConstNode, SubConstNode};
use crate::node::{
    AddNode, ArgNode, CallNode, ConstNode, Function, IfNode, LessNode, Node, ReturnNode, SubNode,
};
use crate::strategy::Strategy;

/// A fully constructed program, ready to be called with an argument.
///
/// The owning handle must stay alive across evaluation; call sites inside
/// the graph only hold weak back-references to it.
pub enum Callable {
    /// Statement-list function (generic and fused strategies).
    Function(Rc<Function>),
    /// Bare evaluable body (direct-call strategy).
    Node(Rc<dyn Node>),
}

/// Build the Fibonacci node graph for the chosen strategy.
pub fn fib_program(strategy: Strategy) -> Callable {
    match strategy {
        Strategy::Generic => Callable::Function(fib_generic()),
        Strategy::ConstFusion => Callable::Function(fib_const_fusion()),
        Strategy::LeafFusion => Callable::Function(fib_leaf_fusion()),
        Strategy::DirectCall => Callable::Node(fib_direct_call()),
    }
}

/// Evaluate a program against an argument.
///
/// Constructs a fresh `ExecutionContext`, wraps the argument in a call
/// against the root, and returns the result.
pub fn evaluate(program: &Callable, argument: u32) -> u32 {
    let mut ctx = ExecutionContext::new();
    match program {
        Callable::Function(function) => {
            CallNode::new(function, Box::new(ConstNode::new(argument))).eval(&mut ctx)
        }
        Callable::Node(target) => {
            CallAnyNode::new(target, Box::new(ConstNode::new(argument))).eval(&mut ctx)
        }
    }
}

/// Baseline: every operation is its own polymorphic node.
fn fib_generic() -> Rc<Function> {
    Rc::new_cyclic(|this: &Weak<Function>| {
        Function::new(vec![
            Box::new(IfNode::new(
                Box::new(LessNode::new(
                    Box::new(ArgNode),
                    Box::new(ConstNode::new(2)),
                )),
                Box::new(ReturnNode::new(Box::new(ArgNode))),
            )),
            Box::new(ReturnNode::new(Box::new(AddNode::new(
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubNode::new(
                        Box::new(ArgNode),
                        Box::new(ConstNode::new(1)),
                    )),
                )),
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubNode::new(
                        Box::new(ArgNode),
                        Box::new(ConstNode::new(2)),
                    )),
                )),
            )))),
        ])
    })
}

/// Constant operands folded into the comparison and subtraction nodes.
fn fib_const_fusion() -> Rc<Function> {
    Rc::new_cyclic(|this: &Weak<Function>| {
        Function::new(vec![
            Box::new(IfNode::new(
                Box::new(LessConstNode::new(Box::new(ArgNode), 2)),
                Box::new(ReturnNode::new(Box::new(ArgNode))),
            )),
            Box::new(ReturnNode::new(Box::new(AddNode::new(
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubConstNode::new(Box::new(ArgNode), 1)),
                )),
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubConstNode::new(Box::new(ArgNode), 2)),
                )),
            )))),
        ])
    })
}

/// Leaves held by value inside the fused nodes (non-virtual reads).
fn fib_leaf_fusion() -> Rc<Function> {
    Rc::new_cyclic(|this: &Weak<Function>| {
        Function::new(vec![
            Box::new(IfNode::new(
                Box::new(LessArgConstNode::new(ArgNode, ConstNode::new(2))),
                Box::new(ReturnNode::new(Box::new(ArgNode))),
            )),
            Box::new(ReturnNode::new(Box::new(AddNode::new(
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubArgConstNode::new(ArgNode, ConstNode::new(1))),
                )),
                Box::new(CallNode::from_weak(
                    this.clone(),
                    Box::new(SubArgConstNode::new(ArgNode, ConstNode::new(2))),
                )),
            )))),
        ])
    })
}

/// No `Function` at all: an `IfElseNode` expression is the entire body, and
/// the recursive call sites target it directly.
fn fib_direct_call() -> Rc<dyn Node> {
    let body: Rc<IfElseNode> = Rc::new_cyclic(|this: &Weak<IfElseNode>| {
        let first_call: Weak<dyn Node> = this.clone();
        let second_call: Weak<dyn Node> = this.clone();
        IfElseNode::new(
            Box::new(LessArgConstNode::new(ArgNode, ConstNode::new(2))),
            Box::new(ArgNode),
            Box::new(AddNode::new(
                Box::new(CallAnyNode::from_weak(
                    first_call,
                    Box::new(SubArgConstNode::new(ArgNode, ConstNode::new(1))),
                )),
                Box::new(CallAnyNode::from_weak(
                    second_call,
                    Box::new(SubArgConstNode::new(ArgNode, ConstNode::new(2))),
                )),
            )),
        )
    });
    body
}
