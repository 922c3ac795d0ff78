//! Call protocol tests
//!
//! Stack hygiene, early-return short-circuiting, operand evaluation order,
//! and the non-owning call-target relationship, observed through
//! side-effecting probe nodes.

use std::cell::RefCell;
use std::rc::Rc;

use nodefuse_runtime::{
    fib_program, AddNode, ArgNode, CallAnyNode, CallNode, Callable, ConstNode, ExecutionContext,
    Function, Node, ReturnNode, Strategy,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Records each evaluation in a shared log, then yields a fixed value.
struct ProbeNode {
    label: &'static str,
    value: u32,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl ProbeNode {
    fn new(label: &'static str, value: u32, log: &Rc<RefCell<Vec<&'static str>>>) -> Box<Self> {
        Box::new(Self {
            label,
            value,
            log: Rc::clone(log),
        })
    }
}

impl Node for ProbeNode {
    fn eval(&self, _ctx: &mut ExecutionContext) -> u32 {
        self.log.borrow_mut().push(self.label);
        self.value
    }
}

fn leaf(value: u32) -> Box<dyn Node> {
    Box::new(ConstNode::new(value))
}

/// Call a built program against an existing context.
fn call_in(program: &Callable, n: u32, ctx: &mut ExecutionContext) -> u32 {
    match program {
        Callable::Function(function) => CallNode::new(function, leaf(n)).eval(ctx),
        Callable::Node(target) => CallAnyNode::new(target, leaf(n)).eval(ctx),
    }
}

#[rstest]
#[case(Strategy::Generic)]
#[case(Strategy::ConstFusion)]
#[case(Strategy::LeafFusion)]
#[case(Strategy::DirectCall)]
fn stack_depth_is_restored_after_a_completed_call(#[case] strategy: Strategy) {
    let program = fib_program(strategy);
    let mut ctx = ExecutionContext::new();
    ctx.push(99); // pre-existing frame that must survive untouched

    // Deep enough to exercise real recursion and early returns, far below
    // capacity.
    assert_eq!(call_in(&program, 18, &mut ctx), 2584);
    assert_eq!(ctx.depth(), 1);
    assert_eq!(ctx.argument(), 99);
}

#[test]
fn a_call_restores_the_callers_frame() {
    let mut ctx = ExecutionContext::new();
    ctx.push(7); // caller's own argument

    let function = Rc::new(Function::new(vec![Box::new(ReturnNode::new(Box::new(
        AddNode::new(Box::new(ArgNode), leaf(1)),
    )))]));
    let call = CallNode::new(&function, leaf(100));

    assert_eq!(call.eval(&mut ctx), 101);
    assert_eq!(ctx.depth(), 1);
    assert_eq!(ctx.argument(), 7);
}

#[test]
fn early_return_skips_the_remaining_statements() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let function = Rc::new(Function::new(vec![
        Box::new(ReturnNode::new(ProbeNode::new("returned", 5, &log))),
        ProbeNode::new("unreachable", 0, &log),
    ]));

    let mut ctx = ExecutionContext::new();
    let call = CallNode::new(&function, leaf(0));
    assert_eq!(call.eval(&mut ctx), 5);
    assert_eq!(*log.borrow(), vec!["returned"]);
}

#[test]
fn statements_run_in_order_until_the_first_return() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let function = Rc::new(Function::new(vec![
        ProbeNode::new("first", 0, &log),
        ProbeNode::new("second", 0, &log),
        Box::new(ReturnNode::new(ProbeNode::new("third", 9, &log))),
        ProbeNode::new("never", 0, &log),
    ]));

    let mut ctx = ExecutionContext::new();
    let call = CallNode::new(&function, leaf(0));
    assert_eq!(call.eval(&mut ctx), 9);
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn binary_operands_evaluate_left_to_right() {
    let log = Rc::new(RefCell::new(Vec::new()));

    // The left operand is a nested call whose body probes the log; it must
    // complete before the right operand's probe fires.
    let inner = Rc::new(Function::new(vec![Box::new(ReturnNode::new(
        ProbeNode::new("lhs-body", 2, &log),
    ))]));
    let sum = AddNode::new(
        Box::new(CallNode::new(&inner, ProbeNode::new("lhs-arg", 0, &log))),
        ProbeNode::new("rhs", 3, &log),
    );

    let mut ctx = ExecutionContext::new();
    assert_eq!(sum.eval(&mut ctx), 5);
    assert_eq!(*log.borrow(), vec!["lhs-arg", "lhs-body", "rhs"]);
}

#[test]
fn argument_evaluates_before_the_frame_is_pushed() {
    // The argument expression is itself a call; if the frame were pushed
    // first, the inner call would corrupt the slot being written and the
    // outer callee would observe the wrong argument.
    let identity = Rc::new(Function::new(vec![Box::new(ReturnNode::new(Box::new(
        ArgNode,
    )))]));
    let outer = CallNode::new(
        &identity,
        Box::new(CallNode::new(&identity, leaf(33))),
    );

    let mut ctx = ExecutionContext::new();
    assert_eq!(outer.eval(&mut ctx), 33);
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn dropping_call_sites_leaves_the_function_alive() {
    let function = Rc::new(Function::new(vec![Box::new(ReturnNode::new(leaf(8)))]));
    let first = CallNode::new(&function, leaf(0));
    let second = CallNode::new(&function, leaf(0));

    // Call sites are non-owning: the Rc count never moves.
    assert_eq!(Rc::strong_count(&function), 1);
    drop(first);
    drop(second);

    let mut ctx = ExecutionContext::new();
    let call = CallNode::new(&function, leaf(0));
    assert_eq!(call.eval(&mut ctx), 8);
}

#[test]
fn dropping_a_direct_call_site_leaves_the_target_alive() {
    let target: Rc<dyn Node> = Rc::new(ConstNode::new(4));
    let call = CallAnyNode::new(&target, leaf(0));
    assert_eq!(Rc::strong_count(&target), 1);
    drop(call);

    let mut ctx = ExecutionContext::new();
    let call = CallAnyNode::new(&target, leaf(0));
    assert_eq!(call.eval(&mut ctx), 4);
    assert_eq!(ctx.depth(), 0);
}
