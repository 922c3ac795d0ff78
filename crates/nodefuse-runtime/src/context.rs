//! Shared mutable evaluation state
//!
//! One `ExecutionContext` serves exactly one top-level evaluation. It holds
//! the argument stack that emulates call frames (one `u32` slot per active
//! call) and the control register through which `Return` statements
//! short-circuit the enclosing statement loop. It contains no logic beyond
//! slot bookkeeping; every node receives it by mutable reference.

/// Capacity of the argument stack, in call frames.
///
/// Exceeding this depth is a fatal precondition violation (the slice index
/// panics), not a recoverable error. Callers must keep recursion depth within
/// this bound.
pub const STACK_CAPACITY: usize = 4096;

/// Control flow signal for handling early returns.
///
/// The discriminant plays the role of a "stop executing statements" flag;
/// the payload is the return-value register. The call protocol consumes a
/// pending `Return` back to `None`, so a completed call never leaks
/// return-in-progress state to its caller's sibling statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    None,
    Return(u32),
}

/// Execution state for one top-level evaluation.
pub struct ExecutionContext {
    /// Argument stack; slot `stack_top - 1` is the current call's argument.
    stack: Box<[u32]>,
    /// Index of the next free stack slot.
    stack_top: usize,
    /// Pending control flow state.
    control: ControlFlow,
}

impl ExecutionContext {
    /// Create a fresh context with an empty stack and no pending return.
    pub fn new() -> Self {
        Self {
            stack: vec![0; STACK_CAPACITY].into_boxed_slice(),
            stack_top: 0,
            control: ControlFlow::None,
        }
    }

    /// Push a call argument, making it the current call's argument.
    #[inline]
    pub fn push(&mut self, value: u32) {
        self.stack[self.stack_top] = value;
        self.stack_top += 1;
    }

    /// Discard the current call's argument, restoring the caller's frame.
    #[inline]
    pub fn pop(&mut self) {
        self.stack_top -= 1;
    }

    /// Read the current call's argument (the top of the stack).
    #[inline]
    pub fn argument(&self) -> u32 {
        self.stack[self.stack_top - 1]
    }

    /// Number of active call frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack_top
    }

    /// Record a return value and signal the statement loop to stop.
    #[inline]
    pub fn set_return(&mut self, value: u32) {
        self.control = ControlFlow::Return(value);
    }

    /// Whether a return is pending for the current function body.
    #[inline]
    pub fn is_returning(&self) -> bool {
        self.control != ControlFlow::None
    }

    /// Consume a pending return, resetting the control register.
    #[inline]
    pub fn take_return(&mut self) -> Option<u32> {
        match std::mem::replace(&mut self.control, ControlFlow::None) {
            ControlFlow::Return(value) => Some(value),
            ControlFlow::None => None,
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
