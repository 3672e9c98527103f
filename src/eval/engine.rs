//! Explicit-stack driver for suspending computations.
//!
//! Unification and reification recurse into themselves for every nested
//! sub-term. Rather than recursing on the native stack, each algorithm is a
//! state machine that hands its sub-problems back to the driver and is resumed
//! with their results, so nesting depth is bounded only by memory.

use thiserror::Error;
use tracing::trace;

/// A unit of work that is either finished or waiting to be driven.
pub enum Computation<'a, T> {
    Done(T),
    Suspended(Box<dyn Suspend<'a, T> + 'a>),
}

impl<'a, T> Computation<'a, T> {
    pub fn suspended(frame: impl Suspend<'a, T> + 'a) -> Self {
        Computation::Suspended(Box::new(frame))
    }
}

/// What a suspended computation asks of the driver when resumed.
pub enum Step<'a, T> {
    /// Evaluate this sub-computation and resume me with its result.
    Await(Computation<'a, T>),
    /// All sub-results are in; my next step assembles the final value.
    Construct,
    /// I am finished.
    Return(T),
}

/// A resumable computation.
pub trait Suspend<'a, T> {
    /// Resume with the result of the last awaited sub-computation, or `None`
    /// on the first resume, after `Construct`, and after an awaited
    /// sub-computation was abandoned by an observer.
    fn resume(&mut self, input: Option<T>) -> Step<'a, T>;
}

/// Something the driver produced, as seen by an [`Observer`].
#[derive(Debug)]
pub enum Event<'e, T> {
    /// A value was produced: a finished sub-computation or a returned frame.
    Value(&'e T),
    /// The current frame announced it is about to assemble its result.
    Construct,
    /// The current frame awaits a suspended sub-computation.
    Nested,
}

/// An observer's verdict on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Drop the current frame without affecting the rest of the stack.
    Abandon,
    /// Stop the whole evaluation.
    Halt,
}

/// Inspects every event before the driver acts on it.
pub trait Observer<T> {
    fn observe(&mut self, event: Event<'_, T>) -> Flow;
}

/// The observer that never intervenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobserved;

impl<T> Observer<T> for Unobserved {
    fn observe(&mut self, _event: Event<'_, T>) -> Flow {
        Flow::Continue
    }
}

/// Why an observed evaluation produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupt {
    #[error("evaluation halted by observer")]
    Halted,
    #[error("root computation was abandoned")]
    Abandoned,
}

/// Evaluator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Frames preallocated on the work stack.
    pub stack_capacity: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig { stack_capacity: 32 }
    }
}

/// Runs computations to completion on an explicit work stack.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Evaluator { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Drive `root` to completion.
    pub fn run<T>(&self, root: Computation<'_, T>) -> T {
        match self.run_observed(root, &mut Unobserved) {
            Ok(value) => value,
            // Unobserved never abandons or halts.
            Err(interrupt) => unreachable!("unobserved evaluation interrupted: {}", interrupt),
        }
    }

    /// Drive `root` to completion, consulting `observer` on every event.
    pub fn run_observed<'a, T, O>(
        &self,
        root: Computation<'a, T>,
        observer: &mut O,
    ) -> Result<T, Interrupt>
    where
        O: Observer<T> + ?Sized,
    {
        let root = match root {
            Computation::Done(value) => {
                return match observer.observe(Event::Value(&value)) {
                    Flow::Continue => Ok(value),
                    Flow::Abandon => Err(Interrupt::Abandoned),
                    Flow::Halt => Err(Interrupt::Halted),
                };
            }
            Computation::Suspended(frame) => frame,
        };

        let mut stack: Vec<Box<dyn Suspend<'a, T> + 'a>> =
            Vec::with_capacity(self.config.stack_capacity.max(1));
        stack.push(root);
        let mut input: Option<T> = None;
        let mut steps: u64 = 0;
        let mut peak_depth = 1;

        while let Some(top) = stack.last_mut() {
            steps += 1;
            let flow = match top.resume(input.take()) {
                Step::Await(Computation::Suspended(child)) => {
                    let flow = observer.observe(Event::Nested);
                    if flow == Flow::Continue {
                        stack.push(child);
                        peak_depth = peak_depth.max(stack.len());
                    }
                    flow
                }
                Step::Await(Computation::Done(value)) => {
                    let flow = observer.observe(Event::Value(&value));
                    if flow == Flow::Continue {
                        input = Some(value);
                    }
                    flow
                }
                Step::Construct => observer.observe(Event::Construct),
                Step::Return(value) => {
                    let flow = observer.observe(Event::Value(&value));
                    if flow == Flow::Continue {
                        stack.pop();
                        input = Some(value);
                    }
                    flow
                }
            };

            match flow {
                Flow::Continue => {}
                Flow::Abandon => {
                    stack.pop();
                    input = None;
                }
                Flow::Halt => return Err(Interrupt::Halted),
            }
        }

        trace!(steps, peak_depth, "evaluation finished");
        input.ok_or(Interrupt::Abandoned)
    }
}
