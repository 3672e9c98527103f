//! Evaluation: the suspend/resume engine that drives unification and reification.

mod engine;

pub use engine::{
    Computation, EvalConfig, Evaluator, Event, Flow, Interrupt, Observer, Step, Suspend,
    Unobserved,
};
