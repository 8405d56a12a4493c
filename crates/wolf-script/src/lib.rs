//! Script section inspection.
//!
//! Reads the TypeScript script section of a component without executing it
//! and recovers the component contract: the members of the `Component` type
//! (props, syncs, events and slots) and the shape of the `create` or
//! `createCtx` function.

mod contract;
mod inspect;

pub use contract::{CreateFn, ScriptContract, SlotDecl, SlotTable};
pub use inspect::inspect;
