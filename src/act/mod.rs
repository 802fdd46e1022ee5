//! Solution-to-action translation and pointer output.
//!
//! A solved board becomes an ordered [`ClickPlan`] of absolute screen
//! coordinates; the plan is executed through the [`PointerInjector`]
//! collaborator, which is fire-and-forget by contract.

mod plan;
mod pointer;

pub use plan::{ClickPlan, ClickTarget, Translator};
pub use pointer::{MockPointer, PointerInjector};

#[cfg(feature = "input")]
pub use pointer::EnigoPointer;
