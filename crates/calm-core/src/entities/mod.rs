//! Entity structs persisted by the ledger and participant stores.

mod cognitive;
mod earning;
mod participant;
mod session;

pub use cognitive::CognitiveResult;
pub use earning::{Earning, EarningKey};
pub use participant::{Participant, Progress, ProgressUpdate};
pub use session::{COHERENCE_CEILING, Session, WeightedScores};
