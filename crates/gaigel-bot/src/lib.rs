pub mod policy;

pub use policy::{ExternalPolicy, FirstLegalPolicy, RandomPolicy, ScriptedPolicy};
