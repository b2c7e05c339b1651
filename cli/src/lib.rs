pub mod error;
pub mod logging;
pub mod output;
pub mod replay;
pub mod script;

pub use error::ScriptError;
pub use replay::{KillOutcome, LootOutcome, ReplayOptions, ReplayOutcome, ScriptedHost, replay};
pub use script::{BattleScript, Step, apply_overrides};
