/// Errors produced by ledger operations.
///
/// Malformed or partial input never reaches this type; extraction problems
/// are carried in the records themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),
}
