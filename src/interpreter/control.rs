use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

/// Non-local control flow threaded out of statement execution via
/// `Result`'s error channel. `Return` is not a runtime error — it is a
/// typed signal caught only at the enclosing function call boundary — but
/// sharing the error channel lets every intermediate scope unwind with a
/// single `?`, restoring its environment on the way out regardless of
/// which variant is propagating.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Signal {
        Signal::Error(error)
    }
}
