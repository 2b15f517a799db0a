//! `basic` kind: `exactly_one_shift_per_day`, already enforced by the
//! variable model (§4.1). Compiling it is always a no-op.

use crate::domain::rule::{BasicPayload, RuleNode};
use crate::rules::CompileOutput;

pub fn compile(_rule: &RuleNode, _payload: &BasicPayload) -> CompileOutput {
    CompileOutput::default()
}
