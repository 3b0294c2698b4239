//! Assertions over produced invocations.

use crate::core::ReadyInvocation;

/// Asserts that each invocation declaring an input reads what the previous
/// invocation declared as output.
///
/// # Panics
///
/// Panics on the first broken link.
pub fn assert_chained(invocations: &[ReadyInvocation]) {
    for pair in invocations.windows(2) {
        let (prev, next) = (&pair[0].descriptor, &pair[1].descriptor);
        if let Some(input) = next.input() {
            assert_eq!(
                Some(input),
                prev.output(),
                "{} does not read the output of {}",
                next.kind(),
                prev.kind()
            );
        }
    }
}

/// Asserts that the invocation's arguments contain `flag`.
///
/// # Panics
///
/// Panics if the flag is absent.
pub fn assert_has_flag(invocation: &ReadyInvocation, flag: &str) {
    assert!(
        invocation.descriptor.args().iter().any(|a| a == flag),
        "{} arguments {:?} do not contain {flag}",
        invocation.descriptor.kind(),
        invocation.descriptor.args()
    );
}
