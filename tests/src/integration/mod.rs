//! Cross-subsystem integration tests.

#[cfg(test)]
mod harness;
#[cfg(test)]
mod review_gasless;
#[cfg(test)]
mod revoke_fallback;
#[cfg(test)]
mod write_reconcile;
