// Installation of extracted tools into their final layout.

/// Places a tool unpacked from a GitHub release archive, exposes it on the
/// search path and runs its smoke test.
pub(crate) mod github;
