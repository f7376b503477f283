//! Test suites for the statistics daemon.

pub(crate) mod support;
