//! Behavioural and property tests for the machine, driven through the
//! real parser so the emitted code is exactly what production runs.
