//! Integration flows wiring every crate through `GuardianRuntime`.

#[cfg(test)]
mod support;

mod flows;
