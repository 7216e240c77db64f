//! Application layer - command dispatch and call-routing use cases

pub mod handlers;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;
