pub mod event;
pub mod screen;
pub mod session;
pub mod step;

#[cfg(test)]
pub mod testkit;
