pub mod gamepad;
pub mod input;
pub mod renderer;
pub mod sensors;
pub mod sound;
