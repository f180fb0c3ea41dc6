//! The core of the OpenGL samples. This crate holds everything that does not
//! need a live graphics context: the shader program builder and assembler, shader source
//! loading, extension checks, the application state driven by input, camera
//! math, the hardcoded geometry and the configuration.

pub mod assembly;
pub mod camera;
pub mod config;
pub mod extensions;
pub mod geometry;
pub mod input;
pub mod sample;
pub mod shader;
pub mod source;
pub mod state;
