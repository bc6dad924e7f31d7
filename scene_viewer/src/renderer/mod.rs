/// Renderer module - GPU abstraction used by the draw sequence
///
/// The viewer never talks to a graphics API directly. A host backend
/// implements these traits; tests use the recording mock backend.

mod renderer;
mod buffer;
mod framebuffer;
mod command_list;

#[cfg(test)]
pub mod mock_renderer;

pub use renderer::*;
pub use buffer::*;
pub use framebuffer::*;
pub use command_list::*;
