/// Texture handle produced by the material loader.
///
/// Pixel data lives on the GPU side of the host backend; the viewer only
/// needs a stable name and size to bind it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self { name: name.into(), width, height }
    }
}
