//! Object picking through an off-screen identifier target.

mod picking_texture;

pub use picking_texture::{
    PickingCallback, PickingIntent, PickingRequest, PickingResponse, PickingTexture, PixelInfo,
};
