//! Image containers at the library boundary and in the working layout.
//!
//! Callers hand over an interleaved [`ImageInput`]; the extractors convert it
//! once into a channel-major [`PlanarImage`] and work on borrowed
//! [`PlaneRef`] rows from there. Single planes (magnitude, orientation,
//! feature channels) are owned [`ImageF32`] buffers.
pub mod f32;
pub mod input;
pub mod io;
pub mod planar;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::input::{ChannelOrder, ImageInput, PixelData};
pub use self::planar::{PlaneRef, PlanarImage};
pub use self::traits::{ImageView, ImageViewMut, Rows};
