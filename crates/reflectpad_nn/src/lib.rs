pub mod layer;
pub mod layers;

pub use crate::{
    layer::{Layer, LayerState},
    layers::padding::ReflectionPad3d,
};
