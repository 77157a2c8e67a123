//! Input bridging from the UI thread into the render loop.

pub mod gesture;

pub use gesture::{GestureEvent, GestureQueue, GestureSender};
