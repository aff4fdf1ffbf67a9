pub mod event_bus;
pub mod frame;
pub mod observer;

pub use event_bus::*;
pub use frame::*;
pub use observer::*;
