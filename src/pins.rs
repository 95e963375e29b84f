//! GPIO pin assignments for the PropSense trigger board.
//!
//! Single source of truth — the default [`SystemConfig`](crate::config)
//! sensor table references this module rather than hard-coding pin numbers.
//!
//! Every switch is a dry contact between its GPIO and ground. The firmware
//! enables the internal pull-up on each line, so an open contact reads HIGH
//! and a triggered (closed) contact reads LOW — all channels are active-low.

/// Momentary start button on the operator desk.
pub const START_GPIO: i32 = 10;

/// Reed switch behind the maya statue.
pub const MAYA_GPIO: i32 = 11;

/// Microswitch under the console lever.
pub const CONSOLE_GPIO: i32 = 9;

/// Reed switch on the factory ("usine") hatch — the final prop of the room.
pub const USINE_GPIO: i32 = 5;
