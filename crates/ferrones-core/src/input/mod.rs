//! Controller input handling.
//!
//! The standard NES pad is a parallel-in/serial-out shift register: a
//! strobe write at $4016 latches the eight button states, and successive
//! reads clock them out one bit at a time in the order A, B, Select,
//! Start, Up, Down, Left, Right.

mod controller;

pub use controller::{Button, Controller};
