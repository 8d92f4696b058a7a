//! Table-specific merge implementations
//!
//! Each function merges one concern of an incoming font into the base table
//! set. Precedence is the same everywhere: whatever the base already has wins.

pub mod cmap;
pub mod glyf;
pub mod hmtx;
pub mod name;
pub mod os2;
pub mod vmtx;
