//! File formats handled by the command-line front end.
//!
//! - [`xyzr`] - Plain-text atom records, one `x y z radius` per line
//! - [`json`] - The flat vertex/index surface document consumed by potential samplers

pub mod json;
pub mod xyzr;
