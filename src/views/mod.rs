//! HTML pages served to browsers.

pub mod index;
