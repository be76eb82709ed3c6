//! Output languages.

pub mod go;
