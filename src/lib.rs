//! Core of the image viewer: the open image, its non-destructive edit
//! parameters and the undo/redo history, plus the imaging adapters they
//! rely on. The iced front end lives in `main.rs`.

pub mod error;
pub mod imaging;
pub mod state;
