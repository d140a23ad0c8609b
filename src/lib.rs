pub mod geometry;
pub mod gui;
pub mod host;
pub mod keys;
pub mod logging;
pub mod mode;
pub mod scribble;
pub mod settings;
pub mod textbox;
