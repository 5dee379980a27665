pub mod dubbing;
pub mod language;
pub mod video;
