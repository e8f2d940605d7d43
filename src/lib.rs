pub mod canvas;
pub mod debug;
mod generator;
pub mod icon;
pub mod shape;
pub mod text;

use std::{error::Error, path::PathBuf};

pub use self::generator::Foreground;
pub use self::generator::GeneratorBuilder;
pub use self::generator::IconGenerator;
pub use self::generator::Rendering;
pub use self::generator::OUTPUT_FILE;
pub use self::text::FontSource;

/// Writes `app_icon.ico` into the working directory using the default look.
pub fn generate() -> Result<PathBuf, Box<dyn Error>> {
    GeneratorBuilder::default().build().generate()
}
