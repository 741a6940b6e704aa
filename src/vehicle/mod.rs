pub mod craft;
pub mod presets;

pub use craft::Craft;
