pub mod identify;
pub mod preview;
