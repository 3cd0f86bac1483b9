//! External collaborator boundaries: invoice rendering, image overlay.

pub mod invoice;
pub mod overlay;
