pub mod dialogue;
pub mod extraction;
