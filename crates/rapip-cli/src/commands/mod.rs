pub mod completion;
pub mod measure;
