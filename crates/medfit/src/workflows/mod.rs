pub mod catalog;
pub mod diagnosis;
pub mod labeling;
pub mod pipeline;
