pub mod export;
pub mod gt_model;
pub mod landing;
