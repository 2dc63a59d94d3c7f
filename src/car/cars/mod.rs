pub mod racing;
pub mod suv;
