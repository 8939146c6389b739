pub mod compare;
pub mod info;
