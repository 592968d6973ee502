pub mod playlist;
pub mod sort;
