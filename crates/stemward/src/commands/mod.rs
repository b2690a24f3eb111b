pub mod current;
pub mod delete_unused;
pub mod unused;
pub mod upload;
pub mod use_stemcell;
