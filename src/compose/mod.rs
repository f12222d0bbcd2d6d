pub mod kernel;
pub mod porter_duff;
