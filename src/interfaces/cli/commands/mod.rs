pub mod config_gen;
pub mod link_management;
