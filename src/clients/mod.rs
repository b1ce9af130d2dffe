pub mod imagine;
