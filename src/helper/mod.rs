pub mod angle_helper;
