pub mod access_detail;
pub mod access_list;
pub mod notice;
pub mod step_panel;
