pub mod admin_panel;
