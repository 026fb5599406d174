pub mod chart_view;
pub mod data_loader;
pub mod directory_listing;
