pub mod use_cases;

pub use use_cases::chart_view::{ChartViewUseCase, SelectionQuery};
pub use use_cases::data_loader::DataLoader;
pub use use_cases::directory_listing::DirectoryListingUseCase;
