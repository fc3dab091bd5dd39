//! UI Components
//!
//! Leptos views over the reader, settings and auth models.

mod account_view;
mod branch_panel;
mod home_view;
mod login_form;
mod nav_link;
mod novel_detail;
mod reader_view;
mod settings_panel;
mod title_bar;

pub use account_view::AccountView;
pub use branch_panel::BranchPanel;
pub use home_view::HomeView;
pub use login_form::LoginForm;
pub use nav_link::NavLink;
pub use novel_detail::NovelDetail;
pub use reader_view::ReaderView;
pub use settings_panel::SettingsPanel;
pub use title_bar::TitleBar;
