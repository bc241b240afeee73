//! UI Components
//!
//! Reusable Leptos components.

mod delete_confirm_button;
mod filter_bar;
mod invite_button;
mod list_picker;
mod name_badge;
mod submittable_input;
mod task_item;
mod toaster;
mod todo_list_view;

pub use delete_confirm_button::DeleteConfirmButton;
pub use filter_bar::FilterBar;
pub use invite_button::InviteButton;
pub use list_picker::ListPicker;
pub use name_badge::NameBadge;
pub use submittable_input::SubmittableInput;
pub use task_item::TaskItem;
pub use toaster::{StoreNotifier, Toaster};
pub use todo_list_view::TodoListView;
