//! Page operations: move, split, create, delete, illustrate

mod break_point;
mod operation;

pub use break_point::{find_break_point, SEARCH_WINDOW};
pub use operation::{
    create_page_after, delete_page, insert_image, move_last_paragraph_to_next, remove_image,
    split_page, DeleteOutcome, EditOutcome, PageAction,
};

/// Asks the user to confirm a destructive operation
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirmation for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}
