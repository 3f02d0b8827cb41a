//! Space-related presentation logic: the sidebar's space list
//! and dialogs for space features that aren't supported yet.

pub mod feature_unavailable;
pub mod space_list_entry;
