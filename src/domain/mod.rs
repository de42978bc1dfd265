pub mod description;
pub mod labels;
pub mod note;
pub mod template;
pub mod ticket;
